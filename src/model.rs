//! Immutable data model for a windowed multipole library.
//!
//! A [`MultipoleModel`] is constructed once, validated against every
//! structural invariant, and read-only afterwards; it can be shared across
//! threads freely because nothing in it mutates post-construction.
//!
//! Pole positions and residues live in sqrt-energy (momentum) space: the
//! complex `position` of a [`Pole`] is a sqrt(eV) value, which is where the
//! uniform window spacing comes from.

use std::ops::Range;

use num_complex::Complex64;

use crate::error::{DomainError, FormatError};
use crate::evaluate::{CrossSections, MultipoleEvaluator};

/// One complex pole with its three reaction-channel residues.
///
/// Non-fissile nuclides carry a zero fission residue; there is no separate
/// fissionable flag anywhere in the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pole {
    /// Pole position in sqrt-energy space, sqrt(eV).
    pub position: Complex64,
    pub residue_scattering: Complex64,
    pub residue_absorption: Complex64,
    pub residue_fission: Complex64,
}

impl Pole {
    fn is_finite(&self) -> bool {
        [
            self.position,
            self.residue_scattering,
            self.residue_absorption,
            self.residue_fission,
        ]
        .iter()
        .all(|value| value.re.is_finite() && value.im.is_finite())
    }
}

/// Immutable pole array, sorted by ascending real part of the position.
///
/// The ordering is non-strict so conjugate partners may share a real part.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PoleTable {
    poles: Vec<Pole>,
}

impl PoleTable {
    pub fn new(poles: Vec<Pole>) -> Result<Self, FormatError> {
        for (index, pole) in poles.iter().enumerate() {
            if !pole.is_finite() {
                return Err(FormatError::NonFiniteField { field: "poles" });
            }
            if index > 0 && pole.position.re < poles[index - 1].position.re {
                return Err(FormatError::UnsortedPoles { index });
            }
        }
        Ok(Self { poles })
    }

    pub fn len(&self) -> usize {
        self.poles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poles.is_empty()
    }

    pub fn all(&self) -> &[Pole] {
        &self.poles
    }

    /// Poles belonging to one window's contiguous index range.
    pub fn slice(&self, range: Range<usize>) -> &[Pole] {
        &self.poles[range]
    }
}

/// Curvefit coefficient triples `(scattering, absorption, fission)`.
///
/// Coefficient `k` multiplies the basis function `E^(k/2 - 1)`, so the rows
/// read `1/E`, `1/sqrt(E)`, `1`, `sqrt(E)`, ... Orders may differ per window.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveFit {
    coefficients: Vec<[f64; 3]>,
}

impl CurveFit {
    pub fn new(coefficients: Vec<[f64; 3]>) -> Result<Self, FormatError> {
        if coefficients
            .iter()
            .any(|row| row.iter().any(|value| !value.is_finite()))
        {
            return Err(FormatError::NonFiniteField { field: "curvefit" });
        }
        Ok(Self { coefficients })
    }

    pub fn coefficients(&self) -> &[[f64; 3]] {
        &self.coefficients
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

/// One energy window: a contiguous pole index range, an optional curvefit
/// polynomial, and whether that polynomial is itself Doppler broadened.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    poles: Range<usize>,
    curvefit: Option<CurveFit>,
    broaden_poly: bool,
}

/// Tagged view of a window's contributions, so evaluator branches are
/// exhaustive instead of probing optional fields.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowTerms<'a> {
    /// Pole summation only. The range may be empty, in which case the window
    /// contributes nothing.
    Poles { poles: Range<usize> },
    /// Pole summation plus a polynomial correction.
    PolesAndPolynomial {
        poles: Range<usize>,
        curvefit: &'a CurveFit,
    },
    /// Pure polynomial region, e.g. the smooth high-energy tail.
    PolynomialOnly { curvefit: &'a CurveFit },
}

impl Window {
    pub fn new(poles: Range<usize>, curvefit: Option<CurveFit>, broaden_poly: bool) -> Self {
        Self {
            poles,
            curvefit,
            broaden_poly,
        }
    }

    pub fn pole_range(&self) -> Range<usize> {
        self.poles.clone()
    }

    pub fn curvefit(&self) -> Option<&CurveFit> {
        self.curvefit.as_ref()
    }

    pub fn broaden_poly(&self) -> bool {
        self.broaden_poly
    }

    pub fn terms(&self) -> WindowTerms<'_> {
        match (&self.curvefit, self.poles.is_empty()) {
            (Some(curvefit), true) => WindowTerms::PolynomialOnly { curvefit },
            (Some(curvefit), false) => WindowTerms::PolesAndPolynomial {
                poles: self.poles.clone(),
                curvefit,
            },
            (None, _) => WindowTerms::Poles {
                poles: self.poles.clone(),
            },
        }
    }
}

/// O(1) energy-to-window resolution over a uniform sqrt-energy partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowIndex {
    spacing: f64,
    e_min: f64,
    e_max: f64,
    sqrt_e_min: f64,
    sqrt_e_max: f64,
    n_windows: usize,
}

impl WindowIndex {
    pub fn new(spacing: f64, e_min: f64, e_max: f64) -> Result<Self, FormatError> {
        if !(spacing.is_finite() && e_min.is_finite() && e_max.is_finite()) {
            return Err(FormatError::NonFiniteField {
                field: "energy range",
            });
        }
        if spacing <= 0.0 {
            return Err(FormatError::NonPositiveSpacing { spacing });
        }
        if e_min < 0.0 || e_max <= e_min {
            return Err(FormatError::InvalidEnergyBounds { e_min, e_max });
        }
        let sqrt_e_min = e_min.sqrt();
        let sqrt_e_max = e_max.sqrt();
        let n_windows = ((sqrt_e_max - sqrt_e_min) / spacing).ceil() as usize;
        Ok(Self {
            spacing,
            e_min,
            e_max,
            sqrt_e_min,
            sqrt_e_max,
            n_windows: n_windows.max(1),
        })
    }

    /// Window covering `energy`, which the caller has already validated to be
    /// inside `[e_min, e_max]`. Clamped at both edges to absorb floating-point
    /// boundary error; out-of-range energies are a contract violation handled
    /// by the evaluator, never silently clamped here.
    pub fn locate(&self, energy: f64) -> usize {
        let offset = (energy.sqrt() - self.sqrt_e_min) / self.spacing;
        // Cast saturates at zero for a slightly negative offset.
        (offset as usize).min(self.n_windows - 1)
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn e_min(&self) -> f64 {
        self.e_min
    }

    pub fn e_max(&self) -> f64 {
        self.e_max
    }

    pub fn sqrt_e_min(&self) -> f64 {
        self.sqrt_e_min
    }

    pub fn sqrt_e_max(&self) -> f64 {
        self.sqrt_e_max
    }

    pub fn n_windows(&self) -> usize {
        self.n_windows
    }
}

/// A complete windowed multipole library for one nuclide.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipoleModel {
    index: WindowIndex,
    sqrt_awr: f64,
    poles: PoleTable,
    windows: Vec<Window>,
}

impl MultipoleModel {
    /// Build a model and check every structural invariant: window count
    /// consistent with the energy range and spacing, pole ranges contiguous,
    /// non-overlapping, and jointly covering the pole table.
    pub fn new(
        index: WindowIndex,
        sqrt_awr: f64,
        poles: PoleTable,
        windows: Vec<Window>,
    ) -> Result<Self, FormatError> {
        if !sqrt_awr.is_finite() {
            return Err(FormatError::NonFiniteField { field: "sqrt_awr" });
        }
        if sqrt_awr <= 0.0 {
            return Err(FormatError::NonPositiveAwr { sqrt_awr });
        }
        if windows.len() != index.n_windows() {
            return Err(FormatError::WindowCountMismatch {
                expected: index.n_windows(),
                found: windows.len(),
            });
        }

        let mut cursor = 0_usize;
        for (i, window) in windows.iter().enumerate() {
            let range = window.pole_range();
            if range.end < range.start {
                return Err(FormatError::InvertedPoleRange { window: i });
            }
            if range.start != cursor {
                return Err(FormatError::PoleRangeGap {
                    window: i,
                    expected: cursor,
                    found: range.start,
                });
            }
            cursor = range.end;
        }
        if cursor != poles.len() {
            return Err(FormatError::PoleCoverageMismatch {
                covered: cursor,
                total: poles.len(),
            });
        }

        Ok(Self {
            index,
            sqrt_awr,
            poles,
            windows,
        })
    }

    pub fn index(&self) -> &WindowIndex {
        &self.index
    }

    pub fn sqrt_awr(&self) -> f64 {
        self.sqrt_awr
    }

    pub fn poles(&self) -> &PoleTable {
        &self.poles
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// Evaluate with a default-configured [`MultipoleEvaluator`].
    pub fn evaluate(
        &self,
        energies: &[f64],
        temperature: f64,
    ) -> Result<CrossSections, DomainError> {
        MultipoleEvaluator::new(self).evaluate(energies, temperature)
    }
}
