//! Cross-section evaluation: window lookup, pole summation, and Doppler
//! broadening orchestrated into the public `evaluate` entry point.
//!
//! Each energy is an independent pure function of `(model, E, T)`; the batch
//! loop carries no cross-energy state, so callers may partition the input
//! across threads and concatenate the outputs.

use num_complex::Complex64;

use crate::broaden::{broadened_polynomial_factors, broadened_term, unbroadened_term};
use crate::constants::{K_BOLTZMANN, SQRT_PI};
use crate::error::DomainError;
use crate::model::{CurveFit, MultipoleModel, WindowTerms};

/// Imaginary residuals above this fraction of the channel value signal that
/// the representation is being pushed past its precision, and are reported
/// through `tracing` without failing the evaluation.
pub const IMAG_RESIDUAL_REL_TOL: f64 = 1.0e-6;

/// Cross sections in barns for one batch of energies, aligned with the input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CrossSections {
    pub scattering: Vec<f64>,
    pub absorption: Vec<f64>,
    pub fission: Vec<f64>,
    /// Largest `|Im| / max(1, |Re|)` left over from the complex pole sums.
    /// A diagnostic, not an error: summation discards the imaginary part,
    /// and this records how much there was to discard.
    pub max_imag_residual: f64,
}

impl CrossSections {
    fn with_capacity(n: usize) -> Self {
        Self {
            scattering: Vec::with_capacity(n),
            absorption: Vec::with_capacity(n),
            fission: Vec::with_capacity(n),
            max_imag_residual: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.scattering.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scattering.is_empty()
    }
}

/// Evaluator bound to one immutable model.
///
/// Stateless between calls; cheap to construct, cheap to share.
#[derive(Debug, Clone, Copy)]
pub struct MultipoleEvaluator<'a> {
    model: &'a MultipoleModel,
    imag_residual_tol: f64,
}

impl<'a> MultipoleEvaluator<'a> {
    pub fn new(model: &'a MultipoleModel) -> Self {
        Self {
            model,
            imag_residual_tol: IMAG_RESIDUAL_REL_TOL,
        }
    }

    /// Override the imaginary-residual warning threshold.
    pub fn with_imag_residual_tolerance(mut self, tolerance: f64) -> Self {
        self.imag_residual_tol = tolerance;
        self
    }

    /// Evaluate scattering, absorption, and fission cross sections at every
    /// energy (eV) for one material temperature (K).
    ///
    /// The whole call fails on the first out-of-domain energy; nothing is
    /// silently skipped or clamped. An empty batch returns empty outputs.
    pub fn evaluate(
        &self,
        energies: &[f64],
        temperature: f64,
    ) -> Result<CrossSections, DomainError> {
        if !temperature.is_finite() {
            return Err(DomainError::NonFiniteTemperature);
        }
        if temperature < 0.0 {
            return Err(DomainError::NegativeTemperature { temperature });
        }
        let sqrt_kt = (K_BOLTZMANN * temperature).sqrt();

        let mut output = CrossSections::with_capacity(energies.len());
        for (index, &energy) in energies.iter().enumerate() {
            let (values, residual) = self.evaluate_one(index, energy, sqrt_kt)?;
            output.scattering.push(values[0]);
            output.absorption.push(values[1]);
            output.fission.push(values[2]);
            output.max_imag_residual = output.max_imag_residual.max(residual);
        }

        if output.max_imag_residual > self.imag_residual_tol {
            tracing::warn!(
                max_imag_residual = output.max_imag_residual,
                tolerance = self.imag_residual_tol,
                "imaginary residual of pole summation exceeds tolerance"
            );
        }
        Ok(output)
    }

    fn evaluate_one(
        &self,
        index: usize,
        energy: f64,
        sqrt_kt: f64,
    ) -> Result<([f64; 3], f64), DomainError> {
        let window_index = self.model.index();
        if !energy.is_finite() {
            return Err(DomainError::NonFiniteEnergy { index });
        }
        if energy <= 0.0 {
            return Err(DomainError::NonPositiveEnergy { index, energy });
        }
        if energy < window_index.e_min() {
            return Err(DomainError::EnergyBelowRange {
                index,
                energy,
                e_min: window_index.e_min(),
            });
        }
        if energy > window_index.e_max() {
            return Err(DomainError::EnergyAboveRange {
                index,
                energy,
                e_max: window_index.e_max(),
            });
        }

        let sqrt_e = energy.sqrt();
        let inv_e = 1.0 / energy;
        let window = &self.model.windows()[window_index.locate(energy)];

        let mut polynomial = [0.0_f64; 3];
        let mut pole_sum = [Complex64::new(0.0, 0.0); 3];

        match window.terms() {
            WindowTerms::PolynomialOnly { curvefit } => {
                self.polynomial_contribution(
                    curvefit,
                    window.broaden_poly(),
                    energy,
                    sqrt_e,
                    inv_e,
                    sqrt_kt,
                    &mut polynomial,
                );
            }
            WindowTerms::PolesAndPolynomial { poles, curvefit } => {
                self.polynomial_contribution(
                    curvefit,
                    window.broaden_poly(),
                    energy,
                    sqrt_e,
                    inv_e,
                    sqrt_kt,
                    &mut polynomial,
                );
                self.pole_contribution(poles, sqrt_e, inv_e, sqrt_kt, &mut pole_sum);
            }
            WindowTerms::Poles { poles } => {
                self.pole_contribution(poles, sqrt_e, inv_e, sqrt_kt, &mut pole_sum);
            }
        }

        let mut values = [0.0_f64; 3];
        let mut residual = 0.0_f64;
        for channel in 0..3 {
            values[channel] = polynomial[channel] + pole_sum[channel].re;
            // Normalized against the pole sum alone, so a large polynomial
            // background cannot mask a cancellation failure in the poles.
            let relative = pole_sum[channel].im.abs() / pole_sum[channel].re.abs().max(1.0);
            residual = residual.max(relative);
        }
        Ok((values, residual))
    }

    /// Curvefit polynomial over the basis `E^(k/2 - 1)`.
    ///
    /// Unbroadened: Horner accumulation over sqrt(E), highest degree first,
    /// scaled by `1/E`. Broadened (only when the window's flag is set and
    /// T > 0): dot product with the closed-form broadened basis.
    #[allow(clippy::too_many_arguments)]
    fn polynomial_contribution(
        &self,
        curvefit: &CurveFit,
        broaden_poly: bool,
        energy: f64,
        sqrt_e: f64,
        inv_e: f64,
        sqrt_kt: f64,
        sigma: &mut [f64; 3],
    ) {
        let coefficients = curvefit.coefficients();
        if coefficients.is_empty() {
            return;
        }

        if broaden_poly && sqrt_kt > 0.0 {
            let dopp = self.model.sqrt_awr() / sqrt_kt;
            let factors = broadened_polynomial_factors(energy, dopp, coefficients.len());
            for (row, factor) in coefficients.iter().zip(&factors) {
                for channel in 0..3 {
                    sigma[channel] += row[channel] * factor;
                }
            }
        } else {
            let mut horner = [0.0_f64; 3];
            for row in coefficients.iter().rev() {
                for channel in 0..3 {
                    horner[channel] = horner[channel] * sqrt_e + row[channel];
                }
            }
            for channel in 0..3 {
                sigma[channel] += horner[channel] * inv_e;
            }
        }
    }

    /// Sum the window's poles into complex per-channel accumulators.
    ///
    /// T = 0 takes the closed-form line shape; T > 0 evaluates the broadening
    /// function at the Doppler-scaled pole distance. Temperature enters only
    /// through `dopp = sqrt(AWR) / sqrt(kB T)`.
    fn pole_contribution(
        &self,
        range: std::ops::Range<usize>,
        sqrt_e: f64,
        inv_e: f64,
        sqrt_kt: f64,
        sigma: &mut [Complex64; 3],
    ) {
        let poles = self.model.poles().slice(range);
        if sqrt_kt == 0.0 {
            for pole in poles {
                let term = unbroadened_term(sqrt_e, pole.position) * inv_e;
                sigma[0] += pole.residue_scattering * term;
                sigma[1] += pole.residue_absorption * term;
                sigma[2] += pole.residue_fission * term;
            }
        } else {
            let dopp = self.model.sqrt_awr() / sqrt_kt;
            let scale = dopp * inv_e * SQRT_PI;
            for pole in poles {
                let z = (sqrt_e - pole.position) * dopp;
                let term = broadened_term(z) * scale;
                sigma[0] += pole.residue_scattering * term;
                sigma[1] += pole.residue_absorption * term;
                sigma[2] += pole.residue_fission * term;
            }
        }
    }
}
