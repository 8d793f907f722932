//! Serialization of multipole models to and from the structured store.
//!
//! The canonical layout is a single JSON document: scalar parameters at the
//! top level, a pole record array, and per-window records carrying a
//! half-open pole index range, an optional curvefit block, and the
//! broaden-poly flag. Complex values serialize as `{re, im}` objects.
//! serde_json round-trips f64 exactly, so `load(save(model))` reproduces the
//! model field for field.
//!
//! `load` runs every structural invariant through [`MultipoleModel::new`];
//! a file that parses but declares an inconsistent window partition is
//! rejected with the same [`FormatError`] a direct constructor call would
//! produce.

use std::fs;
use std::path::Path;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::model::{CurveFit, MultipoleModel, Pole, PoleTable, Window, WindowIndex};

pub const FORMAT_NAME: &str = "windowed-multipole";
/// (major, minor). Unknown majors are rejected; minors are forward-compatible.
pub const FORMAT_VERSION: (u32, u32) = (1, 0);

#[derive(Debug, Serialize, Deserialize)]
struct ModelFile {
    format: String,
    version: (u32, u32),
    spacing: f64,
    sqrt_awr: f64,
    e_min: f64,
    e_max: f64,
    poles: Vec<PoleRecord>,
    windows: Vec<WindowRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PoleRecord {
    position: Complex64,
    residue_scattering: Complex64,
    residue_absorption: Complex64,
    residue_fission: Complex64,
}

#[derive(Debug, Serialize, Deserialize)]
struct WindowRecord {
    pole_start: usize,
    /// Exclusive; `pole_start == pole_end` marks a zero-pole window.
    pole_end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    curvefit: Option<Vec<[f64; 3]>>,
    broaden_poly: bool,
}

/// Read a model from a file in the canonical layout.
pub fn load(path: impl AsRef<Path>) -> Result<MultipoleModel, FormatError> {
    let source = fs::read_to_string(path.as_ref())?;
    let model = from_json(&source)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        n_poles = model.poles().len(),
        n_windows = model.windows().len(),
        "loaded multipole model"
    );
    Ok(model)
}

/// Write a model to a file in the canonical layout.
pub fn save(model: &MultipoleModel, path: impl AsRef<Path>) -> Result<(), FormatError> {
    fs::write(path.as_ref(), to_json(model)?)?;
    Ok(())
}

pub fn from_json(source: &str) -> Result<MultipoleModel, FormatError> {
    let file: ModelFile = serde_json::from_str(source)?;
    build_model(file)
}

pub fn to_json(model: &MultipoleModel) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(&file_from_model(model))?)
}

fn build_model(file: ModelFile) -> Result<MultipoleModel, FormatError> {
    if file.format != FORMAT_NAME {
        return Err(FormatError::UnsupportedFormat {
            expected: FORMAT_NAME,
            found: file.format,
        });
    }
    let (major, minor) = file.version;
    if major != FORMAT_VERSION.0 {
        return Err(FormatError::UnsupportedVersion { major, minor });
    }

    let index = WindowIndex::new(file.spacing, file.e_min, file.e_max)?;
    let poles = PoleTable::new(
        file.poles
            .into_iter()
            .map(|record| Pole {
                position: record.position,
                residue_scattering: record.residue_scattering,
                residue_absorption: record.residue_absorption,
                residue_fission: record.residue_fission,
            })
            .collect(),
    )?;

    let mut windows = Vec::with_capacity(file.windows.len());
    for (i, record) in file.windows.into_iter().enumerate() {
        if record.pole_end < record.pole_start {
            return Err(FormatError::InvertedPoleRange { window: i });
        }
        let curvefit = record.curvefit.map(CurveFit::new).transpose()?;
        windows.push(Window::new(
            record.pole_start..record.pole_end,
            curvefit,
            record.broaden_poly,
        ));
    }

    MultipoleModel::new(index, file.sqrt_awr, poles, windows)
}

fn file_from_model(model: &MultipoleModel) -> ModelFile {
    ModelFile {
        format: FORMAT_NAME.to_string(),
        version: FORMAT_VERSION,
        spacing: model.index().spacing(),
        sqrt_awr: model.sqrt_awr(),
        e_min: model.index().e_min(),
        e_max: model.index().e_max(),
        poles: model
            .poles()
            .all()
            .iter()
            .map(|pole| PoleRecord {
                position: pole.position,
                residue_scattering: pole.residue_scattering,
                residue_absorption: pole.residue_absorption,
                residue_fission: pole.residue_fission,
            })
            .collect(),
        windows: model
            .windows()
            .iter()
            .map(|window| WindowRecord {
                pole_start: window.pole_range().start,
                pole_end: window.pole_range().end,
                curvefit: window
                    .curvefit()
                    .map(|fit| fit.coefficients().to_vec()),
                broaden_poly: window.broaden_poly(),
            })
            .collect(),
    }
}
