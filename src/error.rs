//! Error types for model construction, serialization, and evaluation.
//!
//! Evaluation failures are deterministic functions of the inputs; nothing in
//! this crate is transient or retryable. A whole batch fails as soon as one
//! energy violates the model's domain, and the offending index is carried in
//! the error so callers can report it.

use thiserror::Error;

/// A caller handed the evaluator an input outside the model's contract.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DomainError {
    #[error("energy {energy} eV at index {index} is below the model minimum {e_min} eV")]
    EnergyBelowRange { index: usize, energy: f64, e_min: f64 },
    #[error("energy {energy} eV at index {index} is above the model maximum {e_max} eV")]
    EnergyAboveRange { index: usize, energy: f64, e_max: f64 },
    #[error("energy {energy} eV at index {index} is not positive")]
    NonPositiveEnergy { index: usize, energy: f64 },
    #[error("energy at index {index} is not finite")]
    NonFiniteEnergy { index: usize },
    #[error("temperature {temperature} K is negative")]
    NegativeTemperature { temperature: f64 },
    #[error("temperature is not finite")]
    NonFiniteTemperature,
}

/// The serialized model is unreadable or violates a structural invariant.
///
/// Non-recoverable; propagated unchanged to the caller of [`crate::codec::load`].
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("failed to read multipole model: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse multipole model: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported container format '{found}', expected '{expected}'")]
    UnsupportedFormat { expected: &'static str, found: String },
    #[error("unsupported format version {major}.{minor}")]
    UnsupportedVersion { major: u32, minor: u32 },
    #[error("energy range and spacing imply {expected} windows, found {found}")]
    WindowCountMismatch { expected: usize, found: usize },
    #[error("window {window} pole range starts at {found}, expected {expected}")]
    PoleRangeGap { window: usize, expected: usize, found: usize },
    #[error("window {window} pole range is inverted")]
    InvertedPoleRange { window: usize },
    #[error("window pole ranges cover {covered} of {total} poles")]
    PoleCoverageMismatch { covered: usize, total: usize },
    #[error("pole {index} is not sorted by ascending real position")]
    UnsortedPoles { index: usize },
    #[error("window spacing {spacing} must be positive")]
    NonPositiveSpacing { spacing: f64 },
    #[error("sqrt atomic weight ratio {sqrt_awr} must be positive")]
    NonPositiveAwr { sqrt_awr: f64 },
    #[error("energy bounds [{e_min}, {e_max}] eV are inverted or negative")]
    InvalidEnergyBounds { e_min: f64, e_max: f64 },
    #[error("{field} contains a non-finite value")]
    NonFiniteField { field: &'static str },
}
