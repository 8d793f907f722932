//! Windowed multipole cross-section evaluation.
//!
//! A windowed multipole library replaces pointwise tabulated neutron cross
//! sections with a compact analytic model: a table of complex poles with
//! per-reaction residues, partitioned into uniform windows in sqrt-energy
//! space, each window carrying an optional polynomial correction. Cross
//! sections at any energy and temperature are recovered by summing the
//! window's pole terms, Doppler broadened on the fly through the complex
//! Faddeeva function, so no temperature-indexed tables are needed.
//!
//! The model is immutable after construction and shareable across threads;
//! evaluation is a pure, order-preserving map over the input energies.
//!
//! ```
//! use windowed_multipole::{CurveFit, MultipoleModel, PoleTable, Window, WindowIndex};
//!
//! // A one-window, pole-free absorber: sigma = c0/E + c1/sqrt(E) + c2.
//! let index = WindowIndex::new(9.9, 0.01, 100.0)?;
//! let fit = CurveFit::new(vec![[2.0, 3.0, 0.0], [0.5, 1.0, 0.0], [4.0, 0.0, 0.0]])?;
//! let windows = vec![Window::new(0..0, Some(fit), false)];
//! let model = MultipoleModel::new(index, 4.0, PoleTable::default(), windows)?;
//!
//! let xs = model.evaluate(&[4.0], 293.6)?;
//! assert!((xs.scattering[0] - 4.75).abs() < 1e-12);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod broaden;
pub mod codec;
pub mod constants;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod numerics;

pub use broaden::{broadened_polynomial_factors, broadened_term, unbroadened_term};
pub use codec::{FORMAT_NAME, FORMAT_VERSION, from_json, load, save, to_json};
pub use error::{DomainError, FormatError};
pub use evaluate::{CrossSections, IMAG_RESIDUAL_REL_TOL, MultipoleEvaluator};
pub use model::{CurveFit, MultipoleModel, Pole, PoleTable, Window, WindowIndex, WindowTerms};
