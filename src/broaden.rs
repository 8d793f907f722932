//! Doppler-broadening primitives shared by the evaluator.
//!
//! The pole terms come in two forms. At zero temperature a pole contributes
//! the closed-form resonance line `-i / (p - sqrt(E))`; at finite temperature
//! the same line is smeared into a Voigt profile, which is the Faddeeva
//! function at the temperature-scaled pole distance
//! `z = (sqrt(E) - p) * sqrt(AWR) / sqrt(kB T)`. Keeping the two paths
//! separate is both a fast path for the common T = 0 case and a correctness
//! requirement: the broadened form has a removable singularity at small `z`
//! that the closed form sidesteps exactly.
//!
//! Curvefit polynomials broaden too. Each coefficient multiplies a basis
//! function `E^(k/2 - 1)`, and half-integer powers of energy broaden by
//! different closed-form factors; [`broadened_polynomial_factors`] evaluates
//! the whole broadened basis with the standard erf-seeded recurrence.

use num_complex::Complex64;

use crate::constants::SQRT_PI;
use crate::numerics::special::faddeeva_w;

/// erf(beta) is 1 to machine precision beyond this point, and exp(-beta^2)
/// underflows the factor it feeds.
const ERF_SATURATION_BETA: f64 = 6.0;

const MINUS_I: Complex64 = Complex64::new(0.0, -1.0);

/// Zero-temperature pole line shape `-i / (pole - sqrt(E))`.
///
/// The caller scales by `1/E` and the per-channel residue; together these
/// reproduce the T = 0 cross-section term exactly.
pub fn unbroadened_term(sqrt_e: f64, pole: Complex64) -> Complex64 {
    MINUS_I / (pole - sqrt_e)
}

/// Faddeeva-type broadening function in the pole-integral convention:
/// `w(z)` for arguments in the upper half plane, continued to the lower half
/// plane by `-conj(w(conj(z)))`.
pub fn broadened_term(z: Complex64) -> Complex64 {
    if z.im > 0.0 {
        faddeeva_w(z)
    } else {
        -faddeeva_w(z.conj()).conj()
    }
}

/// Doppler-broadened curvefit basis: factor `k` is the broadened image of
/// `E^(k/2 - 1)` at Doppler width `dopp = sqrt(AWR) / sqrt(kB T)`.
///
/// The first three factors have closed forms; higher orders follow from a
/// three-term recurrence in the half-integer power. `1/sqrt(E)` (k = 1) is a
/// fixed point of broadening and keeps its unbroadened value.
pub fn broadened_polynomial_factors(energy: f64, dopp: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }

    let sqrt_e = energy.sqrt();
    let beta = sqrt_e * dopp;
    let half_inv_dopp2 = 0.5 / (dopp * dopp);
    let quarter_inv_dopp4 = half_inv_dopp2 * half_inv_dopp2;

    let (erf_beta, exp_m_beta2) = if beta > ERF_SATURATION_BETA {
        (1.0, 0.0)
    } else {
        (erf(beta), (-beta * beta).exp())
    };

    // The seed formulas assume at least the (1/E, 1/sqrt(E), const) orders.
    let len = n.max(3);
    let mut factors = vec![0.0_f64; len];
    factors[0] = erf_beta / energy;
    factors[1] = 1.0 / sqrt_e;
    factors[2] = factors[0] * (half_inv_dopp2 + energy) + exp_m_beta2 / (beta * SQRT_PI);

    for i in 1..len - 2 {
        let order = i as f64;
        factors[i + 2] = if i == 1 {
            // The general recurrence would reach for the k = -1 factor here;
            // its coefficient is zero, so the term drops.
            factors[i] * (energy + (1.0 + 2.0 * order) * half_inv_dopp2)
        } else {
            -factors[i - 2] * (order - 1.0) * order * quarter_inv_dopp4
                + factors[i] * (energy + (1.0 + 2.0 * order) * half_inv_dopp2)
        };
    }

    factors.truncate(n);
    factors
}

/// Real error function through the Faddeeva kernel:
/// `erfc(x) = exp(-x^2) Re w(ix)` for `x >= 0`.
fn erf(x: f64) -> f64 {
    1.0 - (-x * x).exp() * faddeeva_w(Complex64::new(0.0, x)).re
}
