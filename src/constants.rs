//! Physical and mathematical constants shared by the evaluation kernels.
//!
//! Values match the reference nuclear-data conventions so that cross sections
//! come out in barns when pole residues carry the standard units.

pub const PI: f64 = 3.141_592_653_589_793_238_462_643_383_279_5_f64;
pub const SQRT_PI: f64 = 1.772_453_850_905_516_027_298_167_483_341_f64;
pub const INV_SQRT_PI: f64 = 0.564_189_583_547_756_286_948_079_451_561_f64;

/// Boltzmann constant in eV per kelvin.
pub const K_BOLTZMANN: f64 = 8.617_330_3e-5_f64;

#[cfg(test)]
mod tests {
    use super::{INV_SQRT_PI, K_BOLTZMANN, PI, SQRT_PI};

    #[test]
    fn constants_match_expected_relationships() {
        assert!((SQRT_PI * SQRT_PI - PI).abs() <= 1.0e-15);
        assert!((SQRT_PI * INV_SQRT_PI - 1.0).abs() <= 1.0e-15);
    }

    #[test]
    fn boltzmann_constant_is_in_ev_per_kelvin() {
        assert!(K_BOLTZMANN > 8.0e-5 && K_BOLTZMANN < 9.0e-5);
        // Room temperature kT should be about 0.0259 eV.
        let kt = K_BOLTZMANN * 300.0;
        assert!((kt - 0.025852).abs() <= 1.0e-5);
    }
}
