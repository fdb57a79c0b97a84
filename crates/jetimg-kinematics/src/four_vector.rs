use jetimg_core::Float;
use serde::{Deserialize, Serialize};

/// A particle's (energy, px, py, pz).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct FourVector<T: Float> {
    pub e: T,
    pub px: T,
    pub py: T,
    pub pz: T,
}

impl<T: Float> FourVector<T> {
    pub fn new(e: T, px: T, py: T, pz: T) -> Self {
        FourVector { e, px, py, pz }
    }

    /// Transverse momentum, sqrt(px² + py²).
    pub fn pt(&self) -> T {
        (self.px * self.px + self.py * self.py).sqrt()
    }

    /// Pseudorapidity asinh(pz / pt). `None` when pt is zero.
    pub fn eta(&self) -> Option<T> {
        let pt = self.pt();
        if pt == T::ZERO {
            return None;
        }
        Some((self.pz / pt).asinh())
    }

    /// Angle asin(py / pt). `None` when pt is zero.
    ///
    /// This is not the azimuth atan2(py, px): it folds px < 0 onto px > 0 and
    /// only spans [-π/2, π/2]. Image coordinates depend on this exact form, so
    /// it must not be replaced by the true azimuth.
    pub fn phi(&self) -> Option<T> {
        let pt = self.pt();
        if pt == T::ZERO {
            return None;
        }
        // rounding can push |py / pt| a hair past 1
        let ratio = (self.py / pt).max(T::NEG_ONE).min(T::ONE);
        Some(ratio.asin())
    }

    /// Zero-padded slot.
    pub fn is_empty(&self) -> bool {
        self.e == T::ZERO && self.px == T::ZERO && self.py == T::ZERO && self.pz == T::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pt() {
        let p = FourVector::new(10.0, 3.0, 4.0, 0.0);
        assert_eq!(p.pt(), 5.0);
    }

    #[test]
    fn test_eta_phi() {
        let p = FourVector::new(10.0, 3.0, 4.0, 5.0);
        assert_relative_eq!(p.eta().unwrap(), 1.0f64.asinh(), epsilon = 1e-12);
        assert_relative_eq!(p.phi().unwrap(), 0.8f64.asin(), epsilon = 1e-12);
    }

    #[test]
    fn test_phi_is_folded_not_azimuth() {
        let forward = FourVector::new(5.0, 3.0, 4.0, 0.0);
        let backward = FourVector::new(5.0, -3.0, 4.0, 0.0);
        assert_eq!(forward.phi(), backward.phi());
    }

    #[test]
    fn test_zero_pt_is_undefined() {
        let p = FourVector::new(5.0, 0.0, 0.0, 2.0);
        assert_eq!(p.pt(), 0.0);
        assert!(p.eta().is_none());
        assert!(p.phi().is_none());
        assert!(!p.is_empty());
        assert!(FourVector::<f32>::default().is_empty());
    }

    #[test]
    fn test_phi_at_unit_ratio() {
        let p = FourVector::new(1.0f32, 0.0, -7.0, 0.0);
        assert_relative_eq!(p.phi().unwrap(), -std::f32::consts::FRAC_PI_2);
    }
}
