use crate::error::{JetImageError, JetImageResult};
use crate::shape::Shape;
use serde::{Deserialize, Serialize};

/// Closed coordinate interval `[lo, hi]` covered by one image axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub lo: f64,
    pub hi: f64,
}

impl AxisRange {
    pub fn new(lo: f64, hi: f64) -> Self {
        AxisRange { lo, hi }
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    fn validate(&self, name: &str) -> JetImageResult<()> {
        if !self.lo.is_finite() || !self.hi.is_finite() || self.lo >= self.hi {
            return Err(JetImageError::InvalidConfig(format!(
                "{} must satisfy lo < hi with finite bounds, got [{}, {}]",
                name, self.lo, self.hi
            )));
        }
        Ok(())
    }
}

/// How the quantizer treats intensities whose code falls outside `[1, 255]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Saturate to the nearest valid code. Positive values never map to 0.
    #[default]
    Clamp,
    /// Fail with `JetImageError::OutOfRange`.
    Reject,
}

/// Parameters shared by every stage of the jet image codec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Particle slots per jet; index 0 is the leading particle.
    pub slots: usize,
    pub bins_eta: usize,
    pub bins_phi: usize,
    pub eta_range: AxisRange,
    pub phi_range: AxisRange,
    /// Natural-log intensity range mapped onto codes 1..=255.
    pub log_range: AxisRange,
    pub range_policy: RangePolicy,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            slots: 200,
            bins_eta: 40,
            bins_phi: 40,
            eta_range: AxisRange::new(-1.0, 1.0),
            phi_range: AxisRange::new(-1.0, 1.0),
            log_range: AxisRange::new(-10.0, 5.0),
            range_policy: RangePolicy::Clamp,
        }
    }
}

impl CodecConfig {
    pub fn validate(&self) -> JetImageResult<()> {
        if self.slots == 0 {
            return Err(JetImageError::InvalidConfig(
                "slots must be at least 1".to_string(),
            ));
        }
        if self.bins_eta == 0 || self.bins_phi == 0 {
            return Err(JetImageError::InvalidConfig(format!(
                "bin counts must be positive, got {}x{}",
                self.bins_eta, self.bins_phi
            )));
        }
        self.eta_range.validate("eta_range")?;
        self.phi_range.validate("phi_range")?;
        self.log_range.validate("log_range")?;
        Ok(())
    }

    /// Shape of one image inside a batch: `[bins_eta, bins_phi, 1]`.
    pub fn image_shape(&self) -> Shape {
        Shape::new(vec![self.bins_eta, self.bins_phi, 1])
    }
}
