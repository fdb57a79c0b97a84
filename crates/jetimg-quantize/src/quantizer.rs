use jetimg_core::{
    AxisRange, ByteTensor, CodecConfig, Float, JetImageError, JetImageResult, RangePolicy, Tensor,
};
use log::trace;
use std::ops::AddAssign;

/// Highest code; codes `1..=MAX_CODE` cover the log range, 0 means empty.
const MAX_CODE: f64 = 255.0;

/// How many values were saturated by [`RangePolicy::Clamp`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClampCounts {
    /// Positive values below the range, stored as code 1.
    pub low: usize,
    /// Values above the range, stored as code 255.
    pub high: usize,
}

impl ClampCounts {
    pub fn total(&self) -> usize {
        self.low + self.high
    }
}

impl AddAssign for ClampCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.low += rhs.low;
        self.high += rhs.high;
    }
}

enum Code {
    Exact(u8),
    Low,
    High,
}

/// Logarithmic 8-bit codec for non-negative intensities.
///
/// `x > 0` is stored as `round((ln x - lo) / (hi - lo) * 255 + 1)`, so codes
/// `1..=255` span `[e^lo, e^hi]` with a constant multiplicative step of
/// `e^((hi - lo) / 255)`. Zero is stored as 0 and comes back as exactly 0.
///
/// Range checks compare `x` itself against `[e^lo, e^hi]`. Values inside
/// that interval whose rounded code lands on 256 are stored as 255 and never
/// count as out of range.
#[derive(Debug, Clone)]
pub struct LogQuantizer {
    range: AxisRange,
    policy: RangePolicy,
}

impl LogQuantizer {
    pub fn new(config: &CodecConfig) -> JetImageResult<Self> {
        config.validate()?;
        Ok(LogQuantizer {
            range: config.log_range,
            policy: config.range_policy,
        })
    }

    pub fn with_range(lo: f64, hi: f64, policy: RangePolicy) -> JetImageResult<Self> {
        let config = CodecConfig {
            log_range: AxisRange::new(lo, hi),
            range_policy: policy,
            ..CodecConfig::default()
        };
        LogQuantizer::new(&config)
    }

    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Ratio between the intensities of adjacent codes.
    pub fn step_factor(&self) -> f64 {
        (self.range.width() / MAX_CODE).exp()
    }

    fn code(&self, value: f64) -> JetImageResult<Code> {
        if !value.is_finite() || value < 0.0 {
            return Err(JetImageError::InvalidIntensity { value });
        }
        if value == 0.0 {
            return Ok(Code::Exact(0));
        }
        let code = if value < self.range.lo.exp() {
            Code::Low
        } else if value > self.range.hi.exp() {
            Code::High
        } else {
            let raw = ((value.ln() - self.range.lo) / self.range.width() * MAX_CODE + 1.0).round();
            Code::Exact(raw.clamp(1.0, MAX_CODE) as u8)
        };
        if self.policy == RangePolicy::Reject && !matches!(code, Code::Exact(_)) {
            return Err(JetImageError::OutOfRange {
                value,
                lo: self.range.lo,
                hi: self.range.hi,
            });
        }
        Ok(code)
    }

    /// Quantize one intensity.
    pub fn quantize_value<T: Float>(&self, x: T) -> JetImageResult<u8> {
        Ok(match self.code(x.to_f64())? {
            Code::Exact(q) => q,
            Code::Low => 1,
            Code::High => 255,
        })
    }

    /// Approximate intensity for one code.
    pub fn dequantize_value<T: Float>(&self, q: u8) -> T {
        if q == 0 {
            return T::ZERO;
        }
        let log_value = (f64::from(q) - 1.0) / MAX_CODE * self.range.width() + self.range.lo;
        T::from_f64(log_value.exp())
    }

    /// Quantize every element; the result keeps the input shape.
    pub fn quantize<T: Float>(&self, x: &Tensor<T>) -> JetImageResult<ByteTensor> {
        self.quantize_counted(x).map(|(codes, _)| codes)
    }

    /// Like [`quantize`](Self::quantize), also reporting saturated values.
    pub fn quantize_counted<T: Float>(
        &self,
        x: &Tensor<T>,
    ) -> JetImageResult<(ByteTensor, ClampCounts)> {
        let mut counts = ClampCounts::default();
        let mut codes = Vec::with_capacity(x.numel());
        for &v in x.data() {
            let q = match self.code(v.to_f64())? {
                Code::Exact(q) => q,
                Code::Low => {
                    counts.low += 1;
                    1
                }
                Code::High => {
                    counts.high += 1;
                    255
                }
            };
            codes.push(q);
        }
        if counts.total() > 0 {
            trace!("clamped {} low / {} high intensities", counts.low, counts.high);
        }
        Ok((ByteTensor::new(codes, x.shape_vec())?, counts))
    }

    /// Decode every element; the result keeps the input shape.
    pub fn dequantize<T: Float>(&self, q: &ByteTensor) -> JetImageResult<Tensor<T>> {
        let data = q.data().iter().map(|&c| self.dequantize_value(c)).collect();
        Tensor::new(data, q.shape_vec())
    }
}
