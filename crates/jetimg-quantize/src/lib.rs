pub mod quantizer;

pub use jetimg_core::RangePolicy;
pub use quantizer::{ClampCounts, LogQuantizer};
