pub mod binning;
pub mod rasterizer;

pub use binning::AxisBinning;
pub use rasterizer::{RasterStats, Rasterizer};
