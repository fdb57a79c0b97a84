pub mod bytes;
pub mod config;
pub mod dtype;
pub mod error;
pub mod shape;
pub mod tensor;

pub use bytes::ByteTensor;
pub use config::{AxisRange, CodecConfig, RangePolicy};
pub use dtype::Float;
pub use error::{JetImageError, JetImageResult};
pub use shape::Shape;
pub use tensor::Tensor;
