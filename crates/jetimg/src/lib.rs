//! # jetimg
//!
//! Turns collider jets into fixed-size images for classifiers.
//!
//! ## Modules
//!
//! - **core**: `Tensor`, `ByteTensor`, `CodecConfig` and the shared error type
//! - **kinematics**: four-vectors, jets and the leading-particle coordinate transform
//! - **raster**: pt-weighted (eta, phi) histograms
//! - **quantize**: 8-bit logarithmic quantization and its inverse
//! - **io**: CSV jet tables, JSON configs and the binary image archive
//! - **pipeline**: batch encoding, dataset splitting and archive building

/// Tensors, configuration and errors.
pub use jetimg_core as core;

/// Four-vectors and the coordinate transform.
pub use jetimg_kinematics as kinematics;

/// Histogram rasterization.
pub use jetimg_raster as raster;

/// Logarithmic quantization.
pub use jetimg_quantize as quantize;

/// I/O utilities.
pub use jetimg_io as io;

/// Pipeline API.
pub use jetimg_pipeline as pipeline;

pub use jetimg_core::{CodecConfig, JetImageError, JetImageResult};
pub use jetimg_pipeline::JetImagePipeline;
