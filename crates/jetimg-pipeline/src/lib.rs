pub mod build;
pub mod config;
pub mod pipeline;
pub mod split;

pub use build::build_archive;
pub use config::{InputSources, PipelineConfig};
pub use pipeline::{EncodedBatch, JetImagePipeline};
pub use split::train_test_validation_split;
