use thiserror::Error;

/// Error type shared by every jetimg crate.
#[derive(Debug, Error)]
pub enum JetImageError {
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Index out of bounds: index {index} for axis {axis} with size {size}")]
    IndexOutOfBounds {
        index: usize,
        axis: usize,
        size: usize,
    },

    #[error("Invalid axis: {axis} for array with {ndim} dimensions")]
    InvalidAxis { axis: usize, ndim: usize },

    #[error("Wrong particle count: expected {expected} slots, got {got}")]
    ParticleCount { expected: usize, got: usize },

    #[error("Invalid intensity {value}: must be finite and non-negative")]
    InvalidIntensity { value: f64 },

    #[error("Intensity {value} outside quantizable log range [{lo}, {hi}]")]
    OutOfRange { value: f64, lo: f64, hi: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Malformed record at row {row}, column '{column}': {reason}")]
    MalformedRecord {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("Invalid label {0}: expected 0 or 1")]
    InvalidLabel(i64),

    #[error("Label misalignment: {images} images but {labels} labels")]
    LabelMismatch { images: usize, labels: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type JetImageResult<T> = Result<T, JetImageError>;
