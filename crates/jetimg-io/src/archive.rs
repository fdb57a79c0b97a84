use jetimg_core::{ByteTensor, CodecConfig, JetImageError, JetImageResult, Shape};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const ARCHIVE_FORMAT: &str = "jetimg-archive";
const ARCHIVE_VERSION: u32 = 1;
const ZSTD_LEVEL: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitKind {
    Train,
    Test,
    Validation,
}

impl SplitKind {
    pub const ALL: [SplitKind; 3] = [SplitKind::Train, SplitKind::Test, SplitKind::Validation];

    pub fn as_str(&self) -> &'static str {
        match self {
            SplitKind::Train => "train",
            SplitKind::Test => "test",
            SplitKind::Validation => "validation",
        }
    }
}

impl fmt::Display for SplitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quantized images `[n, bins_eta, bins_phi, 1]` with their 0/1 labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSplit {
    images: ByteTensor,
    labels: Vec<i64>,
}

impl ImageSplit {
    pub fn new(images: ByteTensor, labels: Vec<i64>) -> JetImageResult<Self> {
        let dims = images.shape().dims();
        if dims.len() != 4 || dims[3] != 1 {
            return Err(JetImageError::InvalidAxis {
                axis: 3,
                ndim: dims.len(),
            });
        }
        if dims[0] != labels.len() {
            return Err(JetImageError::LabelMismatch {
                images: dims[0],
                labels: labels.len(),
            });
        }
        if let Some(&bad) = labels.iter().find(|&&l| l != 0 && l != 1) {
            return Err(JetImageError::InvalidLabel(bad));
        }
        Ok(ImageSplit { images, labels })
    }

    /// A split with no images, shaped for `config`.
    pub fn empty(config: &CodecConfig) -> Self {
        ImageSplit {
            images: ByteTensor::zeros(config.image_shape().batched(0).to_vec()),
            labels: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn images(&self) -> &ByteTensor {
        &self.images
    }

    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Shape of one image, `[bins_eta, bins_phi, 1]`.
    pub fn image_shape(&self) -> JetImageResult<Shape> {
        self.images.shape().item()
    }

    /// Fraction of signal jets; `None` for an empty split.
    pub fn signal_fraction(&self) -> Option<f64> {
        if self.labels.is_empty() {
            return None;
        }
        let signal = self.labels.iter().filter(|&&l| l == 1).count();
        Some(signal as f64 / self.labels.len() as f64)
    }
}

/// The three dataset splits plus the codec settings that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageArchive {
    format: String,
    version: u32,
    pub config: CodecConfig,
    pub train: ImageSplit,
    pub test: ImageSplit,
    pub validation: ImageSplit,
}

impl ImageArchive {
    pub fn new(
        config: CodecConfig,
        train: ImageSplit,
        test: ImageSplit,
        validation: ImageSplit,
    ) -> JetImageResult<Self> {
        let expected = config.image_shape();
        for split in [&train, &test, &validation] {
            let got = split.image_shape()?;
            if got != expected {
                return Err(JetImageError::ShapeMismatch {
                    expected: expected.to_vec(),
                    got: got.to_vec(),
                });
            }
        }
        Ok(ImageArchive {
            format: ARCHIVE_FORMAT.to_string(),
            version: ARCHIVE_VERSION,
            config,
            train,
            test,
            validation,
        })
    }

    pub fn split(&self, kind: SplitKind) -> &ImageSplit {
        match kind {
            SplitKind::Train => &self.train,
            SplitKind::Test => &self.test,
            SplitKind::Validation => &self.validation,
        }
    }

    pub fn total_len(&self) -> usize {
        SplitKind::ALL.iter().map(|&k| self.split(k).len()).sum()
    }
}

fn bincode_error(e: bincode::Error) -> JetImageError {
    JetImageError::Serialization(format!("Bincode error: {}", e))
}

/// Write an archive to `path` as a zstd-compressed bincode stream.
pub fn write_archive(path: impl AsRef<Path>, archive: &ImageArchive) -> JetImageResult<()> {
    let path = path.as_ref();
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = zstd::Encoder::new(file, ZSTD_LEVEL)?;
    bincode::serialize_into(&mut encoder, archive).map_err(bincode_error)?;
    let mut file = encoder.finish()?;
    file.flush()?;
    info!(
        "wrote {} images to {} (train {}, test {}, validation {})",
        archive.total_len(),
        path.display(),
        archive.train.len(),
        archive.test.len(),
        archive.validation.len()
    );
    Ok(())
}

/// Read an archive written by [`write_archive`].
pub fn read_archive(path: impl AsRef<Path>) -> JetImageResult<ImageArchive> {
    let decoder = zstd::Decoder::new(File::open(path.as_ref())?)?;
    let archive: ImageArchive = bincode::deserialize_from(decoder).map_err(bincode_error)?;
    if archive.format != ARCHIVE_FORMAT || archive.version != ARCHIVE_VERSION {
        return Err(JetImageError::Serialization(format!(
            "unsupported archive {} v{}",
            archive.format, archive.version
        )));
    }
    // rebuild so shape and label checks also cover files from elsewhere
    let ImageArchive {
        config,
        train,
        test,
        validation,
        ..
    } = archive;
    config.validate()?;
    ImageArchive::new(
        config,
        ImageSplit::new(train.images, train.labels)?,
        ImageSplit::new(test.images, test.labels)?,
        ImageSplit::new(validation.images, validation.labels)?,
    )
}
