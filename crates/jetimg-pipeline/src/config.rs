use crate::split::check_ratios;
use jetimg_core::{CodecConfig, JetImageError, JetImageResult};
use jetimg_io::CsvLayout;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the jet tables come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputSources {
    /// One table per split, used as given.
    Separate {
        train: PathBuf,
        test: PathBuf,
        validation: PathBuf,
    },
    /// One table, shuffled and cut into the three splits.
    Single {
        path: PathBuf,
        test_ratio: f64,
        validation_ratio: f64,
        #[serde(default)]
        seed: Option<u64>,
    },
}

/// Everything needed to turn jet tables into an image archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub layout: CsvLayout,
    pub inputs: InputSources,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    pub output: PathBuf,
}

fn default_chunk_size() -> usize {
    10_000
}

impl PipelineConfig {
    /// Config for three per-split tables with default codec settings.
    pub fn separate(
        train: impl Into<PathBuf>,
        test: impl Into<PathBuf>,
        validation: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        PipelineConfig {
            codec: CodecConfig::default(),
            layout: CsvLayout::default(),
            inputs: InputSources::Separate {
                train: train.into(),
                test: test.into(),
                validation: validation.into(),
            },
            chunk_size: default_chunk_size(),
            output: output.into(),
        }
    }

    pub fn validate(&self) -> JetImageResult<()> {
        self.codec.validate()?;
        if self.chunk_size == 0 {
            return Err(JetImageError::InvalidConfig(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        if let InputSources::Single {
            test_ratio,
            validation_ratio,
            ..
        } = self.inputs
        {
            check_ratios(test_ratio, validation_ratio)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_source() {
        let json = r#"{
            "inputs": {"kind": "single", "path": "jets.csv", "test_ratio": 0.2, "validation_ratio": 0.1},
            "output": "images.bin"
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
        assert_eq!(config.chunk_size, 10_000);
        assert_eq!(config.codec, CodecConfig::default());
        assert!(matches!(config.inputs, InputSources::Single { seed: None, .. }));
    }

    #[test]
    fn test_parse_separate_sources_with_codec_overrides() {
        let json = r#"{
            "codec": {"slots": 50, "bins_eta": 20, "bins_phi": 20},
            "layout": {"label_column": "label"},
            "inputs": {"kind": "separate", "train": "a.csv", "test": "b.csv", "validation": "c.csv"},
            "chunk_size": 512,
            "output": "out.bin"
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.codec.slots, 50);
        assert_eq!(config.layout.label_column, "label");
        assert_eq!(config.layout.energy_prefix, "E_");
        assert_eq!(config.chunk_size, 512);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = PipelineConfig::separate("a", "b", "c", "out");
        config.validate().unwrap();
        config.chunk_size = 0;
        assert!(config.validate().is_err());

        config.chunk_size = 10;
        config.inputs = InputSources::Single {
            path: "x".into(),
            test_ratio: 0.5,
            validation_ratio: 0.5,
            seed: Some(1),
        };
        assert!(config.validate().is_err());
    }
}
