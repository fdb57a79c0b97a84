use crate::config::{InputSources, PipelineConfig};
use crate::pipeline::JetImagePipeline;
use crate::split::train_test_validation_split;
use jetimg_core::JetImageResult;
use jetimg_io::{read_jets, ImageArchive, ImageSplit, JetCsvReader, SplitKind};
use jetimg_kinematics::Jet;
use log::info;
use std::path::Path;

/// Read the configured jet tables and encode them into an [`ImageArchive`].
///
/// Separate tables are streamed in `chunk_size` chunks. A single table is
/// read whole, since it has to be shuffled before splitting.
pub fn build_archive(config: &PipelineConfig) -> JetImageResult<ImageArchive> {
    config.validate()?;
    let pipeline = JetImagePipeline::new(&config.codec)?;

    let (train, test, validation) = match &config.inputs {
        InputSources::Separate {
            train,
            test,
            validation,
        } => (
            encode_file(&pipeline, config, SplitKind::Train, train)?,
            encode_file(&pipeline, config, SplitKind::Test, test)?,
            encode_file(&pipeline, config, SplitKind::Validation, validation)?,
        ),
        InputSources::Single {
            path,
            test_ratio,
            validation_ratio,
            seed,
        } => {
            let jets = read_jets(path, &config.layout, config.codec.slots)?;
            info!("read {} jets from {}", jets.len(), path.display());
            let (train, test, validation) =
                train_test_validation_split(jets, *test_ratio, *validation_ratio, *seed)?;
            (
                encode_jets(&pipeline, config, SplitKind::Train, train)?,
                encode_jets(&pipeline, config, SplitKind::Test, test)?,
                encode_jets(&pipeline, config, SplitKind::Validation, validation)?,
            )
        }
    };

    ImageArchive::new(config.codec.clone(), train, test, validation)
}

fn encode_file(
    pipeline: &JetImagePipeline,
    config: &PipelineConfig,
    kind: SplitKind,
    path: &Path,
) -> JetImageResult<ImageSplit> {
    let reader = JetCsvReader::from_path(path, &config.layout, config.codec.slots)?;
    let split = pipeline.encode_chunks(reader.chunks(config.chunk_size))?;
    log_split(kind, &split);
    Ok(split)
}

fn encode_jets(
    pipeline: &JetImagePipeline,
    config: &PipelineConfig,
    kind: SplitKind,
    jets: Vec<Jet<f64>>,
) -> JetImageResult<ImageSplit> {
    let chunks: Vec<JetImageResult<Vec<Jet<f64>>>> = jets
        .chunks(config.chunk_size)
        .map(|c| Ok(c.to_vec()))
        .collect();
    let split = pipeline.encode_chunks(chunks)?;
    log_split(kind, &split);
    Ok(split)
}

fn log_split(kind: SplitKind, split: &ImageSplit) {
    match split.signal_fraction() {
        Some(f) => info!("{} split: {} images, signal fraction {:.3}", kind, split.len(), f),
        None => info!("{} split: empty", kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetimg_core::{CodecConfig, JetImageError};
    use jetimg_io::write_jets;
    use jetimg_kinematics::FourVector;

    fn jets(n: usize, offset: usize) -> Vec<Jet<f64>> {
        (0..n)
            .map(|i| {
                let pt = 1.0 + (i + offset) as f64;
                Jet::new(
                    vec![
                        FourVector::new(pt, pt, 0.0, 0.0),
                        FourVector::new(pt / 4.0, 0.0, pt / 4.0, 0.0),
                    ],
                    (i + offset) % 2 == 0,
                )
                .unwrap()
            })
            .collect()
    }

    fn codec() -> CodecConfig {
        CodecConfig {
            slots: 2,
            ..CodecConfig::default()
        }
    }

    #[test]
    fn test_build_from_separate_tables() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<_> = ["train.csv", "test.csv", "val.csv"]
            .iter()
            .map(|n| dir.path().join(n))
            .collect();
        write_jets(&paths[0], &jets(9, 0), &Default::default()).unwrap();
        write_jets(&paths[1], &jets(4, 100), &Default::default()).unwrap();
        write_jets(&paths[2], &jets(3, 200), &Default::default()).unwrap();

        let mut config = PipelineConfig::separate(
            &paths[0],
            &paths[1],
            &paths[2],
            dir.path().join("out.bin"),
        );
        config.codec = codec();
        config.chunk_size = 4;

        let archive = build_archive(&config).unwrap();
        assert_eq!(archive.train.len(), 9);
        assert_eq!(archive.test.len(), 4);
        assert_eq!(archive.validation.len(), 3);
        assert_eq!(archive.train.labels(), &[1, 0, 1, 0, 1, 0, 1, 0, 1]);

        let pipeline = JetImagePipeline::new(&codec()).unwrap();
        let expected = pipeline.encode_batch(&jets(9, 0)).unwrap();
        assert_eq!(archive.train.images(), &expected.images);
    }

    #[test]
    fn test_build_from_single_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all.csv");
        write_jets(&path, &jets(20, 0), &Default::default()).unwrap();

        let mut config = PipelineConfig::separate("", "", "", dir.path().join("out.bin"));
        config.codec = codec();
        config.inputs = InputSources::Single {
            path,
            test_ratio: 0.25,
            validation_ratio: 0.25,
            seed: Some(3),
        };

        let archive = build_archive(&config).unwrap();
        assert_eq!(archive.train.len(), 10);
        assert_eq!(archive.test.len(), 5);
        assert_eq!(archive.validation.len(), 5);
        assert_eq!(archive.total_len(), 20);
        assert_eq!(archive, build_archive(&config).unwrap());
    }

    #[test]
    fn test_build_reports_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("narrow.csv");
        write_jets(&path, &jets(2, 0), &Default::default()).unwrap();

        let mut config = PipelineConfig::separate(&path, &path, &path, dir.path().join("out.bin"));
        config.codec = CodecConfig {
            slots: 3,
            ..CodecConfig::default()
        };
        assert!(matches!(
            build_archive(&config),
            Err(JetImageError::MissingColumn(ref c)) if c == "E_2"
        ));
    }
}
