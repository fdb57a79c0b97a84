use jetimg_core::{ByteTensor, CodecConfig, JetImageResult, Shape, Tensor};
use jetimg_io::ImageSplit;
use jetimg_kinematics::{CoordinateTransform, Jet, RelativeJet};
use jetimg_quantize::{ClampCounts, LogQuantizer};
use jetimg_raster::Rasterizer;
use log::{debug, warn};

/// Quantized images for a batch of jets, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedBatch {
    /// `[n, bins_eta, bins_phi, 1]`
    pub images: ByteTensor,
    pub labels: Vec<i64>,
    pub clamped: ClampCounts,
}

impl EncodedBatch {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn into_split(self) -> JetImageResult<ImageSplit> {
        ImageSplit::new(self.images, self.labels)
    }
}

/// Transform, rasterize and quantize jets with one fixed configuration.
#[derive(Debug, Clone)]
pub struct JetImagePipeline {
    config: CodecConfig,
    transform: CoordinateTransform,
    rasterizer: Rasterizer,
    quantizer: LogQuantizer,
}

impl JetImagePipeline {
    pub fn new(config: &CodecConfig) -> JetImageResult<Self> {
        Ok(JetImagePipeline {
            config: config.clone(),
            transform: CoordinateTransform::new(config)?,
            rasterizer: Rasterizer::new(config)?,
            quantizer: LogQuantizer::new(config)?,
        })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn quantizer(&self) -> &LogQuantizer {
        &self.quantizer
    }

    /// Unquantized image `[bins_eta, bins_phi, 1]` of relative pt.
    pub fn image(&self, jet: &Jet<f64>) -> JetImageResult<Tensor<f64>> {
        let relative = self.transform.apply(jet)?;
        self.rasterizer
            .rasterize(&relative)?
            .reshape(self.config.image_shape().to_vec())
    }

    /// Quantized image `[bins_eta, bins_phi, 1]`.
    pub fn encode(&self, jet: &Jet<f64>) -> JetImageResult<ByteTensor> {
        self.quantizer.quantize(&self.image(jet)?)
    }

    /// Encode jets in parallel. Image `i` and label `i` both come from `jets[i]`.
    pub fn encode_batch(&self, jets: &[Jet<f64>]) -> JetImageResult<EncodedBatch> {
        let relative = self.transform.apply_batch(jets)?;
        let grids = self.rasterizer.rasterize_batch(&relative)?;
        let (images, clamped) = self.quantizer.quantize_counted(&grids)?;
        let labels = relative.iter().map(RelativeJet::label).collect();
        Ok(EncodedBatch {
            images,
            labels,
            clamped,
        })
    }

    /// Decode quantized images of any shape back to intensities.
    pub fn decode(&self, images: &ByteTensor) -> JetImageResult<Tensor<f64>> {
        self.quantizer.dequantize(images)
    }

    /// Encode a stream of jet chunks into one split, appending chunks in order.
    pub fn encode_chunks<I>(&self, chunks: I) -> JetImageResult<ImageSplit>
    where
        I: IntoIterator<Item = JetImageResult<Vec<Jet<f64>>>>,
    {
        let item = self.config.image_shape();
        let mut batches = Vec::new();
        let mut labels = Vec::new();
        let mut clamped = ClampCounts::default();
        for (i, chunk) in chunks.into_iter().enumerate() {
            let jets = chunk?;
            let batch = self.encode_batch(&jets)?;
            let active: usize = jets.iter().map(Jet::n_active).sum();
            debug!(
                "chunk {}: encoded {} jets, {} non-empty particle slots",
                i,
                batch.len(),
                active
            );
            clamped += batch.clamped;
            labels.extend(batch.labels);
            batches.push(batch.images);
        }
        if clamped.total() > 0 {
            warn!(
                "{} intensities outside the log range were clamped ({} low, {} high)",
                clamped.total(),
                clamped.low,
                clamped.high
            );
        }
        ImageSplit::new(ByteTensor::concat(&batches, &item)?, labels)
    }

    pub fn image_shape(&self) -> Shape {
        self.config.image_shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use jetimg_core::JetImageError;
    use jetimg_kinematics::FourVector;

    fn jet(lead_pt: f64, is_signal: bool) -> Jet<f64> {
        Jet::new(
            vec![
                FourVector::new(lead_pt, lead_pt, 0.0, 0.0),
                FourVector::new(lead_pt / 2.0, lead_pt / 2.0, 0.0, 0.0),
                FourVector::new(0.0, 0.0, 0.0, 0.0),
            ],
            is_signal,
        )
        .unwrap()
    }

    fn pipeline() -> JetImagePipeline {
        let config = CodecConfig {
            slots: 3,
            ..CodecConfig::default()
        };
        JetImagePipeline::new(&config).unwrap()
    }

    #[test]
    fn test_encode_single_jet() {
        let p = pipeline();
        let image = p.image(&jet(10.0, true)).unwrap();
        assert_eq!(image.shape_vec(), vec![40, 40, 1]);
        assert_relative_eq!(image.get(&[20, 20, 0]).unwrap(), 1.5, epsilon = 1e-12);
        assert_relative_eq!(image.sum_all(), 1.5, epsilon = 1e-12);

        let codes = p.encode(&jet(10.0, true)).unwrap();
        assert_eq!(codes.count_nonzero(), 1);
        let back = p.decode(&codes).unwrap();
        let rel = (back.get(&[20, 20, 0]).unwrap() - 1.5).abs() / 1.5;
        assert!(rel <= p.quantizer().step_factor() - 1.0);
    }

    #[test]
    fn test_batch_keeps_order_and_labels() {
        let p = pipeline();
        let jets: Vec<Jet<f64>> = (0..50).map(|i| jet(1.0 + i as f64, i % 3 == 0)).collect();
        let batch = p.encode_batch(&jets).unwrap();
        assert_eq!(batch.images.shape_vec(), vec![50, 40, 40, 1]);
        assert_eq!(batch.len(), 50);
        for (i, j) in jets.iter().enumerate() {
            assert_eq!(batch.labels[i], j.label());
            assert_eq!(batch.images.outer(i).unwrap(), p.encode(j).unwrap());
        }
        assert_eq!(batch.clamped.total(), 0);
    }

    #[test]
    fn test_empty_batch() {
        let batch = pipeline().encode_batch(&[]).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.images.shape_vec(), vec![0, 40, 40, 1]);
    }

    #[test]
    fn test_degenerate_jet_encodes_to_zeros() {
        let p = pipeline();
        let empty = Jet::new(vec![FourVector::new(0.0, 0.0, 0.0, 0.0); 3], false).unwrap();
        let codes = p.encode(&empty).unwrap();
        assert_eq!(codes.count_nonzero(), 0);
        let back = p.decode(&codes).unwrap();
        assert_eq!(back.sum_all(), 0.0);
    }

    #[test]
    fn test_batch_with_degenerate_jet() {
        let p = pipeline();
        let empty = Jet::new(vec![FourVector::new(0.0, 0.0, 0.0, 0.0); 3], true).unwrap();
        let jets = vec![jet(4.0, false), empty, jet(8.0, true)];
        let batch = p.encode_batch(&jets).unwrap();
        assert_eq!(batch.labels, vec![0, 1, 1]);
        assert_eq!(batch.images.outer(1).unwrap().count_nonzero(), 0);
        assert_eq!(batch.images.outer(0).unwrap(), p.encode(&jets[0]).unwrap());
        assert_eq!(batch.images.outer(2).unwrap(), p.encode(&jets[2]).unwrap());
    }

    #[test]
    fn test_wrong_slot_count_fails() {
        let p = pipeline();
        let short = Jet::new(vec![FourVector::new(1.0, 1.0, 0.0, 0.0)], true).unwrap();
        assert!(matches!(
            p.encode_batch(&[jet(1.0, true), short]),
            Err(JetImageError::ParticleCount { .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = CodecConfig {
            bins_eta: 0,
            ..CodecConfig::default()
        };
        assert!(JetImagePipeline::new(&config).is_err());
    }

    #[test]
    fn test_encode_chunks_appends_in_order() {
        let p = pipeline();
        let jets: Vec<Jet<f64>> = (0..7).map(|i| jet(2.0 + i as f64, i % 2 == 1)).collect();
        let chunks = vec![Ok(jets[..3].to_vec()), Ok(jets[3..6].to_vec()), Ok(jets[6..].to_vec())];
        let split = p.encode_chunks(chunks).unwrap();
        assert_eq!(split.len(), 7);
        assert_eq!(split.labels(), &[0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(split.images(), &p.encode_batch(&jets).unwrap().images);

        let none = p.encode_chunks(Vec::new()).unwrap();
        assert!(none.is_empty());
        assert_eq!(none.image_shape().unwrap(), p.image_shape());
    }

    #[test]
    fn test_encode_chunks_stops_at_error() {
        let p = pipeline();
        let chunks = vec![
            Ok(vec![jet(1.0, true)]),
            Err(JetImageError::MissingColumn("E_0".to_string())),
        ];
        assert!(p.encode_chunks(chunks).is_err());
    }
}
