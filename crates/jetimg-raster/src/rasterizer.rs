use crate::binning::AxisBinning;
use jetimg_core::{CodecConfig, Float, JetImageResult, Shape, Tensor};
use jetimg_kinematics::RelativeJet;
use rayon::prelude::*;

/// Bookkeeping from one rasterization.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RasterStats {
    /// Particles with non-zero pt that landed in a cell.
    pub binned: usize,
    /// Particles with non-zero pt outside the image range.
    pub dropped: usize,
}

/// Bins relative (eta, phi) into a pt-weighted grid.
///
/// Rows index eta, columns index phi. Each cell holds the summed relative pt
/// of the particles inside it; particles outside the range are dropped, not
/// clipped to the border.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    eta: AxisBinning,
    phi: AxisBinning,
}

impl Rasterizer {
    pub fn new(config: &CodecConfig) -> JetImageResult<Self> {
        config.validate()?;
        Ok(Rasterizer {
            eta: AxisBinning::new(config.bins_eta, config.eta_range),
            phi: AxisBinning::new(config.bins_phi, config.phi_range),
        })
    }

    /// Cell `(row, col)` for a point, if it is inside the image.
    pub fn cell(&self, eta: f64, phi: f64) -> Option<(usize, usize)> {
        Some((self.eta.index(eta)?, self.phi.index(phi)?))
    }

    /// Rasterize one jet into a `[bins_eta, bins_phi]` grid.
    pub fn rasterize<T: Float>(&self, jet: &RelativeJet<T>) -> JetImageResult<Tensor<T>> {
        self.rasterize_with_stats(jet).map(|(grid, _)| grid)
    }

    pub fn rasterize_with_stats<T: Float>(
        &self,
        jet: &RelativeJet<T>,
    ) -> JetImageResult<(Tensor<T>, RasterStats)> {
        let mut grid = Tensor::zeros(vec![self.eta.bins(), self.phi.bins()]);
        let mut stats = RasterStats::default();
        for p in &jet.particles {
            // zero weight adds nothing; padding slots all sit at the origin
            if p.pt == T::ZERO {
                continue;
            }
            match self.cell(p.eta.to_f64(), p.phi.to_f64()) {
                Some((row, col)) => {
                    grid.add_at(&[row, col], p.pt)?;
                    stats.binned += 1;
                }
                None => stats.dropped += 1,
            }
        }
        Ok((grid, stats))
    }

    /// Rasterize jets in parallel into `[n, bins_eta, bins_phi, 1]`.
    pub fn rasterize_batch<T: Float>(&self, jets: &[RelativeJet<T>]) -> JetImageResult<Tensor<T>> {
        let item_shape = Shape::new(vec![self.eta.bins(), self.phi.bins(), 1]);
        let grids: Vec<Tensor<T>> = jets
            .par_iter()
            .map(|jet| self.rasterize(jet)?.reshape(item_shape.to_vec()))
            .collect::<JetImageResult<_>>()?;
        Tensor::stack(&grids, &item_shape)
    }
}
