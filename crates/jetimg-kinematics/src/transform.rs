use crate::jet::{Jet, RelativeJet, RelativeParticle};
use jetimg_core::{CodecConfig, Float, JetImageResult};
use log::warn;
use rayon::prelude::*;

/// Express every particle relative to the leading particle.
///
/// `pt` is divided by the leading pt; `eta` and `phi` have the leading values
/// subtracted. Undefined results (zero-pt particles, a zero-pt leading
/// particle, 0/0) resolve to 0. For any jet whose leading pt is non-zero the
/// leading particle maps to (1, 0, 0).
pub fn to_relative<T: Float>(jet: &Jet<T>) -> RelativeJet<T> {
    let lead = jet.leading();
    let pt0 = lead.pt();
    let eta0 = lead.eta();
    let phi0 = lead.phi();

    let particles = jet
        .particles()
        .iter()
        .map(|p| RelativeParticle {
            pt: (p.pt() / pt0).finite_or_zero(),
            eta: relative(p.eta(), eta0),
            phi: relative(p.phi(), phi0),
        })
        .collect();

    RelativeJet {
        particles,
        is_signal: jet.is_signal(),
    }
}

fn relative<T: Float>(value: Option<T>, reference: Option<T>) -> T {
    match (value, reference) {
        (Some(v), Some(r)) => (v - r).finite_or_zero(),
        _ => T::ZERO,
    }
}

/// Coordinate transform stage bound to a fixed slot count.
#[derive(Debug, Clone)]
pub struct CoordinateTransform {
    slots: usize,
}

impl CoordinateTransform {
    pub fn new(config: &CodecConfig) -> JetImageResult<Self> {
        config.validate()?;
        Ok(CoordinateTransform {
            slots: config.slots,
        })
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Transform one jet, rejecting a slot count other than the configured one.
    pub fn apply<T: Float>(&self, jet: &Jet<T>) -> JetImageResult<RelativeJet<T>> {
        jet.check_slots(self.slots)?;
        Ok(to_relative(jet))
    }

    /// Transform jets in parallel. Output order matches input order.
    pub fn apply_batch<T: Float>(&self, jets: &[Jet<T>]) -> JetImageResult<Vec<RelativeJet<T>>> {
        let out: Vec<RelativeJet<T>> = jets
            .par_iter()
            .map(|jet| self.apply(jet))
            .collect::<JetImageResult<_>>()?;

        let degenerate = jets.iter().filter(|j| j.leading().pt() == T::ZERO).count();
        if degenerate > 0 {
            warn!(
                "{} of {} jets have a zero-pt leading particle",
                degenerate,
                jets.len()
            );
        }
        Ok(out)
    }
}
