use crate::four_vector::FourVector;
use jetimg_core::{Float, JetImageError, JetImageResult};
use serde::{Deserialize, Serialize};

/// A jet: fixed-slot particle list plus its signal label.
///
/// Slot 0 is the leading particle. Unused slots are zero-padded, never
/// removed, so slot indices stay aligned across a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct Jet<T: Float> {
    particles: Vec<FourVector<T>>,
    is_signal: bool,
}

impl<T: Float> Jet<T> {
    pub fn new(particles: Vec<FourVector<T>>, is_signal: bool) -> JetImageResult<Self> {
        if particles.is_empty() {
            return Err(JetImageError::ParticleCount {
                expected: 1,
                got: 0,
            });
        }
        Ok(Jet {
            particles,
            is_signal,
        })
    }

    /// Build from flat `[E_0, px_0, py_0, pz_0, E_1, ...]` values.
    pub fn from_flat(values: &[T], slots: usize, is_signal: bool) -> JetImageResult<Self> {
        if slots == 0 || values.len() != slots * 4 {
            return Err(JetImageError::ParticleCount {
                expected: slots,
                got: values.len() / 4,
            });
        }
        let particles = values
            .chunks_exact(4)
            .map(|c| FourVector::new(c[0], c[1], c[2], c[3]))
            .collect();
        Jet::new(particles, is_signal)
    }

    pub fn particles(&self) -> &[FourVector<T>] {
        &self.particles
    }

    pub fn leading(&self) -> &FourVector<T> {
        &self.particles[0]
    }

    pub fn slots(&self) -> usize {
        self.particles.len()
    }

    /// Number of non-padding slots.
    pub fn n_active(&self) -> usize {
        self.particles.iter().filter(|p| !p.is_empty()).count()
    }

    pub fn is_signal(&self) -> bool {
        self.is_signal
    }

    /// Integer label: 1 for signal, 0 for background.
    pub fn label(&self) -> i64 {
        i64::from(self.is_signal)
    }

    /// Fail unless the jet has exactly `expected` slots.
    pub fn check_slots(&self, expected: usize) -> JetImageResult<()> {
        if self.slots() != expected {
            return Err(JetImageError::ParticleCount {
                expected,
                got: self.slots(),
            });
        }
        Ok(())
    }
}

/// One particle in leading-particle coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct RelativeParticle<T: Float> {
    /// pt divided by the leading particle's pt.
    pub pt: T,
    pub eta: T,
    pub phi: T,
}

/// A jet after the coordinate transform. Slot order matches the source jet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct RelativeJet<T: Float> {
    pub particles: Vec<RelativeParticle<T>>,
    pub is_signal: bool,
}

impl<T: Float> RelativeJet<T> {
    pub fn label(&self) -> i64 {
        i64::from(self.is_signal)
    }
}
