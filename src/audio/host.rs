// AudioHost - Backend, sample library and note RNG bundled for the cascade

use super::backend::AudioBackend;
use super::sampler::SampleLibrary;
use super::trait_def::{NodeBehavior, TriggerContext, Triggerable};
use crate::error::GraphResult;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Owns what node behaviors need when they fire
pub struct AudioHost<B: AudioBackend> {
    backend: B,
    samples: SampleLibrary,
    rng: StdRng,
}

impl<B: AudioBackend> AudioHost<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            samples: SampleLibrary::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic random notes, for tests and reproducible demos
    pub fn with_seed(backend: B, seed: u64) -> Self {
        Self {
            backend,
            samples: SampleLibrary::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn samples(&self) -> &SampleLibrary {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut SampleLibrary {
        &mut self.samples
    }

    /// Fire a node behavior against this host
    pub fn trigger(&mut self, behavior: &mut NodeBehavior) -> GraphResult<()> {
        let mut ctx = TriggerContext {
            backend: &mut self.backend,
            samples: &self.samples,
            rng: &mut self.rng,
        };
        behavior.trigger(&mut ctx)
    }

    /// Duration of a behavior's sound, if known
    pub fn duration_ms(&self, behavior: &NodeBehavior) -> Option<f64> {
        behavior.duration_ms(&self.samples)
    }
}
