// Triggerable trait - The capability a cascade needs from a node's sound

use super::backend::AudioBackend;
use super::sampler::{SampleLibrary, SamplerVoice};
use super::synth::SynthVoice;
use crate::error::GraphResult;
use rand::RngCore;

/// Everything a behavior may touch while firing
pub struct TriggerContext<'a> {
    pub backend: &'a mut dyn AudioBackend,
    pub samples: &'a SampleLibrary,
    pub rng: &'a mut dyn RngCore,
}

/// Something a cascade can fire
///
/// Implemented by both node behaviors and by [`NodeBehavior`] itself, so the
/// scheduler never needs to know which kind of node it is visiting.
pub trait Triggerable {
    /// Fire the sound
    fn trigger(&mut self, ctx: &mut TriggerContext<'_>) -> GraphResult<()>;

    /// How long the sound lasts, if known (drives the playing highlight)
    fn duration_ms(&self, samples: &SampleLibrary) -> Option<f64>;

    /// Short name for logs
    fn kind_name(&self) -> &'static str;
}

impl Triggerable for SynthVoice {
    fn trigger(&mut self, ctx: &mut TriggerContext<'_>) -> GraphResult<()> {
        SynthVoice::trigger(self, &mut *ctx.rng, &mut *ctx.backend)
    }

    fn duration_ms(&self, _samples: &SampleLibrary) -> Option<f64> {
        Some(SynthVoice::duration_ms(self))
    }

    fn kind_name(&self) -> &'static str {
        "synth"
    }
}

impl Triggerable for SamplerVoice {
    fn trigger(&mut self, ctx: &mut TriggerContext<'_>) -> GraphResult<()> {
        SamplerVoice::trigger(self, ctx.samples, &mut *ctx.backend)
    }

    fn duration_ms(&self, samples: &SampleLibrary) -> Option<f64> {
        SamplerVoice::duration_ms(self, samples)
    }

    fn kind_name(&self) -> &'static str {
        "sampler"
    }
}

/// Sound attached to a graph node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBehavior {
    Synth(SynthVoice),
    Sampler(SamplerVoice),
}

impl NodeBehavior {
    pub fn as_synth_mut(&mut self) -> Option<&mut SynthVoice> {
        match self {
            NodeBehavior::Synth(voice) => Some(voice),
            NodeBehavior::Sampler(_) => None,
        }
    }

    pub fn as_sampler_mut(&mut self) -> Option<&mut SamplerVoice> {
        match self {
            NodeBehavior::Sampler(voice) => Some(voice),
            NodeBehavior::Synth(_) => None,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Triggerable {
        match self {
            NodeBehavior::Synth(voice) => voice,
            NodeBehavior::Sampler(voice) => voice,
        }
    }

    fn inner(&self) -> &dyn Triggerable {
        match self {
            NodeBehavior::Synth(voice) => voice,
            NodeBehavior::Sampler(voice) => voice,
        }
    }
}

impl Triggerable for NodeBehavior {
    fn trigger(&mut self, ctx: &mut TriggerContext<'_>) -> GraphResult<()> {
        self.inner_mut().trigger(ctx)
    }

    fn duration_ms(&self, samples: &SampleLibrary) -> Option<f64> {
        self.inner().duration_ms(samples)
    }

    fn kind_name(&self) -> &'static str {
        self.inner().kind_name()
    }
}
