// Audio collaborator - Node sound behaviors and the backend they play through
// Actual synthesis and file decoding live outside this crate

pub mod backend;
pub mod host;
pub mod sampler;
pub mod scale;
pub mod synth;
pub mod trait_def;

pub use backend::{AudioBackend, PlayedSound, RecordingBackend, TracingBackend};
pub use host::AudioHost;
pub use sampler::{SampleInfo, SampleLibrary, SamplerVoice};
pub use scale::{Scale, ScaleKind};
pub use synth::{SynthConfig, SynthVoice, TriggerMode};
pub use trait_def::{NodeBehavior, TriggerContext, Triggerable};

use crate::error::{GraphError, GraphResult};

/// Longest sound a node may report, in milliseconds (one hour)
pub const MAX_SOUND_MS: f64 = 3_600_000.0;

/// Reject sound lengths that are negative, non-finite or over `MAX_SOUND_MS`
pub(crate) fn check_sound_ms(what: &str, ms: f64) -> GraphResult<()> {
    if ms.is_finite() && (0.0..=MAX_SOUND_MS).contains(&ms) {
        Ok(())
    } else {
        Err(GraphError::InvalidConfiguration(format!(
            "{} must be between 0 and {} ms, got {}",
            what, MAX_SOUND_MS, ms
        )))
    }
}
