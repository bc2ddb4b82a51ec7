// Synth - Scale-based synthesizer node behavior

use super::backend::AudioBackend;
use super::check_sound_ms;
use super::scale::{Scale, ScaleKind};
use crate::error::{GraphError, GraphResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What a synth node plays when a cascade reaches it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerMode {
    /// Every enabled scale degree at once
    #[default]
    Chord,
    /// One random degree of the scale
    Random,
}

/// Default synth parameters for new nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SynthConfig {
    /// Base frequency in Hz
    pub base: f64,
    /// Named preset (`slendro`, `mP`, `M`, `MP`); ignored when `relatives` is set
    pub scale: String,
    /// Custom scale type, used with `relatives`
    pub scale_type: ScaleKind,
    /// Custom ratios or semitone offsets
    pub relatives: Option<Vec<f64>>,
    /// Maximum simultaneous notes per trigger
    pub polyphony: usize,
    /// Note length in milliseconds (an eighth note at 120 BPM by default)
    pub release_ms: f64,
    pub trigger_mode: TriggerMode,
}

impl SynthConfig {
    pub fn validate(&self) -> GraphResult<()> {
        check_sound_ms("releaseMs", self.release_ms)
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            base: 440.0,
            scale: "mP".to_string(),
            scale_type: ScaleKind::Just,
            relatives: None,
            polyphony: 10,
            release_ms: 250.0,
            trigger_mode: TriggerMode::Chord,
        }
    }
}

/// Synth node behavior
#[derive(Debug, Clone, PartialEq)]
pub struct SynthVoice {
    scale: Scale,
    /// Which scale degrees sound on trigger (one flag per note)
    note_states: Vec<bool>,
    polyphony: usize,
    release_ms: f64,
    trigger_mode: TriggerMode,
}

impl SynthVoice {
    pub fn new(scale: Scale, polyphony: usize, release_ms: f64) -> Self {
        // Only the root is enabled initially
        let mut note_states = vec![false; scale.len()];
        if let Some(root) = note_states.first_mut() {
            *root = true;
        }

        Self {
            scale,
            note_states,
            polyphony: polyphony.max(1),
            release_ms: release_ms.max(0.0),
            trigger_mode: TriggerMode::Chord,
        }
    }

    pub fn from_config(config: &SynthConfig) -> GraphResult<Self> {
        config.validate()?;
        let scale = match &config.relatives {
            Some(relatives) => Scale::new(config.scale_type, relatives.clone(), config.base)?,
            None => Scale::preset(&config.scale, config.base)?,
        };

        let mut voice = Self::new(scale, config.polyphony, config.release_ms);
        voice.trigger_mode = config.trigger_mode;
        Ok(voice)
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn note_states(&self) -> &[bool] {
        &self.note_states
    }

    /// Replace the enabled-degree flags
    ///
    /// The length is checked when the voice plays, not here.
    pub fn set_note_states(&mut self, states: Vec<bool>) {
        self.note_states = states;
    }

    /// Enable or disable one degree; out-of-range indices are ignored
    pub fn set_note_inclusion(&mut self, index: usize, included: bool) -> bool {
        match self.note_states.get_mut(index) {
            Some(state) => {
                *state = included;
                true
            }
            None => false,
        }
    }

    pub fn trigger_mode(&self) -> TriggerMode {
        self.trigger_mode
    }

    pub fn set_trigger_mode(&mut self, mode: TriggerMode) {
        self.trigger_mode = mode;
    }

    pub fn update_base(&mut self, frequency: f64) -> GraphResult<()> {
        self.scale.update_base(frequency)?;
        Ok(())
    }

    pub fn duration_ms(&self) -> f64 {
        self.release_ms
    }

    /// Play the degrees flagged in `states` as one chord
    pub fn play(&self, states: &[bool], backend: &mut dyn AudioBackend) -> GraphResult<()> {
        if states.len() != self.scale.len() {
            return Err(GraphError::InvalidConfiguration(format!(
                "note state length {} must equal the scale length {}",
                states.len(),
                self.scale.len()
            )));
        }

        let mut frequencies: Vec<f64> = self
            .scale
            .notes()
            .iter()
            .zip(states)
            .filter(|(_, on)| **on)
            .map(|(freq, _)| *freq)
            .collect();

        if frequencies.len() > self.polyphony {
            tracing::debug!(
                requested = frequencies.len(),
                polyphony = self.polyphony,
                "chord truncated to polyphony"
            );
            frequencies.truncate(self.polyphony);
        }

        backend.play_frequencies(&frequencies, self.release_ms);
        Ok(())
    }

    /// Play one random note of the scale
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R, backend: &mut dyn AudioBackend) {
        let note = self.scale.random_note(rng);
        backend.play_frequencies(&[note], self.release_ms);
    }

    /// Fire according to the configured trigger mode
    pub fn trigger<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        backend: &mut dyn AudioBackend,
    ) -> GraphResult<()> {
        match self.trigger_mode {
            TriggerMode::Chord => self.play(&self.note_states, backend),
            TriggerMode::Random => {
                self.random(rng, backend);
                Ok(())
            }
        }
    }
}
