// Audio backend - Sink for sound requests produced by node triggers
// Synthesis itself happens in the host; this crate only decides what to play

use super::sampler::SampleInfo;

/// Receives sound requests from triggered nodes
pub trait AudioBackend {
    /// Play a chord (or a single note) for `release_ms`
    fn play_frequencies(&mut self, frequencies: &[f64], release_ms: f64);

    /// Start playback of a loaded sample
    fn play_sample(&mut self, sample: &SampleInfo);
}

/// Backend that only logs what would be played
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingBackend;

impl AudioBackend for TracingBackend {
    fn play_frequencies(&mut self, frequencies: &[f64], release_ms: f64) {
        tracing::info!(?frequencies, release_ms, "play chord");
    }

    fn play_sample(&mut self, sample: &SampleInfo) {
        tracing::info!(sample = %sample.name, url = %sample.url, "play sample");
    }
}

/// A sound request captured by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum PlayedSound {
    Chord { frequencies: Vec<f64>, release_ms: f64 },
    Sample { name: String },
}

/// Backend that keeps every request, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingBackend {
    played: Vec<PlayedSound>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> &[PlayedSound] {
        &self.played
    }

    pub fn clear(&mut self) {
        self.played.clear();
    }
}

impl AudioBackend for RecordingBackend {
    fn play_frequencies(&mut self, frequencies: &[f64], release_ms: f64) {
        self.played.push(PlayedSound::Chord {
            frequencies: frequencies.to_vec(),
            release_ms,
        });
    }

    fn play_sample(&mut self, sample: &SampleInfo) {
        self.played.push(PlayedSound::Sample {
            name: sample.name.clone(),
        });
    }
}
