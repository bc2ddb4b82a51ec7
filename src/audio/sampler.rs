// Sampler - Sample registry and the sampler node behavior

use super::backend::AudioBackend;
use super::check_sound_ms;
use crate::error::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata for a sample the host has registered
///
/// Decoding and file access belong to the host; the library only tracks
/// what exists and whether its buffer is ready.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleInfo {
    pub name: String,
    pub url: String,
    pub duration_ms: f64,
    #[serde(default)]
    pub loaded: bool,
}

impl SampleInfo {
    pub fn new(name: impl Into<String>, url: impl Into<String>, duration_ms: f64) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            duration_ms,
            loaded: false,
        }
    }
}

/// Samples available to sampler nodes, keyed by name
#[derive(Debug, Clone, Default)]
pub struct SampleLibrary {
    samples: BTreeMap<String, SampleInfo>,
}

impl SampleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sample; the first registration of a name wins
    ///
    /// Returns `Ok(false)` when the name is already taken.
    pub fn add(&mut self, info: SampleInfo) -> GraphResult<bool> {
        check_sound_ms(&format!("duration of sample '{}'", info.name), info.duration_ms)?;
        if self.samples.contains_key(&info.name) {
            return Ok(false);
        }
        self.samples.insert(info.name.clone(), info);
        Ok(true)
    }

    pub fn get(&self, name: &str) -> Option<&SampleInfo> {
        self.samples.get(name)
    }

    /// Flag a sample's buffer as ready to play
    pub fn mark_loaded(&mut self, name: &str) -> bool {
        match self.samples.get_mut(name) {
            Some(info) => {
                info.loaded = true;
                true
            }
            None => false,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Node behavior that plays one sample from the library
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplerVoice {
    sample: Option<String>,
}

impl SamplerVoice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sampler already pointing at `name`
    pub fn with_sample(name: &str, library: &SampleLibrary) -> GraphResult<Self> {
        let mut voice = Self::new();
        voice.set_sample(name, library)?;
        Ok(voice)
    }

    /// Point the sampler at another sample; the old one stays on failure
    pub fn set_sample(&mut self, name: &str, library: &SampleLibrary) -> GraphResult<()> {
        if library.get(name).is_none() {
            return Err(GraphError::ResourceUnavailable(format!(
                "no sample named '{}' is loaded",
                name
            )));
        }
        self.sample = Some(name.to_string());
        Ok(())
    }

    pub fn sample(&self) -> Option<&str> {
        self.sample.as_deref()
    }

    /// Length of the current sample, if known
    pub fn duration_ms(&self, library: &SampleLibrary) -> Option<f64> {
        self.sample
            .as_deref()
            .and_then(|name| library.get(name))
            .map(|info| info.duration_ms)
    }

    pub fn trigger(&self, library: &SampleLibrary, backend: &mut dyn AudioBackend) -> GraphResult<()> {
        let name = self.sample.as_deref().ok_or_else(|| {
            GraphError::ResourceUnavailable("sampler has no sample assigned".into())
        })?;

        let info = library.get(name).ok_or_else(|| {
            GraphError::ResourceUnavailable(format!("sample '{}' is no longer registered", name))
        })?;

        if !info.loaded {
            return Err(GraphError::ResourceUnavailable(format!(
                "sample '{}' hasn't been loaded",
                name
            )));
        }

        backend.play_sample(info);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MAX_SOUND_MS;
    use crate::audio::backend::{PlayedSound, RecordingBackend};

    fn library() -> SampleLibrary {
        let mut library = SampleLibrary::new();
        library.add(SampleInfo::new("kick", "blob:kick", 320.0)).unwrap();
        library.add(SampleInfo::new("snare", "blob:snare", 180.0)).unwrap();
        library
    }

    #[test]
    fn test_first_registration_wins() {
        let mut library = library();
        assert!(!library.add(SampleInfo::new("kick", "blob:other", 1.0)).unwrap());
        assert_eq!(library.get("kick").unwrap().url, "blob:kick");
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["kick", "snare"]);
    }

    #[test]
    fn test_unplayable_durations_rejected() {
        let mut library = SampleLibrary::new();
        for bad in [1e300, f64::INFINITY, f64::NAN, -1.0, MAX_SOUND_MS + 1.0] {
            let err = library.add(SampleInfo::new("x", "blob:x", bad)).unwrap_err();
            assert!(matches!(err, GraphError::InvalidConfiguration(_)));
        }
        assert!(library.is_empty());
        assert!(library.add(SampleInfo::new("x", "blob:x", MAX_SOUND_MS)).unwrap());
    }

    #[test]
    fn test_set_unknown_sample() {
        let library = library();
        let mut voice = SamplerVoice::with_sample("kick", &library).unwrap();

        let err = voice.set_sample("hat", &library).unwrap_err();
        assert!(matches!(err, GraphError::ResourceUnavailable(_)));
        assert_eq!(voice.sample(), Some("kick"));
    }

    #[test]
    fn test_trigger_requires_loaded_buffer() {
        let mut library = library();
        let voice = SamplerVoice::with_sample("snare", &library).unwrap();
        let mut backend = RecordingBackend::new();

        assert!(voice.trigger(&library, &mut backend).is_err());
        assert!(backend.played().is_empty());

        library.mark_loaded("snare");
        voice.trigger(&library, &mut backend).unwrap();
        assert_eq!(
            backend.played(),
            &[PlayedSound::Sample {
                name: "snare".into()
            }]
        );
        assert_eq!(voice.duration_ms(&library), Some(180.0));
    }

    #[test]
    fn test_trigger_without_sample() {
        let library = library();
        let mut backend = RecordingBackend::new();
        let err = SamplerVoice::new().trigger(&library, &mut backend).unwrap_err();
        assert!(matches!(err, GraphError::ResourceUnavailable(_)));
    }
}
