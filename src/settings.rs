// Settings - Render specs, cascade limits and default synth, loaded from RON or JSON

use crate::audio::SynthConfig;
use crate::cascade::CascadeConfig;
use crate::error::GraphResult;
use crate::render::RenderSpecs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything a host can tune without code changes
///
/// Missing sections and keys fall back to their defaults, so an empty
/// document is a valid settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub specs: RenderSpecs,
    pub cascade: CascadeConfig,
    pub synth: SynthConfig,
}

impl Settings {
    /// Load from disk; `.ron` files are RON, anything else is JSON
    pub fn load(path: impl AsRef<Path>) -> GraphResult<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;

        let settings = if is_ron(path) {
            Self::from_ron_str(&data)?
        } else {
            Self::from_json_str(&data)?
        };

        tracing::info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Write to disk in the format implied by the extension
    pub fn save(&self, path: impl AsRef<Path>) -> GraphResult<()> {
        let path = path.as_ref();
        let data = if is_ron(path) {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| crate::error::GraphError::InvalidConfiguration(e.to_string()))?
        } else {
            serde_json::to_string_pretty(self)?
        };
        fs::write(path, data)?;
        Ok(())
    }

    pub fn from_json_str(data: &str) -> GraphResult<Self> {
        let settings: Self = serde_json::from_str(data)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_ron_str(data: &str) -> GraphResult<Self> {
        let settings: Self = ron::from_str(data)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the values that drive timing; colors and sizes are checked by serde
    pub fn validate(&self) -> GraphResult<()> {
        self.cascade.validate()?;
        self.synth.validate()
    }
}

fn is_ron(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ron"))
}
