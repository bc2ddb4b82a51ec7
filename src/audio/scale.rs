// Scale - Note frequencies built from just ratios or equal-tempered steps

use crate::error::{GraphError, GraphResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Just-intonation slendro approximation
pub const JUST_SLENDRO: [f64; 6] = [1.0, 1.3125, 1.5, 1.75, 1.875, 2.0];

/// Just minor pentatonic
pub const JUST_MINOR_PENTATONIC: [f64; 6] = [1.0, 32.0 / 27.0, 4.0 / 3.0, 3.0 / 2.0, 16.0 / 9.0, 2.0];

/// Equal-tempered major scale, in semitones above the base
pub const ET_MAJOR: [f64; 8] = [0.0, 2.0, 4.0, 5.0, 7.0, 9.0, 11.0, 12.0];

/// Equal-tempered major pentatonic, in semitones above the base
pub const ET_MAJOR_PENTATONIC: [f64; 5] = [0.0, 2.0, 4.0, 7.0, 9.0];

/// How scale relatives are turned into frequencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleKind {
    /// Relatives are frequency ratios of the base
    #[serde(rename = "just")]
    Just,
    /// Relatives are semitone offsets from the base
    #[serde(rename = "et")]
    EqualTempered,
}

impl FromStr for ScaleKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "just" => Ok(ScaleKind::Just),
            "et" => Ok(ScaleKind::EqualTempered),
            other => Err(GraphError::InvalidConfiguration(format!(
                "scale type '{}' is not implemented",
                other
            ))),
        }
    }
}

/// A playable scale rooted at a base frequency
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    kind: ScaleKind,
    relatives: Vec<f64>,
    base: f64,
    notes: Vec<f64>,
}

impl Scale {
    /// Build a scale from explicit relatives
    pub fn new(kind: ScaleKind, relatives: Vec<f64>, base: f64) -> GraphResult<Self> {
        if relatives.is_empty() {
            return Err(GraphError::InvalidConfiguration(
                "a scale needs at least one degree".into(),
            ));
        }
        if !base.is_finite() || base <= 0.0 {
            return Err(GraphError::InvalidConfiguration(format!(
                "base frequency must be positive, got {}",
                base
            )));
        }

        let mut scale = Self {
            kind,
            relatives,
            base,
            notes: Vec::new(),
        };
        scale.recompute();
        Ok(scale)
    }

    /// Build one of the named scales: `slendro`, `mP` (just), `M`, `MP` (equal-tempered)
    pub fn preset(name: &str, base: f64) -> GraphResult<Self> {
        let (kind, relatives): (ScaleKind, &[f64]) = match name {
            "slendro" => (ScaleKind::Just, &JUST_SLENDRO),
            "mP" => (ScaleKind::Just, &JUST_MINOR_PENTATONIC),
            "M" => (ScaleKind::EqualTempered, &ET_MAJOR),
            "MP" => (ScaleKind::EqualTempered, &ET_MAJOR_PENTATONIC),
            other => {
                return Err(GraphError::InvalidConfiguration(format!(
                    "unknown scale preset '{}'",
                    other
                )));
            }
        };
        Self::new(kind, relatives.to_vec(), base)
    }

    fn recompute(&mut self) {
        let base = self.base;
        self.notes = match self.kind {
            ScaleKind::Just => self.relatives.iter().map(|r| r * base).collect(),
            ScaleKind::EqualTempered => self
                .relatives
                .iter()
                .map(|semitones| base * 2f64.powf(semitones / 12.0))
                .collect(),
        };
    }

    /// Re-root the scale and return the new note frequencies
    pub fn update_base(&mut self, base: f64) -> GraphResult<&[f64]> {
        if !base.is_finite() || base <= 0.0 {
            return Err(GraphError::InvalidConfiguration(format!(
                "base frequency must be positive, got {}",
                base
            )));
        }
        self.base = base;
        self.recompute();
        Ok(&self.notes)
    }

    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn notes(&self) -> &[f64] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Pick a random note
    ///
    /// The top degree is excluded (it doubles the root an octave up in the
    /// presets), unless the scale has a single note.
    pub fn random_note<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let choices = self.notes.len().saturating_sub(1).max(1);
        self.notes[rng.gen_range(0..choices)]
    }
}
