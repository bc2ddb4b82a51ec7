// Cascade - Time-delayed propagation of triggers through the graph
// A single scheduler loop drains a queue of timed events; nothing recurses

pub mod scheduler;

pub use scheduler::{CascadeScheduler, CascadeStep, PassId};

use crate::error::{GraphError, GraphResult};
use serde::{Deserialize, Serialize};

/// What to do when a pass reaches a node it has already fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CascadePolicy {
    /// Re-entry allowed (cycles and fan-in amplify), bounded by hop count
    #[serde(rename_all = "camelCase")]
    Overlap { max_depth: u32 },
    /// Each node fires at most once per pass
    VisitOnce,
}

impl Default for CascadePolicy {
    fn default() -> Self {
        CascadePolicy::Overlap {
            max_depth: CascadeConfig::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Cascade timing and safety limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CascadeConfig {
    /// Child delays are drawn uniformly from `[0, max_delay_ms)`
    pub max_delay_ms: f64,
    pub policy: CascadePolicy,
    /// Upper bound on queued events across all passes
    pub max_pending: usize,
}

impl CascadeConfig {
    pub const DEFAULT_MAX_DEPTH: u32 = 64;
    pub const DEFAULT_MAX_PENDING: usize = 4096;
    /// Longest allowed child delay (one hour)
    pub const MAX_DELAY_MS: f64 = 3_600_000.0;

    pub fn validate(&self) -> GraphResult<()> {
        let delay = self.max_delay_ms;
        if !delay.is_finite() || !(0.0..=Self::MAX_DELAY_MS).contains(&delay) {
            return Err(GraphError::InvalidConfiguration(format!(
                "maxDelayMs must be between 0 and {}, got {}",
                Self::MAX_DELAY_MS,
                delay
            )));
        }
        if self.max_pending == 0 {
            return Err(GraphError::InvalidConfiguration(
                "maxPending must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            max_delay_ms: 1000.0,
            policy: CascadePolicy::default(),
            max_pending: Self::DEFAULT_MAX_PENDING,
        }
    }
}
