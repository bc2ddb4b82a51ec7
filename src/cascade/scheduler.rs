// CascadeScheduler - Work queue driving flood playback
//
// A flood starts a "pass". Activating a node lights it, fires its behavior and
// queues each child at an independently randomized delay. The host advances
// time by calling tick(now); due events are processed in (time, enqueue) order.
//
// Siblings are independent: there is no join, so passes may overlap in time
// and the same node may be lit by several paths at once (hence the counter).

use super::{CascadeConfig, CascadePolicy};
use crate::audio::{AudioBackend, AudioHost, Triggerable};
use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::Duration;

/// Identifies one flood started by a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    /// Activate `node`, `depth` hops away from the pass root
    Fire { node: NodeId, depth: u32 },
    /// Drop one playing activation from `node`
    Release { node: NodeId },
}

#[derive(Debug, Clone, Copy)]
struct ScheduledEvent {
    due: Duration,
    seq: u64,
    pass: PassId,
    kind: EventKind,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

#[derive(Debug, Default)]
struct PassState {
    pending: usize,
    visited: HashSet<NodeId>,
}

/// What happened during one `flood_trigger` or `tick` call
#[derive(Debug, Default)]
pub struct CascadeStep {
    /// Passes started by this call
    pub started: Vec<PassId>,
    /// Nodes activated, in processing order
    pub fired: Vec<NodeId>,
    /// Nodes that dropped a playing activation
    pub released: Vec<NodeId>,
    /// Behaviors that failed to fire; their children were still scheduled
    pub failures: Vec<(NodeId, GraphError)>,
    /// Activations refused by the cascade policy
    pub suppressed: usize,
    /// Children not scheduled because the queue was full
    pub dropped: usize,
    /// Passes with nothing left to do
    pub finished: Vec<PassId>,
}

impl CascadeStep {
    /// Whether any node changed its playing state (a redraw is due)
    pub fn changed(&self) -> bool {
        !self.fired.is_empty() || !self.released.is_empty()
    }

    pub fn merge(&mut self, other: CascadeStep) {
        self.started.extend(other.started);
        self.fired.extend(other.fired);
        self.released.extend(other.released);
        self.failures.extend(other.failures);
        self.suppressed += other.suppressed;
        self.dropped += other.dropped;
        self.finished.extend(other.finished);
    }
}

/// Drives cascades on a host-supplied clock
pub struct CascadeScheduler {
    config: CascadeConfig,
    queue: BinaryHeap<Reverse<ScheduledEvent>>,
    passes: HashMap<PassId, PassState>,
    next_pass: u64,
    next_seq: u64,
    rng: StdRng,
}

impl CascadeScheduler {
    pub fn new(config: CascadeConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible delays, for tests and demos
    pub fn with_seed(config: CascadeConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: CascadeConfig, rng: StdRng) -> Self {
        Self {
            config,
            queue: BinaryHeap::new(),
            passes: HashMap::new(),
            next_pass: 0,
            next_seq: 0,
            rng,
        }
    }

    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    pub fn set_policy(&mut self, policy: CascadePolicy) {
        self.config.policy = policy;
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn active_passes(&self) -> usize {
        self.passes.len()
    }

    /// When the next event is due, if any
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.peek().map(|Reverse(event)| event.due)
    }

    /// Start a new pass at `node`
    ///
    /// The node fires immediately; its descendants fire on later ticks.
    pub fn flood_trigger<B: AudioBackend>(
        &mut self,
        graph: &mut Graph,
        node: NodeId,
        now: Duration,
        audio: &mut AudioHost<B>,
    ) -> GraphResult<CascadeStep> {
        if !graph.contains(node) {
            return Err(GraphError::UnknownNode(node));
        }

        let pass = PassId(self.next_pass);
        self.next_pass += 1;
        self.passes.insert(pass, PassState::default());
        tracing::debug!(pass = pass.0, %node, "cascade pass started");

        let mut step = CascadeStep::default();
        step.started.push(pass);
        self.activate(graph, node, pass, 0, now, audio, &mut step);
        self.finish_if_done(pass, &mut step);
        Ok(step)
    }

    /// Process every event due at or before `now`
    pub fn tick<B: AudioBackend>(
        &mut self,
        graph: &mut Graph,
        now: Duration,
        audio: &mut AudioHost<B>,
    ) -> CascadeStep {
        let mut step = CascadeStep::default();

        while self.next_due().is_some_and(|due| due <= now) {
            let Some(Reverse(event)) = self.queue.pop() else {
                break;
            };

            if let Some(state) = self.passes.get_mut(&event.pass) {
                state.pending = state.pending.saturating_sub(1);
            }

            match event.kind {
                EventKind::Fire { node, depth } => {
                    self.activate(graph, node, event.pass, depth, event.due, audio, &mut step);
                }
                EventKind::Release { node } => {
                    if let Some(n) = graph.node_mut(node) {
                        n.end_playing();
                        step.released.push(node);
                    }
                }
            }

            self.finish_if_done(event.pass, &mut step);
        }

        step
    }

    /// Drop every queued event and clear all playing highlights
    pub fn stop_all(&mut self, graph: &mut Graph) {
        let dropped = self.queue.len();
        self.queue.clear();
        self.passes.clear();
        graph.reset_playing();
        tracing::info!(dropped, "all cascades stopped");
    }

    #[allow(clippy::too_many_arguments)]
    fn activate<B: AudioBackend>(
        &mut self,
        graph: &mut Graph,
        node_id: NodeId,
        pass: PassId,
        depth: u32,
        now: Duration,
        audio: &mut AudioHost<B>,
        step: &mut CascadeStep,
    ) {
        // Nodes removed while a cascade was in flight are skipped
        let Some(node) = graph.node_mut(node_id) else {
            return;
        };

        let allowed = match self.config.policy {
            CascadePolicy::Overlap { max_depth } => depth <= max_depth,
            CascadePolicy::VisitOnce => self
                .passes
                .get_mut(&pass)
                .map(|state| state.visited.insert(node_id))
                .unwrap_or(true),
        };
        if !allowed {
            step.suppressed += 1;
            return;
        }

        node.begin_playing();
        step.fired.push(node_id);

        if let Err(err) = audio.trigger(&mut node.behavior) {
            tracing::warn!(node = %node_id, kind = node.behavior.kind_name(), error = %err, "trigger failed");
            step.failures.push((node_id, err));
        }

        let children = node.children().to_vec();
        let hold = audio
            .duration_ms(&node.behavior)
            .filter(|ms| ms.is_finite() && *ms >= 0.0)
            .unwrap_or(0.0);

        let mut first_child_due: Option<Duration> = None;
        for child in children {
            if self.queue.len() >= self.config.max_pending {
                step.dropped += 1;
                tracing::warn!(
                    node = %node_id,
                    %child,
                    max_pending = self.config.max_pending,
                    "cascade queue full, child dropped"
                );
                continue;
            }

            let due = now.saturating_add(self.random_delay());
            first_child_due = Some(first_child_due.map_or(due, |d| d.min(due)));
            let kind = EventKind::Fire {
                node: child,
                depth: depth.saturating_add(1),
            };
            self.push(due, pass, kind);
        }

        // Lit until the first child fires, or for the sound's length on a leaf
        let release_at = first_child_due.unwrap_or_else(|| now.saturating_add(millis(hold)));
        self.push(release_at, pass, EventKind::Release { node: node_id });
    }

    fn random_delay(&mut self) -> Duration {
        let max_ms = self.config.max_delay_ms;
        if !max_ms.is_finite() || max_ms <= 0.0 {
            return Duration::ZERO;
        }
        let ms: f64 = self.rng.gen_range(0.0..max_ms);
        millis(ms)
    }

    fn push(&mut self, due: Duration, pass: PassId, kind: EventKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Some(state) = self.passes.get_mut(&pass) {
            state.pending += 1;
        }
        self.queue.push(Reverse(ScheduledEvent {
            due,
            seq,
            pass,
            kind,
        }));
    }

    fn finish_if_done(&mut self, pass: PassId, step: &mut CascadeStep) {
        let done = self
            .passes
            .get(&pass)
            .is_some_and(|state| state.pending == 0);
        if done {
            self.passes.remove(&pass);
            step.finished.push(pass);
            tracing::debug!(pass = pass.0, "cascade pass finished");
        }
    }
}

/// Milliseconds as a `Duration`, saturating at `Duration::MAX`
fn millis(ms: f64) -> Duration {
    if ms.is_nan() || ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
}
