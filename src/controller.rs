// GraphController - Host-facing facade over graph, history, cascade and renderer
//
// Every mutating call ends with a full redraw onto the owned surface.
// Non-fatal problems are logged and pushed to the notification channel;
// the controller stays usable after any of them.

use crate::audio::{AudioBackend, AudioHost, NodeBehavior, SamplerVoice, SynthConfig, SynthVoice};
use crate::cascade::{CascadePolicy, CascadeScheduler, CascadeStep};
use crate::command::{AddEdgeCommand, CommandManager, CreateNodeCommand, MoveNodesCommand};
use crate::error::{GraphError, GraphResult};
use crate::geometry::Point;
use crate::graph::{DEFAULT_HIT_SCALE, EdgeKey, Graph, NodeId};
use crate::messaging::{
    Notification, NotificationCategory, NotificationConsumer, NotificationProducer,
    create_notification_channel,
};
use crate::render::{Overlay, RenderSpecs, Renderer, Surface};
use crate::settings::Settings;
use ringbuf::traits::Producer;
use std::time::Duration;

/// Capacity of the notification ring buffer
const NOTIFICATION_CAPACITY: usize = 256;

pub struct GraphController<S: Surface, B: AudioBackend> {
    graph: Graph,
    history: CommandManager,
    scheduler: CascadeScheduler,
    audio: AudioHost<B>,
    renderer: Renderer,
    surface: S,
    synth_config: SynthConfig,
    selected_edge: Option<EdgeKey>,
    overlay: Option<Overlay>,
    notification_tx: NotificationProducer,
}

impl<S: Surface, B: AudioBackend> GraphController<S, B> {
    /// Build a controller and the consumer end of its notification channel
    pub fn new(settings: Settings, surface: S, backend: B) -> (Self, NotificationConsumer) {
        let scheduler = CascadeScheduler::new(settings.cascade.clone());
        let audio = AudioHost::new(backend);
        Self::assemble(settings, surface, scheduler, audio)
    }

    /// Same as `new` with deterministic cascade delays and random notes
    pub fn with_seed(
        settings: Settings,
        surface: S,
        backend: B,
        seed: u64,
    ) -> (Self, NotificationConsumer) {
        let scheduler = CascadeScheduler::with_seed(settings.cascade.clone(), seed);
        let audio = AudioHost::with_seed(backend, seed.wrapping_add(1));
        Self::assemble(settings, surface, scheduler, audio)
    }

    fn assemble(
        settings: Settings,
        surface: S,
        scheduler: CascadeScheduler,
        audio: AudioHost<B>,
    ) -> (Self, NotificationConsumer) {
        let (notification_tx, notification_rx) = create_notification_channel(NOTIFICATION_CAPACITY);

        let mut controller = Self {
            graph: Graph::new(),
            history: CommandManager::new(),
            scheduler,
            audio,
            renderer: Renderer::new(settings.specs),
            surface,
            synth_config: settings.synth,
            selected_edge: None,
            overlay: None,
            notification_tx,
        };
        controller.redraw();
        (controller, notification_rx)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn audio(&self) -> &AudioHost<B> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioHost<B> {
        &mut self.audio
    }

    pub fn scheduler(&self) -> &CascadeScheduler {
        &self.scheduler
    }

    pub fn specs(&self) -> &RenderSpecs {
        self.renderer.specs()
    }

    pub fn selected_edge(&self) -> Option<EdgeKey> {
        self.selected_edge
    }

    pub fn history(&self) -> &CommandManager {
        &self.history
    }

    /// Mutable access to a node's sound (scale edits, sample changes)
    pub fn behavior_mut(&mut self, node: NodeId) -> Option<&mut NodeBehavior> {
        self.graph.node_mut(node).map(|n| &mut n.behavior)
    }

    // -- Editing -------------------------------------------------------------

    /// Add a synth node built from the default synth settings
    pub fn create_node(&mut self, position: Point) -> GraphResult<NodeId> {
        let voice = SynthVoice::from_config(&self.synth_config).inspect_err(|err| {
            self.report(NotificationCategory::Config, err);
        })?;
        self.push_node(position, NodeBehavior::Synth(voice))
    }

    /// Add a sampler node playing a registered sample
    pub fn create_sampler_node(&mut self, position: Point, sample: &str) -> GraphResult<NodeId> {
        let voice = SamplerVoice::with_sample(sample, self.audio.samples()).inspect_err(|err| {
            self.report(NotificationCategory::Audio, err);
        })?;
        self.push_node(position, NodeBehavior::Sampler(voice))
    }

    fn push_node(&mut self, position: Point, behavior: NodeBehavior) -> GraphResult<NodeId> {
        let command = CreateNodeCommand::new(position, behavior);
        self.history.execute(Box::new(command), &mut self.graph)?;

        let id = self
            .graph
            .nodes()
            .last()
            .map(|node| node.id())
            .ok_or_else(|| GraphError::InvalidConfiguration("node was not created".into()))?;

        tracing::debug!(node = %id, x = position.x, y = position.y, "node created");
        self.redraw();
        Ok(id)
    }

    /// Connect `from` to `to`
    ///
    /// Returns `Ok(false)` when the edge already exists; that case is
    /// reported as a warning and leaves the graph untouched.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> GraphResult<bool> {
        for id in [from, to] {
            if !self.graph.contains(id) {
                let err = GraphError::UnknownNode(id);
                self.report(NotificationCategory::Graph, &err);
                return Err(err);
            }
        }

        if from == to {
            let err = GraphError::InvalidConfiguration(format!("node {} cannot feed itself", from));
            self.report(NotificationCategory::Graph, &err);
            return Err(err);
        }

        let key = EdgeKey::new(from, to);
        if self.graph.has_edge(key) {
            tracing::debug!(edge = %key, "duplicate edge ignored");
            self.report(NotificationCategory::Graph, &GraphError::DuplicateEdge(key));
            return Ok(false);
        }

        self.history
            .execute(Box::new(AddEdgeCommand::new(from, to)), &mut self.graph)?;
        tracing::debug!(edge = %key, "edge added");
        self.redraw();
        Ok(true)
    }

    pub fn toggle_select(&mut self, node: NodeId) -> GraphResult<bool> {
        let selected = self.graph.toggle_selected(node)?;
        self.redraw();
        Ok(selected)
    }

    /// Replace the selection with the nodes inside the rectangle
    pub fn select_in_rect(&mut self, corner1: Point, corner2: Point) {
        self.graph.select_in_rect(corner1, corner2);
        self.redraw();
    }

    pub fn clear_selections(&mut self) {
        self.graph.clear_selections();
        self.selected_edge = None;
        self.redraw();
    }

    /// Translate the selected nodes
    ///
    /// Consecutive moves of the same selection share one undo entry until
    /// `end_move` is called.
    pub fn move_selected(&mut self, delta: Point) -> GraphResult<Vec<NodeId>> {
        let ids = self.graph.selected_ids();
        if ids.is_empty() {
            return Ok(ids);
        }

        self.history.execute(
            Box::new(MoveNodesCommand::new(ids.clone(), delta)),
            &mut self.graph,
        )?;
        self.redraw();
        Ok(ids)
    }

    /// Close the current drag so the next move gets its own undo entry
    pub fn end_move(&mut self) {
        self.history.seal();
    }

    pub fn undo(&mut self) -> GraphResult<String> {
        let description = self.history.undo(&mut self.graph)?;
        self.forget_stale_edge();
        tracing::info!(%description, "undo");
        self.redraw();
        Ok(description)
    }

    pub fn redo(&mut self) -> GraphResult<String> {
        let description = self.history.redo(&mut self.graph)?;
        tracing::info!(%description, "redo");
        self.redraw();
        Ok(description)
    }

    /// What `undo` would revert, for menu labels
    pub fn undo_label(&self) -> Option<String> {
        self.history.undo_description()
    }

    /// What `redo` would reapply, for menu labels
    pub fn redo_label(&self) -> Option<String> {
        self.history.redo_description()
    }

    fn forget_stale_edge(&mut self) {
        if self.selected_edge.is_some_and(|key| !self.graph.has_edge(key)) {
            self.selected_edge = None;
        }
    }

    // -- Hit testing ---------------------------------------------------------

    /// First node whose enlarged circle contains `point`
    pub fn hit_test_node(&self, point: Point) -> Option<NodeId> {
        self.hit_test_node_excluding(point, None)
    }

    /// As `hit_test_node`, skipping `exclude` (the source of a pending edge)
    pub fn hit_test_node_excluding(&self, point: Point, exclude: Option<NodeId>) -> Option<NodeId> {
        let radius = self.renderer.specs().radius;
        self.graph
            .hit_test_node(point, radius, DEFAULT_HIT_SCALE, exclude)
    }

    pub fn hit_test_edge(&self, point: Point) -> Option<EdgeKey> {
        let specs = self.renderer.specs();
        self.graph
            .hit_test_edge(point, specs.radius, specs.edge_width)
    }

    /// Select the edge under `point`, or clear the edge selection
    pub fn select_edge_at(&mut self, point: Point) -> Option<EdgeKey> {
        self.selected_edge = self.hit_test_edge(point);
        self.redraw();
        self.selected_edge
    }

    // -- Playback ------------------------------------------------------------

    /// Start a cascade at every selected node, in graph order
    pub fn trigger_selected(&mut self, now: Duration) -> CascadeStep {
        let mut step = CascadeStep::default();
        for id in self.graph.selected_ids() {
            match self.scheduler.flood_trigger(&mut self.graph, id, now, &mut self.audio) {
                Ok(started) => step.merge(started),
                Err(err) => self.report(NotificationCategory::Cascade, &err),
            }
        }
        self.after_step(&step);
        step
    }

    /// Start a cascade at one node
    pub fn trigger(&mut self, node: NodeId, now: Duration) -> GraphResult<CascadeStep> {
        let step = self
            .scheduler
            .flood_trigger(&mut self.graph, node, now, &mut self.audio)
            .inspect_err(|err| self.report(NotificationCategory::Cascade, err))?;
        self.after_step(&step);
        Ok(step)
    }

    /// Advance every running cascade to `now`
    pub fn tick(&mut self, now: Duration) -> CascadeStep {
        let step = self.scheduler.tick(&mut self.graph, now, &mut self.audio);
        self.after_step(&step);
        step
    }

    /// Drop all pending cascade events and clear the playing highlights
    pub fn stop_all(&mut self) {
        self.scheduler.stop_all(&mut self.graph);
        self.redraw();
    }

    pub fn set_policy(&mut self, policy: CascadePolicy) {
        self.scheduler.set_policy(policy);
    }

    fn after_step(&mut self, step: &CascadeStep) {
        for (node, err) in &step.failures {
            tracing::debug!(%node, "reporting trigger failure");
            self.report(NotificationCategory::Audio, err);
        }
        if step.dropped > 0 {
            self.notify(Notification::warning(
                NotificationCategory::Cascade,
                format!("Cascade queue full, {} events dropped", step.dropped),
            ));
        }
        if step.changed() {
            self.redraw();
        }
    }

    // -- Drawing -------------------------------------------------------------

    /// Show (or hide with `None`) a rubber band or pending edge
    pub fn set_overlay(&mut self, overlay: Option<Overlay>) {
        self.overlay = overlay;
        self.redraw();
    }

    /// Full redraw of graph and overlay
    pub fn redraw(&mut self) {
        self.renderer.draw_graph(
            &mut self.surface,
            &self.graph,
            self.selected_edge,
            self.overlay.as_ref(),
        );
    }

    // -- Notifications -------------------------------------------------------

    fn report(&mut self, category: NotificationCategory, err: &GraphError) {
        if err.is_benign() {
            tracing::debug!(error = %err, "benign graph error");
        } else {
            tracing::warn!(error = %err, "graph operation failed");
        }
        self.notify(Notification::from_error(category, err));
    }

    fn notify(&mut self, notification: Notification) {
        // A full channel means nobody is draining it; dropping is fine
        let _ = self.notification_tx.try_push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{PlayedSound, RecordingBackend, SampleInfo};
    use crate::messaging::NotificationLevel;
    use crate::render::{DisplayList, DrawCommand};
    use ringbuf::traits::Consumer;

    type TestController = GraphController<DisplayList, RecordingBackend>;

    fn controller() -> (TestController, NotificationConsumer) {
        GraphController::with_seed(Settings::default(), DisplayList::new(), RecordingBackend::new(), 3)
    }

    #[test]
    fn test_create_and_connect() {
        let (mut ctl, mut rx) = controller();
        let a = ctl.create_node(Point::new(0.0, 0.0)).unwrap();
        let b = ctl.create_node(Point::new(100.0, 0.0)).unwrap();

        assert!(ctl.add_edge(a, b).unwrap());
        assert!(!ctl.add_edge(a, b).unwrap());
        assert_eq!(ctl.graph().node(a).unwrap().children(), &[b]);

        let notif = rx.try_pop().unwrap();
        assert_eq!(notif.level, NotificationLevel::Warning);
        assert_eq!(notif.category, NotificationCategory::Graph);

        assert_eq!(ctl.hit_test_edge(Point::new(50.0, 0.0)), Some(EdgeKey::new(a, b)));
        assert_eq!(ctl.hit_test_edge(Point::new(50.0, 500.0)), None);
    }

    #[test]
    fn test_self_loop_and_unknown_rejected() {
        let (mut ctl, mut rx) = controller();
        let a = ctl.create_node(Point::origin()).unwrap();

        assert!(matches!(ctl.add_edge(a, a), Err(GraphError::InvalidConfiguration(_))));
        assert!(matches!(ctl.add_edge(a, NodeId(7)), Err(GraphError::UnknownNode(_))));
        assert_eq!(rx.try_pop().unwrap().level, NotificationLevel::Error);
    }

    #[test]
    fn test_every_mutation_redraws() {
        let (mut ctl, _rx) = controller();
        assert!(matches!(ctl.surface().commands(), [DrawCommand::Clear(_)]));

        let a = ctl.create_node(Point::new(10.0, 10.0)).unwrap();
        assert_eq!(ctl.surface().texts().collect::<Vec<_>>(), vec!["0"]);

        ctl.toggle_select(a).unwrap();
        assert!(
            ctl.surface()
                .commands()
                .iter()
                .any(|cmd| matches!(cmd, DrawCommand::StrokeCircle { .. }))
        );

        ctl.set_overlay(Some(Overlay::Selection {
            from: Point::origin(),
            to: Point::new(5.0, 5.0),
        }));
        assert_eq!(ctl.surface().lines().count(), 4);
    }

    #[test]
    fn test_move_selected_and_undo() {
        let (mut ctl, _rx) = controller();
        let a = ctl.create_node(Point::new(0.0, 0.0)).unwrap();
        let b = ctl.create_node(Point::new(500.0, 0.0)).unwrap();

        ctl.select_in_rect(Point::new(-10.0, -10.0), Point::new(10.0, 10.0));
        assert_eq!(ctl.move_selected(Point::new(5.0, 0.0)).unwrap(), vec![a]);
        ctl.move_selected(Point::new(5.0, 5.0)).unwrap();
        assert_eq!(ctl.graph().node(a).unwrap().position, Point::new(10.0, 5.0));
        assert_eq!(ctl.graph().node(b).unwrap().position, Point::new(500.0, 0.0));

        // Both drags merged into one entry
        assert_eq!(ctl.undo_label().as_deref(), Some("Move node"));
        assert_eq!(ctl.redo_label(), None);
        assert_eq!(ctl.history().undo_count(), 3);
        assert_eq!(ctl.undo().unwrap(), "Move node");
        assert_eq!(ctl.graph().node(a).unwrap().position, Point::origin());
        assert_eq!(ctl.redo_label().as_deref(), Some("Move node"));

        assert_eq!(ctl.undo().unwrap(), "Create node");
        assert!(!ctl.graph().contains(b));
        assert_eq!(ctl.history().redo_count(), 2);
        ctl.redo().unwrap();
        assert!(ctl.graph().contains(b));

        ctl.clear_selections();
        assert!(ctl.move_selected(Point::new(1.0, 1.0)).unwrap().is_empty());
    }

    #[test]
    fn test_select_edge_and_undo_clears_it() {
        let (mut ctl, _rx) = controller();
        let a = ctl.create_node(Point::new(0.0, 0.0)).unwrap();
        let b = ctl.create_node(Point::new(0.0, 300.0)).unwrap();
        ctl.add_edge(a, b).unwrap();

        assert_eq!(ctl.select_edge_at(Point::new(3.0, 150.0)), Some(EdgeKey::new(a, b)));
        ctl.undo().unwrap();
        assert_eq!(ctl.selected_edge(), None);
    }

    #[test]
    fn test_trigger_selected_runs_cascade() {
        let (mut ctl, _rx) = controller();
        let a = ctl.create_node(Point::new(0.0, 0.0)).unwrap();
        let b = ctl.create_node(Point::new(200.0, 0.0)).unwrap();
        ctl.add_edge(a, b).unwrap();
        ctl.toggle_select(a).unwrap();

        let step = ctl.trigger_selected(Duration::ZERO);
        assert_eq!(step.fired, vec![a]);
        assert!(ctl.graph().node(a).unwrap().is_playing());

        let fills = |ctl: &TestController| {
            ctl.surface()
                .commands()
                .iter()
                .filter(|cmd| {
                    matches!(cmd, DrawCommand::FillCircle { color, .. } if *color == ctl.specs().play_node_color)
                })
                .count()
        };
        assert_eq!(fills(&ctl), 1);

        let step = ctl.tick(Duration::from_secs(1));
        assert_eq!(step.fired, vec![b]);
        assert!(!ctl.graph().node(a).unwrap().is_playing());

        ctl.tick(Duration::from_secs(5));
        assert_eq!(fills(&ctl), 0);
        assert_eq!(ctl.audio().backend().played().len(), 2);
    }

    #[test]
    fn test_sampler_nodes_and_failures() {
        let (mut ctl, mut rx) = controller();

        let err = ctl.create_sampler_node(Point::origin(), "kick").unwrap_err();
        assert!(matches!(err, GraphError::ResourceUnavailable(_)));
        assert_eq!(rx.try_pop().unwrap().category, NotificationCategory::Audio);

        ctl.audio_mut()
            .samples_mut()
            .add(SampleInfo::new("kick", "blob:kick", 120.0))
            .unwrap();
        let node = ctl.create_sampler_node(Point::origin(), "kick").unwrap();

        // Registered but not loaded yet
        let step = ctl.trigger(node, Duration::ZERO).unwrap();
        assert_eq!(step.failures.len(), 1);
        assert_eq!(rx.try_pop().unwrap().level, NotificationLevel::Error);

        ctl.audio_mut().samples_mut().mark_loaded("kick");
        ctl.trigger(node, Duration::from_secs(1)).unwrap();
        assert_eq!(
            ctl.audio().backend().played(),
            &[PlayedSound::Sample { name: "kick".into() }]
        );

        assert!(ctl.trigger(NodeId(99), Duration::ZERO).is_err());
    }
}
