//! Editing, hit testing and drawing through the public API

use floodgraph::audio::{NodeBehavior, SynthConfig, SynthVoice};
use floodgraph::geometry::{edge_endpoints, point_in_rect};
use floodgraph::render::{DrawCommand, Overlay};
use floodgraph::{
    DisplayList, EdgeKey, Graph, GraphController, NodeId, Point, RecordingBackend, Settings,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tempfile::tempdir;

fn synth() -> NodeBehavior {
    NodeBehavior::Synth(SynthVoice::from_config(&SynthConfig::default()).unwrap())
}

#[test]
fn test_edge_endpoints_sit_on_circles() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let p1 = Point::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0));
        let p2 = Point::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0));
        let distance = p1.distance_to(p2);
        if distance < 1e-3 {
            continue;
        }
        let r = rng.gen_range(0.0..distance / 2.0);

        let ends = edge_endpoints(p1, p2, r);
        assert!((ends.start.distance_to(p1) - r).abs() < 1e-9);
        assert!((ends.end.distance_to(p2) - r).abs() < 1e-9);

        // Collinear with the original segment
        let cross = (p2.x - p1.x) * (ends.start.y - p1.y) - (p2.y - p1.y) * (ends.start.x - p1.x);
        assert!(cross.abs() < 1e-6 * distance.max(1.0));
    }
}

#[test]
fn test_point_in_rect_corner_order_irrelevant() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let a = Point::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        let b = Point::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        let p = Point::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0));
        assert_eq!(point_in_rect(p, a, b), point_in_rect(p, b, a));
    }
}

#[test]
fn test_add_child_idempotent() {
    let mut graph = Graph::new();
    let a = graph.create_node(Point::origin(), synth());
    let b = graph.create_node(Point::new(100.0, 0.0), synth());

    assert!(graph.add_child(a, b).unwrap());
    assert!(!graph.add_child(a, b).unwrap());
    assert_eq!(graph.node(a).unwrap().children().len(), 1);
}

#[test]
fn test_select_in_rect_replaces_and_is_idempotent() {
    let mut graph = Graph::new();
    let inside = graph.create_node(Point::new(10.0, 10.0), synth());
    let outside = graph.create_node(Point::new(400.0, 400.0), synth());
    graph.toggle_selected(outside).unwrap();

    graph.select_in_rect(Point::new(50.0, 50.0), Point::origin());
    let first = graph.selected_ids();
    graph.select_in_rect(Point::new(50.0, 50.0), Point::origin());

    assert_eq!(first, vec![inside]);
    assert_eq!(graph.selected_ids(), first);
    assert!(graph.has_selected());
}

#[test]
fn test_edge_hit_scenario() {
    let mut graph = Graph::new();
    let a = graph.create_node(Point::new(0.0, 0.0), synth());
    let b = graph.create_node(Point::new(100.0, 0.0), synth());
    graph.add_child(a, b).unwrap();

    let specs = Settings::default().specs;
    assert_eq!(
        graph.hit_test_edge(Point::new(50.0, 0.0), specs.radius, specs.edge_width),
        Some(EdgeKey::new(a, b))
    );
    assert_eq!(
        graph.hit_test_edge(Point::new(50.0, 500.0), specs.radius, specs.edge_width),
        None
    );
}

#[test]
fn test_node_hit_is_first_match() {
    let (mut ctl, _rx) = GraphController::with_seed(
        Settings::default(),
        DisplayList::new(),
        RecordingBackend::new(),
        1,
    );
    let a = ctl.create_node(Point::new(0.0, 0.0)).unwrap();
    let b = ctl.create_node(Point::new(60.0, 0.0)).unwrap();

    // Inside both enlarged circles, closer to b
    assert_eq!(ctl.hit_test_node(Point::new(55.0, 0.0)), Some(a));
    assert_eq!(ctl.hit_test_node_excluding(Point::new(55.0, 0.0), Some(a)), Some(b));
    assert_eq!(ctl.hit_test_node(Point::new(1000.0, 0.0)), None);
}

#[test]
fn test_labels_follow_graph_order_after_undo_redo() {
    let (mut ctl, _rx) = GraphController::with_seed(
        Settings::default(),
        DisplayList::new(),
        RecordingBackend::new(),
        1,
    );
    for i in 0..3 {
        ctl.create_node(Point::new(i as f64 * 200.0, 0.0)).unwrap();
    }
    ctl.undo().unwrap();
    assert_eq!(ctl.surface().texts().collect::<Vec<_>>(), vec!["0", "1"]);
    ctl.redo().unwrap();
    assert_eq!(ctl.surface().texts().collect::<Vec<_>>(), vec!["0", "1", "2"]);
}

#[test]
fn test_controller_uses_loaded_settings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("floodgraph.json");
    std::fs::write(
        &path,
        r##"{
            "specs": { "radius": 10, "edgeWidth": 2, "playNodeColor": "#00ff00" },
            "cascade": { "maxDelayMs": 100, "policy": "visitOnce" }
        }"##,
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    let (mut ctl, _rx) =
        GraphController::with_seed(settings, DisplayList::new(), RecordingBackend::new(), 9);

    let a = ctl.create_node(Point::new(0.0, 0.0)).unwrap();
    let b = ctl.create_node(Point::new(50.0, 0.0)).unwrap();
    ctl.add_edge(a, b).unwrap();
    ctl.add_edge(b, a).unwrap();

    // Hit circles are twice the node radius
    assert_eq!(ctl.hit_test_node(Point::new(0.0, 19.0)), Some(a));
    assert_eq!(ctl.hit_test_node(Point::new(0.0, 21.0)), None);

    ctl.trigger(a, Duration::ZERO).unwrap();
    let mut fired = 1;
    let mut now = Duration::ZERO;
    while !ctl.scheduler().is_idle() {
        now += Duration::from_millis(5);
        fired += ctl.tick(now).fired.len();
    }
    assert_eq!(fired, 2);

    ctl.set_overlay(Some(Overlay::PendingEdge {
        from: NodeId(0),
        cursor: Point::new(0.0, 100.0),
    }));
    let last = ctl.surface().commands().last().cloned();
    assert!(matches!(last, Some(DrawCommand::Line { width, .. }) if width == 2.0));
}

#[test]
fn test_node_removed_while_playing_comes_back_unlit() {
    let (mut ctl, _rx) = GraphController::with_seed(
        Settings::default(),
        DisplayList::new(),
        RecordingBackend::new(),
        4,
    );
    ctl.create_node(Point::new(0.0, 0.0)).unwrap();
    let b = ctl.create_node(Point::new(200.0, 0.0)).unwrap();

    ctl.trigger(b, Duration::ZERO).unwrap();
    assert!(ctl.graph().node(b).unwrap().is_playing());

    assert_eq!(ctl.undo().unwrap(), "Create node");
    assert!(!ctl.graph().contains(b));

    // The release lands while the node is gone and is skipped
    let step = ctl.tick(Duration::from_secs(1));
    assert!(step.released.is_empty());
    assert!(ctl.scheduler().is_idle());

    ctl.redo().unwrap();
    let node = ctl.graph().node(b).unwrap();
    assert!(!node.is_playing());
    assert_eq!(node.playing_count(), 0);

    let idle = ctl.specs().idle_node_color;
    let lit = ctl
        .surface()
        .commands()
        .iter()
        .filter(|cmd| matches!(cmd, DrawCommand::FillCircle { color, .. } if *color != idle))
        .count();
    assert_eq!(lit, 0);
}

#[test]
fn test_redo_before_pending_release_stays_unlit() {
    let (mut ctl, _rx) = GraphController::with_seed(
        Settings::default(),
        DisplayList::new(),
        RecordingBackend::new(),
        5,
    );
    let a = ctl.create_node(Point::new(0.0, 0.0)).unwrap();

    ctl.trigger(a, Duration::ZERO).unwrap();
    ctl.undo().unwrap();
    ctl.redo().unwrap();
    assert!(!ctl.graph().node(a).unwrap().is_playing());

    // The stale release cannot push the counter below zero
    ctl.tick(Duration::from_secs(1));
    assert_eq!(ctl.graph().node(a).unwrap().playing_count(), 0);
    ctl.trigger(a, Duration::from_secs(2)).unwrap();
    assert!(ctl.graph().node(a).unwrap().is_playing());
}
