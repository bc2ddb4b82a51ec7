//! Cascade behavior through the public API
//!
//! Drives the scheduler on a simulated clock and checks fan-out timing,
//! cycle policies and the playing highlight.

use floodgraph::audio::{NodeBehavior, PlayedSound, SynthConfig, SynthVoice};
use floodgraph::{
    AudioHost, CascadeConfig, CascadePolicy, CascadeScheduler, Graph, NodeId, Point,
    RecordingBackend,
};
use std::time::Duration;

const STEP: Duration = Duration::from_millis(1);

fn synth() -> NodeBehavior {
    NodeBehavior::Synth(SynthVoice::from_config(&SynthConfig::default()).unwrap())
}

fn build(positions: usize, edges: &[(usize, usize)]) -> (Graph, Vec<NodeId>) {
    let mut graph = Graph::new();
    let ids: Vec<NodeId> = (0..positions)
        .map(|i| graph.create_node(Point::new(i as f64 * 120.0, 0.0), synth()))
        .collect();
    for &(p, c) in edges {
        graph.add_child(ids[p], ids[c]).unwrap();
    }
    (graph, ids)
}

/// Run until idle, returning (time, node) for every activation
fn run_to_idle(
    scheduler: &mut CascadeScheduler,
    graph: &mut Graph,
    audio: &mut AudioHost<RecordingBackend>,
    root: NodeId,
) -> Vec<(Duration, NodeId)> {
    let mut now = Duration::ZERO;
    let mut fired: Vec<(Duration, NodeId)> = scheduler
        .flood_trigger(graph, root, now, audio)
        .unwrap()
        .fired
        .into_iter()
        .map(|id| (now, id))
        .collect();

    while !scheduler.is_idle() {
        now += STEP;
        let step = scheduler.tick(graph, now, audio);
        fired.extend(step.fired.into_iter().map(|id| (now, id)));
        assert!(now < Duration::from_secs(600), "cascade did not settle");
    }
    fired
}

#[test]
fn test_fan_out_children_fire_once_within_delay_window() {
    for seed in 0..20 {
        let (mut graph, ids) = build(3, &[(0, 1), (0, 2)]);
        let mut audio = AudioHost::with_seed(RecordingBackend::new(), seed);
        let mut scheduler = CascadeScheduler::with_seed(CascadeConfig::default(), seed);

        let fired = run_to_idle(&mut scheduler, &mut graph, &mut audio, ids[0]);

        assert_eq!(fired.len(), 3);
        for child in [ids[1], ids[2]] {
            let hits: Vec<_> = fired.iter().filter(|(_, id)| *id == child).collect();
            assert_eq!(hits.len(), 1);
            assert!(hits[0].0 <= Duration::from_millis(1000));
        }
        assert_eq!(audio.backend().played().len(), 3);
    }
}

#[test]
fn test_two_node_cycle_settles_under_both_policies() {
    let policies = [
        (CascadePolicy::default(), 65),
        (CascadePolicy::Overlap { max_depth: 3 }, 4),
        (CascadePolicy::VisitOnce, 2),
    ];

    for (policy, expected) in policies {
        let (mut graph, ids) = build(2, &[(0, 1), (1, 0)]);
        let mut audio = AudioHost::with_seed(RecordingBackend::new(), 1);
        let config = CascadeConfig {
            policy,
            max_delay_ms: 50.0,
            ..CascadeConfig::default()
        };
        let mut scheduler = CascadeScheduler::with_seed(config, 1);

        let fired = run_to_idle(&mut scheduler, &mut graph, &mut audio, ids[0]);
        assert_eq!(fired.len(), expected, "{policy:?}");
        assert_eq!(scheduler.active_passes(), 0);
        assert!(graph.nodes().iter().all(|n| !n.is_playing()));
    }
}

#[test]
fn test_overlapping_passes_share_nodes() {
    let (mut graph, ids) = build(2, &[(0, 1)]);
    let mut audio = AudioHost::with_seed(RecordingBackend::new(), 2);
    let config = CascadeConfig {
        max_delay_ms: 0.0,
        ..CascadeConfig::default()
    };
    let mut scheduler = CascadeScheduler::with_seed(config, 2);

    let now = Duration::ZERO;
    scheduler.flood_trigger(&mut graph, ids[1], now, &mut audio).unwrap();
    scheduler.flood_trigger(&mut graph, ids[0], now, &mut audio).unwrap();
    assert_eq!(scheduler.active_passes(), 2);

    // Zero delay: the child fires on the next tick at the same instant
    let step = scheduler.tick(&mut graph, now, &mut audio);
    assert_eq!(step.fired, vec![ids[1]]);
    assert_eq!(graph.node(ids[1]).unwrap().playing_count(), 2);

    scheduler.tick(&mut graph, Duration::from_millis(250), &mut audio);
    assert_eq!(graph.node(ids[1]).unwrap().playing_count(), 0);
    assert!(scheduler.is_idle());
}

#[test]
fn test_chords_follow_scale_settings() {
    let mut graph = Graph::new();
    let config = SynthConfig {
        base: 220.0,
        scale: "slendro".into(),
        ..SynthConfig::default()
    };
    let mut voice = SynthVoice::from_config(&config).unwrap();
    voice.set_note_inclusion(1, true);
    let node = graph.create_node(Point::origin(), NodeBehavior::Synth(voice));

    let mut audio = AudioHost::with_seed(RecordingBackend::new(), 4);
    let mut scheduler = CascadeScheduler::with_seed(CascadeConfig::default(), 4);
    scheduler.flood_trigger(&mut graph, node, Duration::ZERO, &mut audio).unwrap();

    match &audio.backend().played()[0] {
        PlayedSound::Chord { frequencies, release_ms } => {
            assert_eq!(frequencies.len(), 2);
            assert_eq!(frequencies[0], 220.0);
            assert_eq!(*release_ms, 250.0);
        }
        other => panic!("unexpected sound {other:?}"),
    }
}

#[test]
fn test_removed_node_events_are_skipped() {
    let (mut graph, ids) = build(2, &[(0, 1)]);
    let mut audio = AudioHost::with_seed(RecordingBackend::new(), 5);
    let mut scheduler = CascadeScheduler::with_seed(CascadeConfig::default(), 5);

    scheduler.flood_trigger(&mut graph, ids[0], Duration::ZERO, &mut audio).unwrap();
    graph.remove_node(ids[1]).unwrap();

    let step = scheduler.tick(&mut graph, Duration::from_secs(5), &mut audio);
    assert!(step.fired.is_empty());
    assert!(scheduler.is_idle());
    assert!(!graph.node(ids[0]).unwrap().is_playing());
}
