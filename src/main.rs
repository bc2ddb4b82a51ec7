//! floodgraph CLI - Headless cascade run on a simulated clock

use clap::{Parser, ValueEnum};
use floodgraph::{
    CascadePolicy, DisplayList, GraphController, GraphResult, NodeId, Point, Settings,
    TracingBackend,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ringbuf::traits::Consumer;
use std::f64::consts::TAU;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Simulated clock resolution
const TICK: Duration = Duration::from_millis(10);

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Re-entry allowed, bounded by --max-depth
    Overlap,
    /// Each node fires at most once per pass
    VisitOnce,
}

#[derive(Parser)]
#[command(name = "floodgraph")]
#[command(about = "Run a node-graph cascade without a canvas", long_about = None)]
struct Cli {
    /// Settings file (.ron or .json)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Seed for cascade delays, notes and the random graph
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Build a random graph with this many nodes instead of the demo graph
    #[arg(long)]
    nodes: Option<usize>,

    /// Cycle policy (defaults to the settings file)
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Hop limit for the overlap policy
    #[arg(long)]
    max_depth: Option<u32>,

    /// Stop the simulation after this many milliseconds
    #[arg(long, default_value = "10000")]
    duration_ms: u64,
}

type Controller = GraphController<DisplayList, TracingBackend>;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> GraphResult<()> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    settings.cascade.policy = resolve_policy(cli, settings.cascade.policy);

    let (mut ctl, mut notifications) =
        GraphController::with_seed(settings, DisplayList::new(), TracingBackend, cli.seed);

    let root = match cli.nodes {
        Some(count) => build_random(&mut ctl, count, cli.seed)?,
        None => build_demo(&mut ctl)?,
    };
    println!(
        "graph: {} nodes, {} edges",
        ctl.graph().len(),
        ctl.graph().edges().count()
    );
    println!(
        "history: {} edits, last is '{}'",
        ctl.history().undo_count(),
        ctl.undo_label().unwrap_or_default()
    );

    let mut now = Duration::ZERO;
    let limit = Duration::from_millis(cli.duration_ms);
    let mut fired = 0usize;

    let step = ctl.trigger(root, now)?;
    fired += report(&ctl, now, &step.fired);

    while !ctl.scheduler().is_idle() && now < limit {
        now += TICK;
        let step = ctl.tick(now);
        fired += report(&ctl, now, &step.fired);
        if step.suppressed > 0 {
            println!("{:>8} ms  {} re-entries suppressed", now.as_millis(), step.suppressed);
        }
    }

    if !ctl.scheduler().is_idle() {
        println!("time limit reached with {} events pending", ctl.scheduler().pending());
        ctl.stop_all();
    }

    while let Some(notification) = notifications.try_pop() {
        println!("[{:?}] {}", notification.level, notification.message);
    }

    println!("{} activations, display list holds {} commands", fired, ctl.surface().len());
    Ok(())
}

fn resolve_policy(cli: &Cli, configured: CascadePolicy) -> CascadePolicy {
    let configured_depth = match configured {
        CascadePolicy::Overlap { max_depth } => max_depth,
        CascadePolicy::VisitOnce => floodgraph::CascadeConfig::DEFAULT_MAX_DEPTH,
    };

    match (cli.policy, cli.max_depth) {
        (Some(PolicyArg::VisitOnce), _) => CascadePolicy::VisitOnce,
        (Some(PolicyArg::Overlap), depth) => CascadePolicy::Overlap {
            max_depth: depth.unwrap_or(configured_depth),
        },
        (None, Some(depth)) => CascadePolicy::Overlap { max_depth: depth },
        (None, None) => configured,
    }
}

fn report(ctl: &Controller, now: Duration, fired: &[NodeId]) -> usize {
    for id in fired {
        let label = ctl.graph().index_of(*id).unwrap_or_default();
        println!("{:>8} ms  node {} fired", now.as_millis(), label);
    }
    fired.len()
}

/// Fan-out, fan-in and a back edge, rooted at node 0
fn build_demo(ctl: &mut Controller) -> GraphResult<NodeId> {
    let a = ctl.create_node(Point::new(100.0, 300.0))?;
    let b = ctl.create_node(Point::new(300.0, 150.0))?;
    let c = ctl.create_node(Point::new(300.0, 450.0))?;
    let d = ctl.create_node(Point::new(500.0, 300.0))?;

    ctl.add_edge(a, b)?;
    ctl.add_edge(a, c)?;
    ctl.add_edge(b, d)?;
    ctl.add_edge(c, d)?;
    ctl.add_edge(d, a)?;
    Ok(a)
}

/// Nodes on a circle, each wired to up to two random others
fn build_random(ctl: &mut Controller, count: usize, seed: u64) -> GraphResult<NodeId> {
    let count = count.max(1);
    let mut rng = StdRng::seed_from_u64(seed);
    let center = Point::new(600.0, 600.0);
    let ring = 120.0 * count as f64 / TAU + 200.0;

    let mut ids = Vec::with_capacity(count);
    for i in 0..count {
        let angle = TAU * i as f64 / count as f64;
        ids.push(ctl.create_node(center.offset_polar(ring, angle))?);
    }

    if count > 1 {
        for &from in &ids {
            for _ in 0..rng.gen_range(1..=2) {
                let to = ids[rng.gen_range(0..count)];
                if to != from {
                    ctl.add_edge(from, to)?;
                }
            }
        }
    }

    Ok(ids[0])
}
