use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stride::config::{ConfigError, ControllerConfig};
use stride::engine::time::FrameTimer;
use stride::scene::{demo_scenario, Scenario, SceneError};
use stride::sim::Simulation;

const DEFAULT_DURATION: f32 = 8.0;

#[derive(Parser)]
#[command(name = "stride", about = "Headless platformer character controller")]
struct Args {
    /// Controller tuning as JSON. Missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Scenario JSON. Runs the built-in demo course when omitted.
    #[arg(long)]
    scene: Option<PathBuf>,
    /// Seconds to simulate. Defaults to the scenario's own duration.
    #[arg(long)]
    duration: Option<f32>,
    #[arg(long, default_value_t = 60.0)]
    frame_rate: f32,
    #[arg(long, default_value_t = 50.0)]
    physics_rate: f32,
    /// Pace frames against the wall clock instead of stepping as fast as possible.
    #[arg(long)]
    realtime: bool,
    /// Print the end-of-run summary as JSON on stdout.
    #[arg(long)]
    summary_json: bool,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("{name} must be a positive rate, got {value}")]
    Rate { name: &'static str, value: f32 },
    #[error("duration must be a finite, non-negative number of seconds, got {0}")]
    Duration(f32),
    #[error("failed to encode summary: {0}")]
    Summary(#[from] serde_json::Error),
}

fn main() {
    init_tracing();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        error!(error = %err, "startup_failed");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), StartupError> {
    for (name, value) in [
        ("frame_rate", args.frame_rate),
        ("physics_rate", args.physics_rate),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(StartupError::Rate { name, value });
        }
    }

    let config = match &args.config {
        Some(path) => ControllerConfig::load(path)?,
        None => ControllerConfig::default(),
    };
    let scenario = match &args.scene {
        Some(path) => Scenario::load(path)?,
        None => demo_scenario(),
    };
    let duration = resolve_duration(args.duration, scenario.duration)?;

    let frame_dt = 1.0 / args.frame_rate;
    let mut sim = Simulation::new(&config, &scenario, 1.0 / args.physics_rate);
    info!(scenario = %scenario.name, duration, frame_dt, realtime = args.realtime, "run_started");

    let summary = if args.realtime {
        let mut timer = FrameTimer::new();
        let frame_budget = Duration::from_secs_f32(frame_dt);
        let mut elapsed = 0.0;
        while elapsed < duration {
            thread::sleep(frame_budget);
            timer.tick();
            sim.frame(timer.dt);
            elapsed += timer.dt;
        }
        sim.summary()
    } else {
        sim.run_for(duration, frame_dt)
    };

    info!(
        final_mode = ?summary.final_mode,
        jumps = summary.jumps_fired,
        died = summary.died_events,
        reached = summary.reached_destination_events,
        "run_finished"
    );
    if args.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

/// Command line wins over the scenario's own duration.
fn resolve_duration(requested: Option<f32>, scenario: Option<f32>) -> Result<f32, StartupError> {
    let duration = requested.or(scenario).unwrap_or(DEFAULT_DURATION);
    if !(duration.is_finite() && duration >= 0.0) {
        return Err(StartupError::Duration(duration));
    }
    Ok(duration)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
