use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::Instant;

use clap::Parser;
use worlds::prelude::*;
use worlds::runtime::storage::{
    default_config_path, load_config, load_config_if_exists, save_timeline,
};

/// Plays the Worlds piece headlessly: builds the sphere cluster, runs the
/// motion plan against a silent timed track and exits when the track ends.
#[derive(Debug, Parser)]
#[command(name = "worlds-player", version)]
struct Args {
    /// YAML config. Defaults to the per-user config file when it exists.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for spin jitter. Overrides the config file.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Playback speed multiplier for both the scene and the track.
    #[arg(long, default_value_t = 1.0)]
    rate: f32,

    /// Write the generated timeline as JSON before starting.
    #[arg(long)]
    dump_timeline: Option<PathBuf>,

    #[arg(long)]
    track: Option<PathBuf>,

    /// Track duration in seconds.
    #[arg(long)]
    duration: Option<f32>,
}

fn main() {
    init_logger();
    let args = Args::parse();

    if let Err(err) = run(args) {
        eprintln!("worlds-player failed: {}", err);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), WorldsError> {
    validate_args(&args)?;
    let mut config = resolve_config(args.config.as_deref())?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(track) = args.track {
        config.audio.track = track;
    }
    if let Some(duration) = args.duration {
        config.audio.duration = duration;
    }

    let rng = SeededRandom::from_optional_seed(config.seed);
    match rng.seed() {
        Some(seed) => info!("Seed: {}", seed),
        None => info!("Seed: entropy"),
    }

    let audio = TimedPlayer::load(&config.audio.track_resource())?
        .with_rate(args.rate);
    let mut choreographer =
        Choreographer::new(&config, Stage::new(), audio, Box::new(rng))?;

    if let Some(path) = &args.dump_timeline {
        let timeline = choreographer.prepare_timeline()?;
        save_timeline(path, timeline)?;
        info!("Timeline written to {}", path.display());
    }

    choreographer.on_appear();
    choreographer.on_start()?;

    let mut clock = FrameClock::new(args.fps).with_rate(args.rate);
    while choreographer.state() == ChoreographerState::Running {
        let tick = clock.tick(Instant::now());
        if tick.should_render() {
            choreographer.runtime_mut().advance(tick.scene_dt);
        }
        choreographer.pump_events();

        let wait = clock
            .next_deadline()
            .saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            thread::sleep(wait);
        }
    }

    info!(
        "Finished after {:.1}s of scene time, {} frames",
        choreographer.runtime().elapsed(),
        clock.frame_count()
    );
    choreographer.stop();

    Ok(())
}

/// The scene clock and the timed track must agree on `rate`, so anything
/// either would have to coerce is rejected up front.
fn validate_args(args: &Args) -> Result<(), WorldsError> {
    ensure_finite_positive("fps", args.fps)?;
    ensure_finite_positive("rate", args.rate)?;
    Ok(())
}

fn resolve_config(
    path: Option<&Path>,
) -> Result<WorldsConfig, WorldsError> {
    if let Some(path) = path {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) => {
            let config = load_config_if_exists(&path)?;
            if config.is_some() {
                info!("Loaded {}", path.display());
            }
            Ok(config.unwrap_or_default())
        }
        None => Ok(WorldsConfig::default()),
    }
}
