//! Goids headless driver
//!
//! Runs the flock the way a render loop would (one step per frame, dt from
//! wall-clock time) and logs flock statistics instead of drawing.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use goids::sim::{FlockSnapshot, World, spawn_ticker};
use goids::{RosterPreset, Settings};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless goid flocking simulation", long_about = None)]
struct Args {
    /// Settings file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Roster preset: sparse, classic or dense
    #[arg(short, long, value_parser = parse_preset)]
    preset: Option<RosterPreset>,

    /// Override the roster seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Frame pacing in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Step with a fixed dt instead of wall-clock time (no sleeping)
    #[arg(long)]
    fixed_dt_ms: Option<u64>,

    /// Tick on a background thread and read published snapshots
    #[arg(long)]
    threaded: bool,

    /// Log statistics every N frames
    #[arg(long, default_value_t = 60)]
    report_every: u64,

    /// Print the final snapshot as JSON on stdout
    #[arg(long)]
    dump: bool,

    /// Write the effective settings to this path and continue
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn parse_preset(s: &str) -> Result<RosterPreset, String> {
    RosterPreset::from_str(s).ok_or_else(|| format!("unknown preset '{s}'"))
}

/// Flock-wide numbers worth logging
struct FlockStats {
    centroid: [f32; 2],
    spread: f32,
    mean_heading: Option<f32>,
}

impl FlockStats {
    fn from_snapshot(snapshot: &FlockSnapshot) -> Self {
        Self {
            centroid: snapshot.centroid(),
            spread: snapshot.spread(),
            mean_heading: snapshot.mean_heading(),
        }
    }

    fn log(&self, tick: u64) {
        let heading = self
            .mean_heading
            .map_or_else(|| "none".to_string(), |h| format!("{h:+.1}"));
        log::info!(
            "tick {:>6}: centroid ({:+.4}, {:+.4}) spread {:.4} mean heading {}",
            tick,
            self.centroid[0],
            self.centroid[1],
            self.spread,
            heading
        );
    }
}

/// Single-threaded loop: step then read, no locking
fn run_interleaved(mut world: World, args: &Args) -> FlockSnapshot {
    let frame = Duration::from_millis(args.frame_ms);
    let mut last = Instant::now();
    let started = last;

    for _ in 0..args.frames {
        let dt = match args.fixed_dt_ms {
            Some(ms) => Duration::from_millis(ms),
            None => {
                thread::sleep(frame);
                let now = Instant::now();
                let elapsed = now - last;
                last = now;
                elapsed
            }
        };
        world.step(dt);

        if args.report_every > 0 && world.tick() % args.report_every == 0 {
            FlockStats::from_snapshot(&world.snapshot()).log(world.tick());
        }
    }

    let wall = started.elapsed().as_secs_f64();
    if wall > 0.0 {
        log::debug!("{} frames in {:.2}s ({:.0} fps)", args.frames, wall, args.frames as f64 / wall);
    }
    world.snapshot()
}

/// Background ticker publishes snapshots; this thread only reads them
fn run_threaded(world: World, args: &Args) -> Result<FlockSnapshot> {
    let period = Duration::from_millis(args.frame_ms);
    let (mut reader, handle) = spawn_ticker(world, period, Some(args.frames));

    let mut last_reported = 0;
    while !reader.is_closed() {
        if let Some(snapshot) = reader.wait_latest() {
            let due = args.report_every > 0 && snapshot.tick >= last_reported + args.report_every;
            if due {
                FlockStats::from_snapshot(snapshot).log(snapshot.tick);
                last_reported = snapshot.tick;
            }
        }
    }

    let world = handle
        .join()
        .map_err(|_| anyhow::anyhow!("ticker thread panicked"))?;
    Ok(world.snapshot())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if args.debug {
        "debug"
    } else {
        "info"
    }))
    .init();
    log::info!("Goids (headless) starting...");

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(preset) = args.preset {
        settings.preset = preset;
        settings.roster = None;
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    if let Some(path) = &args.save_config {
        settings
            .save(path)
            .with_context(|| format!("Failed to save settings to {}", path.display()))?;
    }

    let world = World::from_settings(&settings).context("Failed to build world")?;
    log::info!(
        "Flock ready: {} agents, preset {}, seed {}",
        world.len(),
        settings.preset.as_str(),
        settings.seed
    );

    let snapshot = if args.threaded {
        run_threaded(world, &args)?
    } else {
        run_interleaved(world, &args)
    };

    FlockStats::from_snapshot(&snapshot).log(snapshot.tick);
    if args.dump {
        let json = serde_json::to_string_pretty(&snapshot).context("Failed to encode snapshot")?;
        println!("{json}");
    }
    Ok(())
}
