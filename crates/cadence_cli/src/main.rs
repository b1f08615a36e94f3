//! Cadence CLI
//!
//! Drives a demo tween chain with either fixed-step or real-time ticks.

mod config;
mod demo;

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use cadence_core::OwnerKey;
use cadence_tween::{TweenError, TweenScheduler};

use config::{CadenceConfig, CONFIG_FILE};

/// Cadence tween engine
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(about = "Run tween chains from the command line", long_about = None)]
struct Cli {
    /// Log filter (overrides RUST_LOG), e.g. "debug" or "cadence_tween=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play the demo chain and tick it until it finishes
    Run {
        /// Config file or directory containing cadence.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Ticks per second
        #[arg(long)]
        fps: Option<u32>,

        /// Stop after this many seconds
        #[arg(long)]
        seconds: Option<f64>,

        /// Sleep between frames and tick by wall-clock time
        #[arg(long)]
        realtime: bool,

        /// Multiplier applied to every tick delta
        #[arg(long)]
        time_scale: Option<f64>,
    },

    /// Write a default cadence.toml
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Run {
            config,
            fps,
            seconds,
            realtime,
            time_scale,
        } => {
            let mut cfg = match config {
                Some(path) => CadenceConfig::load(&path)?,
                None => CadenceConfig::default(),
            };
            if let Some(fps) = fps {
                cfg.run.fps = fps;
            }
            if let Some(seconds) = seconds {
                cfg.run.seconds = seconds;
            }
            if let Some(scale) = time_scale {
                cfg.scheduler.time_scale = scale;
            }
            cfg.run.realtime |= realtime;
            cfg.validate().context("Invalid settings")?;
            cmd_run(&cfg)
        }
        Commands::Init { path, force } => cmd_init(path, force),
    }
}

fn cmd_run(cfg: &CadenceConfig) -> Result<()> {
    let scheduler = TweenScheduler::with_config(cfg.scheduler_config());
    let sprite = Rc::new(demo::Sprite::default());
    let owner = OwnerKey::new();
    let _guard = scheduler.owner_guard(owner);

    let root = demo::build(&sprite).context("Failed to build demo chain")?;
    let handle = scheduler.play(root, owner)?;
    handle.set_on_dispose(|| debug!("demo handle disposed"));

    let fps = cfg.run.fps;
    let frame = 1.0 / f64::from(fps);
    let max_frames = (cfg.run.seconds * f64::from(fps)).ceil() as u64;
    info!(
        "Running demo at {} fps for up to {:.1}s ({})",
        fps,
        cfg.run.seconds,
        if cfg.run.realtime { "real time" } else { "fixed step" }
    );

    if cfg.run.realtime {
        // Prime the frame clock; the first measured delta is zero.
        scheduler.tick_elapsed()?;
    }

    let mut frames = 0;
    while frames < max_frames && scheduler.has_active_tweens() {
        let result = if cfg.run.realtime {
            thread::sleep(Duration::from_secs_f64(frame));
            scheduler.tick_elapsed()
        } else {
            scheduler.tick(frame)
        };
        frames += 1;

        match result {
            Ok(report) => debug!("frame {}: {:?}", frames, report),
            Err(TweenError::HandlesFaulted(faults)) => {
                for fault in faults {
                    warn!("{:?} ({}) faulted: {}", fault.handle, fault.owner, fault.message);
                }
            }
            Err(err) => return Err(err.into()),
        }

        if frames % u64::from(fps) == 0 {
            info!("t={}s {}", frames / u64::from(fps), sprite.describe());
        }
    }

    info!("Stopped after {} frames: {}", frames, sprite.describe());
    info!("Demo handle state: {:?}", handle.state());
    Ok(())
}

fn cmd_init(path: PathBuf, force: bool) -> Result<()> {
    let target = path.join(CONFIG_FILE);
    if target.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", target.display());
    }

    fs::create_dir_all(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let content = CadenceConfig::default().to_toml()?;
    fs::write(&target, content).with_context(|| format!("Failed to write {}", target.display()))?;

    info!("Wrote {}", target.display());
    Ok(())
}
