mod demo;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tickline_kernel::{FrameScheduler, SchedulerConfig};
use tracing_subscriber::EnvFilter;

use demo::{DemoHooks, DemoSettings, populate};

#[derive(Parser)]
#[command(name = "tickline-cli", about = "Headless driver for the tickline frame core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Scheduler configuration: an optional YAML file plus per-field overrides.
#[derive(Args)]
struct ConfigArgs {
    /// YAML scheduler configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Fixed steps per second
    #[arg(long)]
    rate: Option<u32>,
    /// Debug time scale applied to wall deltas
    #[arg(long)]
    time_scale: Option<f64>,
}

impl ConfigArgs {
    fn load(&self) -> anyhow::Result<SchedulerConfig> {
        let mut config = match &self.config {
            Some(path) => SchedulerConfig::from_yaml_path(path)
                .with_context(|| format!("loading scheduler config from {}", path.display()))?,
            None => SchedulerConfig::default(),
        };
        if let Some(rate) = self.rate {
            config.fixed_rate = rate;
        }
        if let Some(scale) = self.time_scale {
            config.time_scale = scale;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default pacing parameters
    Info,
    /// Run the particle demo for a number of frames
    Run {
        /// Number of frames to drive
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Wall-clock delta fed to every frame, in milliseconds
        #[arg(short, long, default_value_t = 1000.0 / 60.0)]
        delta_ms: f64,
        #[command(flatten)]
        scheduler: ConfigArgs,
        /// RNG seed for the demo
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Ticks between new emitters
        #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
        emitter_interval: u64,
        /// Pause the simulation after this many frames (rendering continues)
        #[arg(long)]
        pause_after: Option<u64>,
        /// Print the final frame's draw listing
        #[arg(long)]
        show_frame: bool,
    },
    /// Report fixed steps per frame for a list of wall deltas
    Pacing {
        /// Comma-separated wall deltas in milliseconds
        #[arg(value_delimiter = ',', required = true)]
        deltas: Vec<f64>,
        #[command(flatten)]
        scheduler: ConfigArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = SchedulerConfig::default();
            println!("tickline-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", tickline_render::crate_info());
            println!(
                "defaults: rate={} Hz, step={:.3} ms, clamp={} ms, epsilon={} ms, max_steps={}",
                config.fixed_rate,
                config.step_ms(),
                config.clamp_ceiling_ms,
                config.smoothing_epsilon_ms,
                config.max_steps_per_frame()
            );
        }
        Commands::Run {
            frames,
            delta_ms,
            scheduler,
            seed,
            emitter_interval,
            pause_after,
            show_frame,
        } => {
            let mut scheduler = FrameScheduler::new(scheduler.load()?)?;
            populate(
                scheduler.world_mut(),
                DemoSettings {
                    seed,
                    emitter_interval,
                    max_emitters: 8,
                    half_extent: 20.0,
                },
            );
            let mut hooks = DemoHooks::new(seed);

            println!("Demo run: seed={seed}, frames={frames}, delta={delta_ms:.3} ms");
            let mut steps = 0u64;
            let mut clamped = 0u64;
            for frame in 0..frames {
                if pause_after == Some(frame) {
                    scheduler.set_paused(true);
                    tracing::info!(frame, tick = scheduler.world().tick(), "simulation paused");
                }
                let report = scheduler.on_frame(delta_ms, &mut hooks);
                steps += report.steps as u64;
                clamped += report.clamped as u64;
            }

            let world = scheduler.world();
            println!(
                "Result: tick={}, steps={steps}, clamped_frames={clamped}, entities={}",
                world.tick(),
                world.entity_count()
            );
            println!(
                "Totals: updated={}, reaped={}, peak_entities={}",
                hooks.total_updated, hooks.total_reaped, hooks.peak_entities
            );
            println!("State hash: {:#x}", world.state_hash());
            if show_frame {
                print!("{}", hooks.last_frame);
            }
        }
        Commands::Pacing { deltas, scheduler } => {
            let mut scheduler = FrameScheduler::new(scheduler.load()?)?;
            println!(
                "Pacing at {} Hz (max {} steps/frame)",
                scheduler.config().fixed_rate,
                scheduler.max_steps_per_frame()
            );
            for (i, delta) in deltas.iter().enumerate() {
                let report = scheduler.on_frame(*delta, &mut ());
                println!(
                    "frame {i:>3}: delta={delta:>8.3} ms  steps={}  tick={}{}",
                    report.steps,
                    report.tick,
                    if report.clamped { "  (clamped)" } else { "" }
                );
            }
        }
    }

    Ok(())
}
