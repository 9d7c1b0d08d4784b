use anyhow::Result;
use clap::Parser;
use instant::Instant;
use log::info;
use std::time::Duration;

use intersection_sim::{
    config::{SimulationConfig, Validate},
    render::ConsoleRenderer,
    simulation::{Axis, Intersection},
};

#[derive(Parser)]
#[command(name = "intersection-sim")]
#[command(about = "Headless four-way signalized intersection simulation")]
struct Args {
    /// Configuration file (TOML); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Milliseconds between light-phase swaps
    #[arg(short, long)]
    timing: Option<u64>,

    /// Milliseconds between vehicle spawn/release passes
    #[arg(short, long)]
    rate: Option<u64>,

    /// Random seed for reproducible simulations
    #[arg(short, long)]
    seed: Option<u64>,

    /// Seconds of wall-clock time to run
    #[arg(short, long, default_value_t = 60)]
    duration: u64,

    /// Enable verbose logging for detailed simulation progress
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            SimulationConfig::load_from_file(path)?
        }
        None => SimulationConfig::default(),
    };

    if let Some(timing) = args.timing {
        config.signals.timing_ms = timing;
    }
    if let Some(rate) = args.rate {
        config.traffic.rate_ms = rate;
    }
    if args.seed.is_some() {
        config.traffic.seed = args.seed;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .init();
    info!("Starting Intersection Simulator (Console Mode)");

    let config = load_config(&args)?;
    info!(
        "Light timing: {}ms, vehicle rate: {}ms, seed: {:?}",
        config.signals.timing_ms, config.traffic.rate_ms, config.traffic.seed
    );

    let mut intersection = Intersection::new(config, ConsoleRenderer::new());

    let frame_time = Duration::from_secs_f64(1.0 / 60.0);
    let run_for = Duration::from_secs(args.duration);
    let start_time = Instant::now();
    let mut last_report = Instant::now();
    let mut frame_count: u64 = 0;

    info!("Running simulation for {} seconds...", run_for.as_secs());

    while start_time.elapsed() < run_for {
        let frame_start = Instant::now();

        intersection.tick(start_time.elapsed());
        intersection.renderer_mut().poll();
        frame_count += 1;

        if last_report.elapsed() >= Duration::from_secs(1) {
            let stats = intersection.stats();
            info!(
                "Frame {}: NS {:?} / EW {:?}, {} queued, {} on screen, {} spawned, {} released",
                frame_count,
                intersection.phase(Axis::NorthSouth),
                intersection.phase(Axis::EastWest),
                intersection.occupancy().total(),
                intersection.renderer().live_vehicles(),
                stats.spawned,
                stats.released
            );
            last_report = Instant::now();
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    intersection.stop();

    let stats = intersection.stats();
    let total_time = start_time.elapsed();
    info!("Simulation completed!");
    info!("Total time: {:.2}s", total_time.as_secs_f64());
    info!("Total frames: {}", frame_count);
    info!("Light swaps: {}", stats.light_swaps);
    info!(
        "Vehicles: {} spawned, {} queued, {} released, {} dispatched, {} spawns skipped",
        stats.spawned, stats.queued, stats.released, stats.dispatched, stats.skipped_spawns
    );
    info!(
        "Vehicles removed by renderer: {}, still on screen: {}",
        intersection.renderer().removed(),
        intersection.renderer().live_vehicles()
    );

    Ok(())
}
