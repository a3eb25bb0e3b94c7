//! Headless driver: runs the cave simulation on a timer and renders frames to the terminal.

mod render;
mod telemetry;

use anyhow::{Context, Result};
use cave_core::{DriverConfig, Element, Emitter};
use cave_world::Simulation;
use std::io::Write;
use tokio::signal;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let config = load_config()?;
    info!(
        width = config.cave.width,
        height = config.cave.height,
        seed = config.cave.seed,
        tick_interval_ms = config.cave.tick_interval_ms,
        emitters = config.emitters.len(),
        "Starting cave driver"
    );

    let mut simulation = Simulation::new(config.cave.clone())?;
    run_clock(&mut simulation, &config).await?;

    let census = simulation.census();
    info!(
        generation = simulation.generation(),
        sand = census.count(Element::Sand),
        water_cells = census.count(Element::Water),
        water_volume = census.total_water,
        wood = census.count(Element::Wood),
        fire = census.count(Element::Fire),
        smoke = census.count(Element::Smoke),
        "Simulation stopped"
    );

    Ok(())
}

/// First CLI argument is an optional JSON config path; `CAVE_SEED` overrides the seed
fn load_config() -> Result<DriverConfig> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => DriverConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => DriverConfig::default(),
    };

    if let Ok(seed) = std::env::var("CAVE_SEED") {
        config.cave.seed = seed
            .parse()
            .with_context(|| format!("CAVE_SEED is not a valid u64: {}", seed))?;
    }

    config.validate()?;
    Ok(config)
}

/// Tick on a fixed interval until the generation limit or a shutdown signal.
///
/// Each tick completes before the interval is polled again, so ticks never overlap.
async fn run_clock(simulation: &mut Simulation, config: &DriverConfig) -> Result<()> {
    let mut ticker = interval(Duration::from_millis(config.cave.tick_interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let placed = apply_emitters(simulation, &config.emitters);
                let generation = simulation.tick();
                debug!(generation, placed, "Generation advanced");

                if config.render_every > 0 && generation % config.render_every == 0 {
                    let frame = render::render_frame(&simulation.grid().read(), generation);
                    let mut stdout = std::io::stdout().lock();
                    write!(stdout, "\x1b[2J\x1b[H{}", frame)?;
                    stdout.flush()?;
                }

                if config.max_generations.is_some_and(|max| generation >= max) {
                    info!(generation, "Generation limit reached");
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Place every emitter due this generation; returns how many were accepted
fn apply_emitters(simulation: &mut Simulation, emitters: &[Emitter]) -> usize {
    let generation = simulation.generation();
    emitters
        .iter()
        .filter(|e| generation % e.period == 0)
        .filter(|e| simulation.place(e.position, e.element))
        .count()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
