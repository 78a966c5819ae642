//! # Buoy Tracker Application Entry Point
//!
//! This binary wires the service together: configuration, the in-process
//! record store, and one background wave monitor per configured buoy. It
//! supports both service mode (monitors run until Ctrl-C) and a development
//! mode (`--once`) that prints a single generated sample per buoy and exits.

// Test modules
#[cfg(test)]
mod tests;

// Re-export library types for internal use
pub use buoy_tracker_lib::{config::Config, BuoyRecord, BuoyReference, WaveSample};

use anyhow::Result;
use buoy_tracker_lib::monitor::MonitorSupervisor;
use buoy_tracker_lib::store::{BuoyStore, MemoryStore};
use buoy_tracker_lib::wave_gen::WaveGenerator;
use std::env;
use std::sync::Arc;
use tracing::{error, info};

/// Main application entry point.
fn main() -> Result<()> {
    // Parse command line arguments
    // Development mode: generate one sample per configured buoy, print as
    // JSON, and exit without starting the monitors
    let once_mode = env::args().any(|arg| arg == "--once");

    // RUST_LOG controls filtering, e.g. RUST_LOG=buoy_tracker_lib=debug
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load();

    if once_mode {
        let mut generator = WaveGenerator::from_entropy();
        for buoy in &config.buoys {
            let sample = generator.generate(buoy.latitude, buoy.longitude);
            println!("{}", serde_json::to_string_pretty(&sample)?);
        }
        return Ok(());
    }

    // Create Tokio runtime for the store and the monitor tasks
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config))
}

/// Service mode: seed the store from config, start the monitors, and run
/// until a shutdown signal arrives.
async fn run(config: Config) -> Result<()> {
    let store: Arc<dyn BuoyStore> = Arc::new(MemoryStore::new());

    // One record per configured buoy so the monitors have something to
    // append to. A seeding failure for one buoy must not block the others.
    for buoy in &config.buoys {
        let record = BuoyRecord::new(
            buoy.id.clone(),
            buoy.name.clone(),
            format!("{:.5}, {:.5}", buoy.latitude, buoy.longitude),
        );
        if let Err(error) = store.create_buoy(record).await {
            error!(buoy = %buoy.id, %error, "failed to seed buoy record");
        }
    }

    let mut supervisor = MonitorSupervisor::new();
    for buoy in &config.buoys {
        supervisor.spawn(
            Arc::clone(&store),
            buoy.reference(),
            config.interval_for(buoy),
        );
    }
    info!(
        monitors = supervisor.len(),
        "buoy tracker running; Ctrl-C to stop"
    );

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    supervisor.shutdown().await;

    for record in store.list_buoys().await? {
        info!(
            buoy = %record.id,
            samples = record.waves.len(),
            "wave history at shutdown"
        );
    }

    Ok(())
}
