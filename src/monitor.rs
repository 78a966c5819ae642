//! # Periodic Wave Monitors
//!
//! One background task per monitored buoy drives the synthetic wave feed:
//! generate a sample near the buoy's anchored coordinates, submit it to the
//! store's append operation, sleep for the configured interval, repeat.
//!
//! ## Failure Policy
//!
//! A failed append is reported through `tracing` and then abandoned; the
//! next scheduled attempt supersedes it. There is no retry inside the
//! interval, and no single failure ever terminates a loop or the process.
//! The only observable symptom of repeated failures is a gap in that buoy's
//! wave history.
//!
//! ## Supervision
//!
//! Loops run until cancelled. The [`MonitorSupervisor`] keeps a registry of
//! running tasks keyed by buoy id, each with its own shutdown channel, so a
//! single buoy's loop can be stopped without disturbing the others and the
//! whole set can be shut down cleanly at process exit. Cancellation is
//! observed at the interval wait: a loop that has been told to stop appends
//! nothing further.

use crate::store::BuoyStore;
use crate::wave_gen::WaveGenerator;
use crate::BuoyReference;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Default spacing between samples for a monitored buoy.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Run the insertion loop for one buoy until `shutdown` fires.
///
/// The first sample is appended immediately at startup; subsequent samples
/// follow every `interval`, which must be non-zero. Each task owns an
/// entropy-seeded generator, so concurrent monitors never contend on a
/// shared random source.
///
/// The `biased` arm order makes a pending shutdown win over an elapsed
/// tick, which keeps cancellation prompt even with very short intervals.
pub async fn run_monitor(
    store: Arc<dyn BuoyStore>,
    reference: BuoyReference,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut generator = WaveGenerator::from_entropy();
    let mut ticker = tokio::time::interval(interval);

    info!(
        buoy = %reference.id,
        latitude = reference.latitude,
        longitude = reference.longitude,
        interval_secs = interval.as_secs_f64(),
        "wave monitor started"
    );

    loop {
        tokio::select! {
            biased;

            _ = shutdown.recv() => {
                info!(buoy = %reference.id, "wave monitor stopped");
                break;
            }

            _ = ticker.tick() => {
                let sample = generator.generate(reference.latitude, reference.longitude);
                match store.append_wave_sample(&reference.id, sample).await {
                    Ok(()) => debug!(buoy = %reference.id, "wave sample appended"),
                    Err(error) => warn!(
                        buoy = %reference.id,
                        %error,
                        "failed to append wave sample; next attempt at the scheduled interval"
                    ),
                }
            }
        }
    }
}

struct MonitorHandle {
    shutdown: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

/// Registry of running per-buoy monitor tasks.
///
/// Each spawned loop gets its own shutdown channel. Loops are independent:
/// stopping one leaves the others running, and none of them share mutable
/// state beyond the store itself.
#[derive(Default)]
pub struct MonitorSupervisor {
    monitors: HashMap<String, MonitorHandle>,
}

impl MonitorSupervisor {
    pub fn new() -> Self {
        MonitorSupervisor {
            monitors: HashMap::new(),
        }
    }

    /// Spawn a monitor loop for `reference` and register it under its id.
    ///
    /// Spawning a buoy that is already monitored replaces the old loop; the
    /// superseded task is signalled to stop and dropped from the registry.
    pub fn spawn(
        &mut self,
        store: Arc<dyn BuoyStore>,
        reference: BuoyReference,
        interval: Duration,
    ) {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let id = reference.id.clone();
        let task = tokio::spawn(run_monitor(store, reference, interval, shutdown_rx));

        if let Some(old) = self.monitors.insert(
            id.clone(),
            MonitorHandle {
                shutdown: shutdown_tx,
                task,
            },
        ) {
            // The superseded loop exits at its next suspension point.
            warn!(buoy = %id, "replacing existing monitor");
            let _ = old.shutdown.send(());
        }
    }

    /// Ids of buoys with a registered monitor.
    pub fn running(&self) -> Vec<String> {
        self.monitors.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Stop the monitor for one buoy and wait for it to finish.
    ///
    /// Returns `false` if no monitor was registered under `id`.
    pub async fn stop(&mut self, id: &str) -> bool {
        let Some(handle) = self.monitors.remove(id) else {
            return false;
        };
        let _ = handle.shutdown.send(());
        if let Err(error) = handle.task.await {
            warn!(buoy = %id, %error, "monitor task did not exit cleanly");
        }
        true
    }

    /// Stop every monitor and wait for all of them to finish.
    pub async fn shutdown(mut self) {
        // Signal everything first so the loops wind down in parallel.
        for handle in self.monitors.values() {
            let _ = handle.shutdown.send(());
        }
        for (id, handle) in self.monitors.drain() {
            if let Err(error) = handle.task.await {
                warn!(buoy = %id, %error, "monitor task did not exit cleanly");
            }
        }
        info!("all wave monitors stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::BuoyRecord;

    #[tokio::test]
    async fn test_supervisor_tracks_spawned_monitors() {
        let store = Arc::new(MemoryStore::new());
        for id in ["B1", "B2"] {
            store
                .create_buoy(BuoyRecord::new(id, "name", "site"))
                .await
                .unwrap();
        }

        let mut supervisor = MonitorSupervisor::new();
        assert!(supervisor.is_empty());

        supervisor.spawn(
            store.clone() as Arc<dyn BuoyStore>,
            BuoyReference::new("B1", 34.3, -120.6),
            Duration::from_secs(60),
        );
        supervisor.spawn(
            store.clone() as Arc<dyn BuoyStore>,
            BuoyReference::new("B2", 44.6, -67.3),
            Duration::from_secs(60),
        );

        assert_eq!(supervisor.len(), 2);
        let mut running = supervisor.running();
        running.sort();
        assert_eq!(running, vec!["B1", "B2"]);

        supervisor.shutdown().await;
    }

    #[tokio::test]
    async fn test_stopping_one_monitor_leaves_others_registered() {
        let store = Arc::new(MemoryStore::new());
        for id in ["B1", "B2"] {
            store
                .create_buoy(BuoyRecord::new(id, "name", "site"))
                .await
                .unwrap();
        }

        let mut supervisor = MonitorSupervisor::new();
        supervisor.spawn(
            store.clone() as Arc<dyn BuoyStore>,
            BuoyReference::new("B1", 34.3, -120.6),
            Duration::from_secs(60),
        );
        supervisor.spawn(
            store.clone() as Arc<dyn BuoyStore>,
            BuoyReference::new("B2", 44.6, -67.3),
            Duration::from_secs(60),
        );

        assert!(supervisor.stop("B1").await);
        assert!(!supervisor.stop("B1").await);
        assert_eq!(supervisor.running(), vec!["B2"]);

        supervisor.shutdown().await;
    }

    #[tokio::test]
    async fn test_monitor_appends_first_sample_immediately() {
        let store = Arc::new(MemoryStore::new());
        store
            .create_buoy(BuoyRecord::new("B1", "name", "site"))
            .await
            .unwrap();

        let mut supervisor = MonitorSupervisor::new();
        supervisor.spawn(
            store.clone() as Arc<dyn BuoyStore>,
            BuoyReference::new("B1", 34.3, -120.6),
            Duration::from_secs(3600),
        );

        // The first tick fires at spawn; with an hour-long interval nothing
        // else can land before the check.
        tokio::time::sleep(Duration::from_millis(200)).await;
        let record = store.get_buoy("B1").await.unwrap();
        assert_eq!(record.waves.len(), 1);

        supervisor.shutdown().await;

        let record = store.get_buoy("B1").await.unwrap();
        assert_eq!(record.waves.len(), 1, "no sample may land after shutdown");
    }
}
