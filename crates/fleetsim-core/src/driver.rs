//! Driver Loop
//!
//! Runs the simulation step on a fixed cadence in a background task and
//! publishes every new fleet through a `watch` channel. Readers always see
//! a complete fleet: each tick swaps in a new `Arc<Fleet>`, the previous
//! value is never modified.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::fleet::Fleet;
use crate::simulation::FleetSimulator;

/// Background task advancing a fleet once per interval
pub struct FleetDriver {
    rx: watch::Receiver<Arc<Fleet>>,
    task: Option<JoinHandle<()>>,
    interval: Duration,
}

impl FleetDriver {
    /// Start ticking `initial` forward every `interval`
    ///
    /// Simulated time per tick equals `interval`. The first step runs one
    /// full interval after spawning. Must be called inside a tokio runtime.
    pub fn spawn<R>(mut simulator: FleetSimulator<R>, initial: Fleet, interval: Duration) -> Self
    where
        R: Rng + Send + 'static,
    {
        let interval = interval.max(Duration::from_millis(1));
        let dt_seconds = interval.as_secs_f64();
        let (tx, rx) = watch::channel(Arc::new(initial));

        info!(
            vehicles = rx.borrow().len(),
            interval_ms = interval.as_millis() as u64,
            "Starting fleet driver"
        );

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval completes immediately
            ticker.tick().await;

            let mut tick: u64 = 0;
            loop {
                ticker.tick().await;
                tick += 1;

                let current = tx.borrow().clone();
                let next = simulator.step(&current, dt_seconds);
                tx.send_replace(Arc::new(next));
                debug!(tick, "Published fleet");
            }
        });

        Self {
            rx,
            task: Some(task),
            interval,
        }
    }

    /// Receiver notified after every published tick
    pub fn subscribe(&self) -> watch::Receiver<Arc<Fleet>> {
        self.rx.clone()
    }

    /// The most recently published fleet
    pub fn current(&self) -> Arc<Fleet> {
        self.rx.borrow().clone()
    }

    /// Tick cadence
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the background task is still scheduled
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop ticking. The last published fleet stays readable.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Stopped fleet driver");
        }
    }
}

impl Drop for FleetDriver {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
