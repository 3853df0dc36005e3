use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::api::RuntimeHandle;

/// Interval-driven bulk tick over every persisted creature.
pub struct TickWorker {
    handle: RuntimeHandle,
    period: Duration,
}

impl TickWorker {
    pub fn new(handle: RuntimeHandle, period: Duration) -> Self {
        Self { handle, period }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs until the task is aborted. The first tick fires one full period
    /// after start.
    pub async fn run(self) {
        let mut ticks = interval(self.period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticks.tick().await;

        loop {
            ticks.tick().await;

            let report = self.handle.tick_every_creature().await;
            let evicted = self.handle.fight_cache().purge_expired().await;

            if report.failures.is_empty() {
                debug!(
                    target: "runtime::worker",
                    ticked = report.ticked,
                    events = report.events,
                    evicted,
                    "Scheduled tick"
                );
            } else {
                warn!(
                    target: "runtime::worker",
                    ticked = report.ticked,
                    failures = report.failures.len(),
                    "Scheduled tick finished with failures"
                );
            }
        }
    }
}
