//! Status polling until a lifecycle command takes effect.

use crate::hypervisor::{Hypervisor, VmStatus};

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

/// Suspends the poll loop between two status queries.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration` before the next query is issued.
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            // Still hand control back so other tasks run between queries.
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Repeatedly queries one VM's status until a target status is observed.
///
/// There is no attempt limit and no timeout. A VM stuck mid-transition
/// keeps the loop alive for as long as the runtime runs.
pub struct StatePoller {
    hypervisor: Arc<dyn Hypervisor>,
    sleeper: Arc<dyn Sleeper>,
    interval: Duration,
}

impl StatePoller {
    /// Create a poller that re-queries immediately after each response.
    pub fn new(hypervisor: Arc<dyn Hypervisor>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            hypervisor,
            sleeper,
            interval: Duration::ZERO,
        }
    }

    /// Set a fixed pause between consecutive queries.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Pause between consecutive queries.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll `name` until its status output contains the `target` marker.
    ///
    /// Each query completes before the next one starts. A failed query is
    /// treated like a status that has not changed yet. Returns the number
    /// of queries issued.
    #[instrument(skip(self, target), fields(target = %target))]
    pub async fn wait_for_status(&self, name: &str, target: &VmStatus) -> u64 {
        let mut attempts: u64 = 0;

        loop {
            attempts += 1;

            match self.hypervisor.query_status(name).await {
                Ok(output) if target.matches_output(&output) => {
                    info!(vm = %name, attempts, "Target status reached");
                    return attempts;
                }
                Ok(output) => {
                    debug!(vm = %name, attempts, output = %output.trim(), "Status not reached yet");
                }
                Err(e) => {
                    warn!(vm = %name, attempts, error = ?e, "Status query failed, polling again");
                }
            }

            self.sleeper.sleep(self.interval).await;
        }
    }
}
