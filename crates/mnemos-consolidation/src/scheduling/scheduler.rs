use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

use mnemos_core::models::ConsolidationReport;

use crate::engine::ConsolidationPipeline;

/// Consolidates a fixed list of agents every `interval`.
///
/// Runs are blocking (SQLite and capability calls), so each one moves to the
/// blocking pool. Agents are processed one after another within a tick.
pub struct ConsolidationScheduler {
    pipeline: Arc<ConsolidationPipeline>,
    agents: Vec<String>,
    interval: Duration,
}

/// Stops the scheduler when signalled or dropped.
pub struct SchedulerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<u64>,
}

impl SchedulerHandle {
    /// Signal shutdown and wait for the loop to exit. Returns the number of
    /// ticks that ran. A tick in progress is allowed to finish.
    pub async fn shutdown(mut self) -> u64 {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match (&mut self.task).await {
            Ok(ticks) => ticks,
            Err(e) => {
                error!(error = %e, "consolidation scheduler task failed");
                0
            }
        }
    }
}

impl ConsolidationScheduler {
    /// Interval comes from the pipeline's `consolidation.interval_secs`.
    pub fn new(pipeline: Arc<ConsolidationPipeline>, agents: Vec<String>) -> Self {
        let interval = Duration::from_secs(pipeline.config().interval_secs.max(1));
        Self {
            pipeline,
            agents,
            interval,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Consolidate every agent once. Failed runs are logged and left out.
    pub async fn run_once(&self) -> Vec<ConsolidationReport> {
        let mut reports = Vec::with_capacity(self.agents.len());
        for agent_id in &self.agents {
            let pipeline = Arc::clone(&self.pipeline);
            let agent = agent_id.clone();
            match tokio::task::spawn_blocking(move || pipeline.consolidate(&agent)).await {
                Ok(Ok(report)) => {
                    info!(
                        agent_id = %agent_id,
                        admitted = report.admitted.len(),
                        compressed = report.compressed.len(),
                        errors = report.errors.len(),
                        "scheduled consolidation finished"
                    );
                    reports.push(report);
                }
                Ok(Err(e)) => {
                    warn!(agent_id = %agent_id, error = %e, kind = e.kind(), "scheduled consolidation skipped");
                }
                Err(e) => {
                    error!(agent_id = %agent_id, error = %e, "scheduled consolidation panicked");
                }
            }
        }
        reports
    }

    /// Start the loop on the current tokio runtime. The first tick fires
    /// immediately.
    pub fn spawn(self) -> SchedulerHandle {
        let (tx, mut rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut ticks = 0u64;
            info!(
                agents = self.agents.len(),
                interval_ms = self.interval.as_millis() as u64,
                "consolidation scheduler started"
            );
            loop {
                tokio::select! {
                    _ = &mut rx => break,
                    _ = ticker.tick() => {
                        self.run_once().await;
                        ticks += 1;
                    }
                }
            }
            info!(ticks, "consolidation scheduler stopped");
            ticks
        });
        SchedulerHandle {
            shutdown: Some(tx),
            task,
        }
    }
}
