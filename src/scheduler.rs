use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{Duration, interval};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::config::SchedulerConfig;
use crate::sync::{SyncOutcome, SyncService};

/// Fires the catalog sync on a fixed wall-clock interval (or a cron
/// expression when configured). The sync service's own guard keeps runs
/// from overlapping; the scheduler just skips the tick and says so.
pub struct Scheduler {
    sync: SyncService,
    config: SchedulerConfig,
    running: Arc<RwLock<bool>>,
}

impl Scheduler {
    #[must_use]
    pub fn new(sync: SyncService, config: SchedulerConfig) -> Self {
        Self {
            sync,
            config,
            running: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn start(&self) -> Result<()> {
        if !self.config.enabled {
            info!("Scheduler is disabled in config");
            return Ok(());
        }

        *self.running.write().await = true;
        info!("Starting catalog sync scheduler");

        if let Some(cron_expr) = &self.config.cron_expression {
            self.run_with_cron(cron_expr).await
        } else {
            self.run_with_interval().await
        }
    }

    async fn run_with_cron(&self, cron_expr: &str) -> Result<()> {
        let mut sched = JobScheduler::new().await?;

        let sync = self.sync.clone();
        let running = Arc::clone(&self.running);

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let sync = sync.clone();
            let running = Arc::clone(&running);
            Box::pin(async move {
                if !*running.read().await {
                    return;
                }
                run_sync_tick(&sync).await;
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Scheduler running with cron: {}", cron_expr);

        loop {
            if !*self.running.read().await {
                break;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        sched.shutdown().await?;
        Ok(())
    }

    async fn run_with_interval(&self) -> Result<()> {
        let interval_hours = self.config.sync_interval_hours;

        info!("Scheduler running every {} hours", interval_hours);

        // First tick fires immediately, so a fresh deployment fills the
        // catalog without waiting a full interval.
        let mut sync_interval = interval(Duration::from_secs(u64::from(interval_hours) * 3600));

        loop {
            sync_interval.tick().await;
            if !*self.running.read().await {
                break;
            }
            run_sync_tick(&self.sync).await;
        }

        Ok(())
    }

    pub async fn stop(&self) {
        info!("Stopping scheduler...");
        *self.running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// Manual trigger outside the schedule.
    pub async fn run_once(&self) -> Result<()> {
        info!("Running manual catalog sync...");
        run_sync_tick(&self.sync).await;
        Ok(())
    }
}

async fn run_sync_tick(sync: &SyncService) {
    match sync.try_run().await {
        Some(report) => match report.outcome {
            SyncOutcome::Completed => info!(
                "Scheduled sync finished: {} records written over {} pages",
                report.written, report.pages_fetched
            ),
            SyncOutcome::Aborted => error!(
                "Scheduled sync aborted after {} pages: {}",
                report.pages_fetched, report.message
            ),
        },
        None => warn!("Skipping scheduled sync, a run is already in flight"),
    }
}
