//! Periodic refresh scheduling
//!
//! Runs [`Coordinator::refresh`] once at startup (optional) and then on a
//! cron schedule evaluated in server-local time. A failed refresh is logged
//! and leaves the stored snapshot untouched; the next tick tries again.

use crate::config::ScheduleConfig;
use crate::crawler::coordinator::Coordinator;
use crate::ScoutError;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};

/// Owns the cron job that keeps the snapshot fresh
pub struct Scheduler {
    coordinator: Arc<Coordinator>,
    config: ScheduleConfig,
    inner: Option<JobScheduler>,
}

impl Scheduler {
    pub fn new(coordinator: Arc<Coordinator>, config: ScheduleConfig) -> Self {
        Self {
            coordinator,
            config,
            inner: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.is_some()
    }

    /// Registers the cron job and kicks off the startup refresh
    ///
    /// The startup refresh runs in the background so callers can begin
    /// serving immediately.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(handle))` - Startup refresh spawned; the handle yields whether it succeeded
    /// * `Ok(None)` - Started without a startup refresh, or already running
    /// * `Err(ScoutError)` - Invalid cron expression or scheduler failure
    pub async fn start(&mut self) -> Result<Option<JoinHandle<bool>>, ScoutError> {
        if self.inner.is_some() {
            tracing::warn!("Scheduler already running");
            return Ok(None);
        }

        let scheduler = JobScheduler::new().await?;

        let job_coordinator = self.coordinator.clone();
        let job = Job::new_async_tz(
            self.config.cron.as_str(),
            chrono::Local,
            move |_uuid, _lock| {
                let coordinator = job_coordinator.clone();
                Box::pin(async move {
                    run_refresh(&coordinator, "scheduled").await;
                })
            },
        )?;

        scheduler.add(job).await?;
        scheduler.start().await?;
        self.inner = Some(scheduler);

        tracing::info!("Refresh scheduled with cron \"{}\" (local time)", self.config.cron);

        if !self.config.run_on_start {
            return Ok(None);
        }

        let coordinator = self.coordinator.clone();
        Ok(Some(tokio::spawn(async move {
            run_refresh(&coordinator, "startup").await
        })))
    }

    /// Stops the cron job; a no-op when not running
    pub async fn shutdown(&mut self) -> Result<(), ScoutError> {
        if let Some(mut scheduler) = self.inner.take() {
            scheduler.shutdown().await?;
            tracing::info!("Scheduler stopped");
        }
        Ok(())
    }
}

/// Runs one refresh and logs the outcome
///
/// # Returns
///
/// `true` when the refresh succeeded
pub async fn run_refresh(coordinator: &Coordinator, trigger: &str) -> bool {
    tracing::info!("Running {} refresh of {}", trigger, coordinator.source_url());

    match coordinator.refresh().await {
        Ok(snapshot) => {
            match snapshot.current() {
                Some(record) => tracing::info!(
                    "{} refresh complete: {} record(s), current {}",
                    trigger,
                    snapshot.len(),
                    record.url
                ),
                None => tracing::warn!("{} refresh found no access points", trigger),
            }
            true
        }
        Err(e) => {
            tracing::error!("{} refresh failed: {}", trigger, e);
            false
        }
    }
}
