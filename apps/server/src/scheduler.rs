//! Background scheduler for the daily series update.
//!
//! Fires once a day at the configured Argentina local time (16:10 by
//! default, after the local market close) and runs the update orchestrator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use cotizaciones_core::update::UPDATE_JOB_ID;
use cotizaciones_core::DailySchedule;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::main_lib::AppState;

/// Snapshot of the scheduler served by `GET /api/scheduler/status`.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatus {
    pub running: bool,
    pub next_run: Option<String>,
    pub current_time: String,
    pub timezone: String,
    pub cron: String,
    pub job_id: &'static str,
    pub job_name: String,
}

/// Shared view of the daily trigger, owned by [`AppState`].
pub struct SchedulerHandle {
    schedule: DailySchedule,
    running: AtomicBool,
    next_run: RwLock<Option<DateTime<Tz>>>,
    shutdown: watch::Sender<bool>,
}

impl SchedulerHandle {
    pub fn new(schedule: DailySchedule) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            schedule,
            running: AtomicBool::new(false),
            next_run: RwLock::new(None),
            shutdown,
        }
    }

    pub fn schedule(&self) -> &DailySchedule {
        &self.schedule
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn next_run(&self) -> Option<DateTime<Tz>> {
        self.next_run.read().ok().and_then(|guard| *guard)
    }

    fn set_next_run(&self, next: Option<DateTime<Tz>>) {
        if let Ok(mut guard) = self.next_run.write() {
            *guard = next;
        }
    }

    /// Asks the background task to exit. A run already in progress completes.
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn status(&self) -> SchedulerStatus {
        self.status_at(&Utc::now())
    }

    pub fn status_at<T: TimeZone>(&self, now: &DateTime<T>) -> SchedulerStatus {
        let tz = self.schedule.timezone();
        SchedulerStatus {
            running: self.is_running(),
            next_run: self.next_run().map(|next| next.to_rfc3339()),
            current_time: now.with_timezone(&tz).to_rfc3339(),
            timezone: tz.name().to_string(),
            cron: self.schedule.cron_expression(),
            job_id: UPDATE_JOB_ID,
            job_name: self.schedule.job_name(),
        }
    }
}

/// Starts the daily update loop on the tokio runtime.
pub fn start_daily_update_scheduler(state: Arc<AppState>) -> JoinHandle<()> {
    let handle = state.scheduler.clone();
    let mut shutdown = handle.shutdown.subscribe();
    handle.running.store(true, Ordering::SeqCst);

    tokio::spawn(async move {
        info!(
            "Daily update scheduler started ({}, cron '{}')",
            handle.schedule().job_name(),
            handle.schedule().cron_expression()
        );

        let mut last_fire: Option<DateTime<Utc>> = None;
        loop {
            if *shutdown.borrow() {
                break;
            }

            // Never fire twice for the same slot if the wall clock lags the timer.
            let now = match last_fire {
                Some(fired) => Utc::now().max(fired),
                None => Utc::now(),
            };
            let next = handle.schedule().next_fire_after(&now);
            handle.set_next_run(Some(next));
            let fire_at = next.with_timezone(&Utc);
            let wait = (fire_at - now).to_std().unwrap_or_default();
            debug!("Next daily update at {} (in {:?})", next, wait);

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown.changed() => break,
            }

            last_fire = Some(fire_at);
            run_scheduled_update(&state).await;
        }

        handle.running.store(false, Ordering::SeqCst);
        handle.set_next_run(None);
        info!("Daily update scheduler stopped");
    })
}

/// Runs one scheduled update and logs the outcome per quote type.
async fn run_scheduled_update(state: &Arc<AppState>) {
    info!("Running scheduled daily update...");
    let report = state.orchestrator.run().await;

    for (quote_type, outcome) in &report.per_type {
        if let Some(error) = &outcome.error {
            warn!("Scheduled update of {} on {} failed: {}", quote_type, report.date, error);
        }
    }
    info!(
        "Scheduled daily update for {} finished: {}/{} series updated",
        report.date,
        report.succeeded(),
        report.per_type.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Argentina::Buenos_Aires;

    #[test]
    fn test_status_of_idle_scheduler() {
        let handle = SchedulerHandle::new(DailySchedule::default());
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let status = handle.status_at(&now);

        assert!(!status.running);
        assert_eq!(status.next_run, None);
        assert_eq!(status.current_time, "2026-10-18T09:00:00-03:00");
        assert_eq!(status.timezone, "America/Argentina/Buenos_Aires");
        assert_eq!(status.cron, "10 16 * * *");
        assert_eq!(status.job_id, "update_daily");
    }

    #[test]
    fn test_status_reports_next_run() {
        let handle = SchedulerHandle::new(DailySchedule::default());
        let next = Buenos_Aires.with_ymd_and_hms(2026, 10, 18, 16, 10, 0).unwrap();
        handle.set_next_run(Some(next));

        let status = handle.status();
        assert_eq!(status.next_run.as_deref(), Some("2026-10-18T16:10:00-03:00"));
    }
}
