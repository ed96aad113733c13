//! # Tiffin Scheduler
//!
//! Recurring materialization of weekly schedules into dated delivery
//! records.
//!
//! One pass runs immediately on [`Scheduler::start`], then on a fixed
//! interval (hourly by default). Schedule edits are picked up on the next
//! tick, not immediately. Passes are idempotent: re-running for the same
//! date never produces duplicate records, so a tick is always safe to
//! repeat.
//!
//! [`Scheduler::stop`] cancels future ticks only; a pass already underway
//! runs to completion.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::{Local, Timelike};
use store::{DeliveryLedger, ScheduleStore, StoreError, model::DATE_FORMAT};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{error, info};

pub mod auto_mark;
pub mod holiday;
pub mod pass;
pub mod report;

pub use pass::{PassSummary, process_schedules};
pub use report::{StatusReport, status_report};

pub struct Scheduler<S> {
    store: Arc<S>,
    interval: Duration,
    inner: Mutex<Inner>,
}

struct Inner {
    running: bool,
    shutdown: Option<watch::Sender<bool>>,
    handle: Option<JoinHandle<()>>,
}

impl<S> Scheduler<S>
where
    S: ScheduleStore + DeliveryLedger + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, interval: Duration) -> Self {
        Self {
            store,
            interval,
            inner: Mutex::new(Inner {
                running: false,
                shutdown: None,
                handle: None,
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock().unwrap().running
    }

    /// Runs one pass immediately, then keeps ticking at the configured
    /// interval. No-op when already running.
    pub fn start(self: &Arc<Self>) {
        let mut inner = self.inner.lock().unwrap();
        if inner.running {
            return;
        }

        let (sender, receiver) = watch::channel(false);
        inner.running = true;
        inner.shutdown = Some(sender);
        inner.handle = Some(tokio::spawn(run_loop(Arc::clone(self), receiver)));

        info!("Tiffin scheduler started");
    }

    /// Cancels future ticks. An in-flight pass still completes. No-op when
    /// not running.
    pub fn stop(&self) {
        let mut inner = self.inner.lock().unwrap();
        if !inner.running {
            return;
        }

        inner.running = false;
        if let Some(shutdown) = inner.shutdown.take() {
            let _ = shutdown.send(true);
        }
        inner.handle.take();

        info!("Tiffin scheduler stopped");
    }

    /// One manual pass for today, outside the timer.
    pub async fn run_once(&self) -> Result<PassSummary, StoreError> {
        pass::process_schedules(self.store.as_ref(), Local::now().date_naive()).await
    }

    pub async fn status_report(&self) -> Result<StatusReport, StoreError> {
        let today = Local::now().date_naive().format(DATE_FORMAT).to_string();
        report::status_report(self.store.as_ref(), &today).await
    }

    pub async fn auto_mark(&self) -> Result<u64, StoreError> {
        let now = Local::now();
        let today = now.date_naive().format(DATE_FORMAT).to_string();
        auto_mark::auto_mark_delivered(self.store.as_ref(), &today, now.hour()).await
    }
}

async fn run_loop<S>(scheduler: Arc<Scheduler<S>>, mut shutdown: watch::Receiver<bool>)
where
    S: ScheduleStore + DeliveryLedger + Send + Sync + 'static,
{
    let mut ticker = time::interval(scheduler.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; consume it so the loop below
    // owns the "run now, then wait" rhythm.
    ticker.tick().await;

    loop {
        let today = Local::now().date_naive();
        match pass::process_schedules(scheduler.store.as_ref(), today).await {
            Ok(summary) => info!(
                "Processed {} schedules, created {} new deliveries",
                summary.processed, summary.created
            ),
            Err(err) => error!("Materialization pass aborted: {err}"),
        }

        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Local};
    use store::{
        DeliveryFilter, ScheduleStore,
        memory::MemoryStore,
        model::{DeliveryConfig, HolidayMode, WeekSchedule, WeeklySchedule},
    };

    use super::*;

    fn schedule_for_today(user_id: &str) -> WeeklySchedule {
        let mut weekly_schedule = WeekSchedule::default();
        let slot = weekly_schedule.day_mut(Local::now().date_naive().weekday());
        slot.enabled = true;
        slot.deliveries = vec![DeliveryConfig {
            vendor_id: "v1".to_string(),
            time: "12:00".to_string(),
            quantity: 1,
        }];

        WeeklySchedule {
            user_id: user_id.to_string(),
            user_name: user_id.to_string(),
            weekly_schedule,
            holiday_mode: HolidayMode::default(),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn start_runs_an_immediate_pass_and_stop_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        store.put_schedule(&schedule_for_today("u1")).await.unwrap();

        let scheduler = Arc::new(Scheduler::new(
            Arc::clone(&store),
            Duration::from_secs(3600),
        ));

        scheduler.start();
        scheduler.start();
        assert!(scheduler.is_running());

        // The boot pass runs on a spawned task; give it a beat.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let today = Local::now().date_naive().format(DATE_FORMAT).to_string();
        assert_eq!(
            store
                .count_deliveries(&DeliveryFilter::on(&today))
                .await
                .unwrap(),
            1
        );

        scheduler.stop();
        assert!(!scheduler.is_running());
        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[tokio::test]
    async fn run_once_is_idempotent_across_calls() {
        let store = Arc::new(MemoryStore::new());
        store.put_schedule(&schedule_for_today("u1")).await.unwrap();

        let scheduler = Arc::new(Scheduler::new(
            Arc::clone(&store),
            Duration::from_secs(3600),
        ));

        scheduler.run_once().await.unwrap();
        let second = scheduler.run_once().await.unwrap();

        assert_eq!(second.created, 0);
        let report = scheduler.status_report().await.unwrap();
        assert_eq!(report.today_scheduled, 1);
        assert_eq!(report.total_schedules, 1);
    }
}
