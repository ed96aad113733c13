//! One materialization pass: expand every user's weekly intent into dated
//! delivery records for today.

use chrono::{Datelike, NaiveDate, Utc, Weekday};
use store::{
    DeliveryLedger, ScheduleStore, StoreError,
    model::{DATE_FORMAT, DeliveryRecord, DeliveryStatus, WeeklySchedule},
};
use tracing::{error, info};

use crate::holiday::is_suppressed;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub processed: u64,
    pub created: u64,
}

/// Walks every schedule and inserts at most one record per
/// (user, today, vendor). Safe to re-run for the same date: existing
/// records are skipped, and a racing insert losing `SET NX` is treated the
/// same as an existing record.
///
/// Failure to fetch the schedule set aborts the pass; any error inside one
/// schedule is logged and the remaining schedules still run.
pub async fn process_schedules<S>(store: &S, today: NaiveDate) -> Result<PassSummary, StoreError>
where
    S: ScheduleStore + DeliveryLedger,
{
    info!("Processing tiffin schedules...");

    let today_str = today.format(DATE_FORMAT).to_string();
    let weekday = today.weekday();

    let schedules = store.list_schedules().await?;

    let mut summary = PassSummary::default();
    for schedule in &schedules {
        match materialize_user(store, schedule, &today_str, weekday).await {
            Ok(created) => summary.created += created,
            Err(err) => error!("Error processing schedule for {}: {err}", schedule.user_id),
        }

        summary.processed += 1;
    }

    Ok(summary)
}

async fn materialize_user<S>(
    store: &S,
    schedule: &WeeklySchedule,
    today: &str,
    weekday: Weekday,
) -> Result<u64, StoreError>
where
    S: DeliveryLedger,
{
    if is_suppressed(&schedule.holiday_mode, today) {
        info!("Skipping {} - holiday mode active", schedule.user_name);
        return Ok(0);
    }

    let day = schedule.weekly_schedule.day(weekday);
    if !day.enabled || day.deliveries.is_empty() {
        return Ok(0);
    }

    let mut created = 0;
    for config in &day.deliveries {
        // Dedup key is (user, date, vendor): a second slot for the same
        // vendor on the same day collapses into the first record.
        if store
            .find_delivery(&schedule.user_id, today, &config.vendor_id)
            .await?
            .is_some()
        {
            continue;
        }

        let record = DeliveryRecord {
            user_id: schedule.user_id.clone(),
            user_name: schedule.user_name.clone(),
            vendor_id: config.vendor_id.clone(),
            delivery_date: today.to_string(),
            scheduled_time: config.time.clone(),
            quantity: config.quantity,
            delivered: false,
            delivered_at: None,
            status: DeliveryStatus::Pending,
            notes: None,
            created_at: Utc::now(),
        };

        match store.create_delivery(&record).await {
            Ok(()) => {
                created += 1;
                info!(
                    "Scheduled tiffin for {} from vendor {} at {}",
                    schedule.user_name, config.vendor_id, config.time
                );
            }
            // Another writer got there first; the record exists, which is
            // all this pass guarantees.
            Err(StoreError::Duplicate { .. }) => {}
            Err(err) => return Err(err),
        }
    }

    Ok(created)
}
