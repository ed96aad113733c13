use serde::Serialize;
use store::{DeliveryFilter, DeliveryLedger, ScheduleStore, StoreError};

/// Point-in-time snapshot over the schedule store and today's ledger.
/// Recomputed from the store on every call; nothing is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub total_schedules: u64,
    pub today_scheduled: u64,
    pub today_delivered: u64,
    pub success_rate: u64,
}

pub async fn status_report<S>(store: &S, today: &str) -> Result<StatusReport, StoreError>
where
    S: ScheduleStore + DeliveryLedger,
{
    let total_schedules = store.count_schedules().await?;
    let today_scheduled = store.count_deliveries(&DeliveryFilter::on(today)).await?;
    let today_delivered = store
        .count_deliveries(&DeliveryFilter::on(today).delivered(true))
        .await?;

    let success_rate = if today_scheduled > 0 {
        (today_delivered as f64 / today_scheduled as f64 * 100.0).round() as u64
    } else {
        0
    };

    Ok(StatusReport {
        total_schedules,
        today_scheduled,
        today_delivered,
        success_rate,
    })
}
