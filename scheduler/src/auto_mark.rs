//! Simulation helper: treat anything an hour past its scheduled slot as
//! delivered. Not part of the timer loop; triggered by the host on demand.

use chrono::Utc;
use store::{DeliveryFilter, DeliveryLedger, StoreError, model::DeliveryStatus};
use tracing::{info, warn};

/// Marks today's pending deliveries whose scheduled hour is at least one
/// hour behind `current_hour`. Returns how many records were updated.
pub async fn auto_mark_delivered<S>(
    store: &S,
    today: &str,
    current_hour: u32,
) -> Result<u64, StoreError>
where
    S: DeliveryLedger,
{
    let pending = store
        .list_deliveries(&DeliveryFilter::on(today).delivered(false))
        .await?;

    let mut marked = 0;
    for mut record in pending {
        let Some(hour) = scheduled_hour(&record.scheduled_time) else {
            warn!(
                "Unparseable scheduled time {:?} for {}",
                record.scheduled_time, record.user_name
            );
            continue;
        };

        if current_hour >= hour + 1 {
            record.delivered = true;
            record.delivered_at = Some(Utc::now());
            record.status = DeliveryStatus::Delivered;
            store.update_delivery(&record).await?;

            marked += 1;
            info!("Auto-marked delivery for {} as delivered", record.user_name);
        }
    }

    if marked > 0 {
        info!("Auto-marked {marked} deliveries as delivered");
    }

    Ok(marked)
}

fn scheduled_hour(time: &str) -> Option<u32> {
    time.split(':').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use store::{memory::MemoryStore, model::DeliveryRecord};

    use super::*;

    const TODAY: &str = "2025-06-02";

    fn record(vendor_id: &str, scheduled_time: &str) -> DeliveryRecord {
        DeliveryRecord {
            user_id: "u1".to_string(),
            user_name: "Asha".to_string(),
            vendor_id: vendor_id.to_string(),
            delivery_date: TODAY.to_string(),
            scheduled_time: scheduled_time.to_string(),
            quantity: 1,
            delivered: false,
            delivered_at: None,
            status: DeliveryStatus::Pending,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn marks_only_past_due_slots() {
        let store = MemoryStore::new();
        store.create_delivery(&record("v1", "08:00")).await.unwrap();
        store.create_delivery(&record("v2", "20:00")).await.unwrap();

        let marked = auto_mark_delivered(&store, TODAY, 10).await.unwrap();
        assert_eq!(marked, 1);

        let morning = store
            .find_delivery("u1", TODAY, "v1")
            .await
            .unwrap()
            .unwrap();
        assert!(morning.delivered);
        assert_eq!(morning.status, DeliveryStatus::Delivered);
        assert!(morning.delivered_at.is_some());

        let evening = store
            .find_delivery("u1", TODAY, "v2")
            .await
            .unwrap()
            .unwrap();
        assert!(!evening.delivered);
    }

    #[tokio::test]
    async fn slot_needs_a_full_hour_to_count() {
        let store = MemoryStore::new();
        store.create_delivery(&record("v1", "10:30")).await.unwrap();

        assert_eq!(auto_mark_delivered(&store, TODAY, 10).await.unwrap(), 0);
        assert_eq!(auto_mark_delivered(&store, TODAY, 11).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unparseable_time_is_skipped() {
        let store = MemoryStore::new();
        store.create_delivery(&record("v1", "noonish")).await.unwrap();

        assert_eq!(auto_mark_delivered(&store, TODAY, 23).await.unwrap(), 0);
        let untouched = store
            .find_delivery("u1", TODAY, "v1")
            .await
            .unwrap()
            .unwrap();
        assert!(!untouched.delivered);
    }
}
