//! In-memory implementation of both store ports, with the same duplicate
//! and not-found semantics as the Redis store. Used by the engine tests and
//! as a stand-in when no Redis is around.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;

use crate::{
    DeliveryFilter, DeliveryLedger, ScheduleStore, StoreError,
    model::{DeliveryRecord, WeeklySchedule},
};

fn record_key(date: &str, user_id: &str, vendor_id: &str) -> String {
    format!("{date}:{user_id}:{vendor_id}")
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    schedules: HashMap<String, WeeklySchedule>,
    deliveries: BTreeMap<String, DeliveryRecord>,
    failing_users: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `create_delivery` for this user fail, to exercise the
    /// engine's per-schedule error isolation.
    pub fn fail_creates_for(&self, user_id: &str) {
        self.lock().failing_users.insert(user_id.to_string());
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn list_schedules(&self) -> Result<Vec<WeeklySchedule>, StoreError> {
        Ok(self.lock().schedules.values().cloned().collect())
    }

    async fn count_schedules(&self) -> Result<u64, StoreError> {
        Ok(self.lock().schedules.len() as u64)
    }

    async fn put_schedule(&self, schedule: &WeeklySchedule) -> Result<(), StoreError> {
        self.lock()
            .schedules
            .insert(schedule.user_id.clone(), schedule.clone());

        Ok(())
    }
}

#[async_trait]
impl DeliveryLedger for MemoryStore {
    async fn find_delivery(
        &self,
        user_id: &str,
        date: &str,
        vendor_id: &str,
    ) -> Result<Option<DeliveryRecord>, StoreError> {
        Ok(self
            .lock()
            .deliveries
            .get(&record_key(date, user_id, vendor_id))
            .cloned())
    }

    async fn create_delivery(&self, record: &DeliveryRecord) -> Result<(), StoreError> {
        let mut inner = self.lock();

        if inner.failing_users.contains(&record.user_id) {
            return Err(StoreError::Internal(format!(
                "injected create failure for {}",
                record.user_id
            )));
        }

        let key = record_key(&record.delivery_date, &record.user_id, &record.vendor_id);
        if inner.deliveries.contains_key(&key) {
            return Err(StoreError::Duplicate {
                user_id: record.user_id.clone(),
                delivery_date: record.delivery_date.clone(),
                vendor_id: record.vendor_id.clone(),
            });
        }

        inner.deliveries.insert(key, record.clone());
        Ok(())
    }

    async fn list_deliveries(
        &self,
        filter: &DeliveryFilter,
    ) -> Result<Vec<DeliveryRecord>, StoreError> {
        Ok(self
            .lock()
            .deliveries
            .values()
            .filter(|record| record.delivery_date == filter.date)
            .filter(|record| {
                filter
                    .delivered
                    .is_none_or(|wanted| record.delivered == wanted)
            })
            .cloned()
            .collect())
    }

    async fn count_deliveries(&self, filter: &DeliveryFilter) -> Result<u64, StoreError> {
        Ok(self.list_deliveries(filter).await?.len() as u64)
    }

    async fn update_delivery(&self, record: &DeliveryRecord) -> Result<(), StoreError> {
        let mut inner = self.lock();

        let key = record_key(&record.delivery_date, &record.user_id, &record.vendor_id);
        if !inner.deliveries.contains_key(&key) {
            return Err(StoreError::NotFound);
        }

        inner.deliveries.insert(key, record.clone());
        Ok(())
    }
}
