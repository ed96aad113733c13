//! # Redis
//!
//! Backing store for schedules and the delivery ledger.
//!
//! ## Layout
//!
//! - Hash `schedules`: user_id -> JSON [`WeeklySchedule`]. Full scans via
//!   `HVALS`; documents that fail to parse are skipped, not fatal.
//! - String `delivery:{date}:{user_id}:{vendor_id}` -> JSON
//!   [`DeliveryRecord`]. Created with `SET ... NX`, so the key itself is
//!   the uniqueness constraint on the identity tuple.
//! - Set `deliveries:{date}`: record keys for one date, for listing and
//!   counting a day's ledger without scanning the keyspace.

use std::time::Duration;

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client, ExistenceCheck, SetOptions,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tracing::warn;

use crate::{
    DeliveryFilter, DeliveryLedger, ScheduleStore, StoreError,
    model::{DeliveryRecord, WeeklySchedule},
};

const SCHEDULES_KEY: &str = "schedules";

fn delivery_key(date: &str, user_id: &str, vendor_id: &str) -> String {
    format!("delivery:{date}:{user_id}:{vendor_id}")
}

fn date_index_key(date: &str) -> String {
    format!("deliveries:{date}")
}

pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Self {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(Duration::from_millis(100));

        let client = Client::open(redis_url).unwrap();
        let connection = client
            .get_connection_manager_with_config(config)
            .await
            .unwrap();

        Self { connection }
    }

    fn conn(&self) -> ConnectionManager {
        self.connection.clone()
    }
}

#[async_trait]
impl ScheduleStore for RedisStore {
    async fn list_schedules(&self) -> Result<Vec<WeeklySchedule>, StoreError> {
        let documents: Vec<String> = self.conn().hvals(SCHEDULES_KEY).await?;

        let mut schedules = Vec::with_capacity(documents.len());
        for document in documents {
            match serde_json::from_str(&document) {
                Ok(schedule) => schedules.push(schedule),
                Err(err) => warn!("Skipping malformed schedule document: {err}"),
            }
        }

        Ok(schedules)
    }

    async fn count_schedules(&self) -> Result<u64, StoreError> {
        Ok(self.conn().hlen(SCHEDULES_KEY).await?)
    }

    async fn put_schedule(&self, schedule: &WeeklySchedule) -> Result<(), StoreError> {
        let document = serde_json::to_string(schedule)?;
        let _: () = self
            .conn()
            .hset(SCHEDULES_KEY, &schedule.user_id, document)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl DeliveryLedger for RedisStore {
    async fn find_delivery(
        &self,
        user_id: &str,
        date: &str,
        vendor_id: &str,
    ) -> Result<Option<DeliveryRecord>, StoreError> {
        let document: Option<String> =
            self.conn().get(delivery_key(date, user_id, vendor_id)).await?;

        match document {
            Some(document) => Ok(Some(serde_json::from_str(&document)?)),
            None => Ok(None),
        }
    }

    async fn create_delivery(&self, record: &DeliveryRecord) -> Result<(), StoreError> {
        let key = delivery_key(&record.delivery_date, &record.user_id, &record.vendor_id);
        let document = serde_json::to_string(record)?;

        let options = SetOptions::default().conditional_set(ExistenceCheck::NX);
        let created: Option<String> = self.conn().set_options(&key, document, options).await?;
        if created.is_none() {
            return Err(StoreError::Duplicate {
                user_id: record.user_id.clone(),
                delivery_date: record.delivery_date.clone(),
                vendor_id: record.vendor_id.clone(),
            });
        }

        let _: () = self
            .conn()
            .sadd(date_index_key(&record.delivery_date), &key)
            .await?;

        Ok(())
    }

    async fn list_deliveries(
        &self,
        filter: &DeliveryFilter,
    ) -> Result<Vec<DeliveryRecord>, StoreError> {
        let keys: Vec<String> = self.conn().smembers(date_index_key(&filter.date)).await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let documents: Vec<Option<String>> = self.conn().mget(&keys).await?;

        let mut records = Vec::new();
        for document in documents.into_iter().flatten() {
            let record: DeliveryRecord = serde_json::from_str(&document)?;
            if filter.delivered.is_none_or(|wanted| record.delivered == wanted) {
                records.push(record);
            }
        }

        Ok(records)
    }

    async fn count_deliveries(&self, filter: &DeliveryFilter) -> Result<u64, StoreError> {
        match filter.delivered {
            None => Ok(self.conn().scard(date_index_key(&filter.date)).await?),
            Some(_) => Ok(self.list_deliveries(filter).await?.len() as u64),
        }
    }

    async fn update_delivery(&self, record: &DeliveryRecord) -> Result<(), StoreError> {
        let key = delivery_key(&record.delivery_date, &record.user_id, &record.vendor_id);
        let document = serde_json::to_string(record)?;

        let options = SetOptions::default().conditional_set(ExistenceCheck::XX);
        let updated: Option<String> = self.conn().set_options(&key, document, options).await?;

        if updated.is_none() {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
