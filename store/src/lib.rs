//! # Tiffin Store
//!
//! Shared data model plus the two store ports the scheduler works against:
//! the schedule store (weekly intent, read-mostly) and the delivery ledger
//! (dated records, append-mostly).
//!
//! The ledger enforces uniqueness of the identity tuple
//! (user_id, delivery_date, vendor_id) itself, so a racing insert surfaces
//! as [`StoreError::Duplicate`] instead of a second record.

use async_trait::async_trait;
use thiserror::Error;

pub mod database;
pub mod memory;
pub mod model;

use model::{DeliveryRecord, WeeklySchedule};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(#[from] redis::RedisError),

    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Delivery already exists for {user_id} / {delivery_date} / {vendor_id}")]
    Duplicate {
        user_id: String,
        delivery_date: String,
        vendor_id: String,
    },

    #[error("Delivery not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Filter for ledger reads. Records are always partitioned by date first.
#[derive(Debug, Clone)]
pub struct DeliveryFilter {
    pub date: String,
    pub delivered: Option<bool>,
}

impl DeliveryFilter {
    pub fn on(date: &str) -> Self {
        Self {
            date: date.to_string(),
            delivered: None,
        }
    }

    pub fn delivered(mut self, delivered: bool) -> Self {
        self.delivered = Some(delivered);
        self
    }
}

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Full scan of every user's weekly schedule. No pagination; the
    /// schedule set is small by assumption.
    async fn list_schedules(&self) -> Result<Vec<WeeklySchedule>, StoreError>;

    async fn count_schedules(&self) -> Result<u64, StoreError>;

    /// Upsert, keyed by user_id. The editing API's write path; used here
    /// for seeding and tests.
    async fn put_schedule(&self, schedule: &WeeklySchedule) -> Result<(), StoreError>;
}

#[async_trait]
pub trait DeliveryLedger: Send + Sync {
    async fn find_delivery(
        &self,
        user_id: &str,
        date: &str,
        vendor_id: &str,
    ) -> Result<Option<DeliveryRecord>, StoreError>;

    /// Insert a new record. Fails with [`StoreError::Duplicate`] when the
    /// identity tuple already exists.
    async fn create_delivery(&self, record: &DeliveryRecord) -> Result<(), StoreError>;

    async fn list_deliveries(
        &self,
        filter: &DeliveryFilter,
    ) -> Result<Vec<DeliveryRecord>, StoreError>;

    async fn count_deliveries(&self, filter: &DeliveryFilter) -> Result<u64, StoreError>;

    /// Overwrite an existing record (fulfillment updates). Fails with
    /// [`StoreError::NotFound`] when the record was never materialized.
    async fn update_delivery(&self, record: &DeliveryRecord) -> Result<(), StoreError>;
}
