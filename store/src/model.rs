use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A user's recurring per-weekday delivery intent. Written by the external
/// schedule-editing API; the scheduler only ever reads these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub weekly_schedule: WeekSchedule,
    #[serde(default)]
    pub holiday_mode: HolidayMode,
}

/// One slot per weekday. Days absent from the stored document deserialize
/// as disabled with no deliveries, so readers never check for presence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekSchedule {
    #[serde(default)]
    pub monday: DaySlot,
    #[serde(default)]
    pub tuesday: DaySlot,
    #[serde(default)]
    pub wednesday: DaySlot,
    #[serde(default)]
    pub thursday: DaySlot,
    #[serde(default)]
    pub friday: DaySlot,
    #[serde(default)]
    pub saturday: DaySlot,
    #[serde(default)]
    pub sunday: DaySlot,
}

impl WeekSchedule {
    pub fn day(&self, day: Weekday) -> &DaySlot {
        match day {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    pub fn day_mut(&mut self, day: Weekday) -> &mut DaySlot {
        match day {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaySlot {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub deliveries: Vec<DeliveryConfig>,
}

/// One vendor+time+quantity entry inside a day. `time` is carried verbatim
/// onto records; the editing API owns its validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    pub vendor_id: String,
    #[serde(default = "default_time")]
    pub time: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_time() -> String {
    "12:00".to_string()
}

fn default_quantity() -> u32 {
    1
}

/// Date-range override suppressing all materialization for a user. Dates
/// are `YYYY-MM-DD` strings, inclusive on both ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayMode {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default = "default_reason")]
    pub reason: String,
}

impl Default for HolidayMode {
    fn default() -> Self {
        Self {
            enabled: false,
            start_date: None,
            end_date: None,
            reason: default_reason(),
        }
    }
}

fn default_reason() -> String {
    "Holiday".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    #[default]
    Pending,
    Delivered,
    Cancelled,
    Holiday,
}

/// A materialized, dated delivery obligation. Created exactly once by the
/// scheduler for the identity tuple (user_id, delivery_date, vendor_id);
/// only the fulfillment fields change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub user_id: String,
    pub user_name: String,
    pub vendor_id: String,
    pub delivery_date: String,
    pub scheduled_time: String,
    pub quantity: u32,
    #[serde(default)]
    pub delivered: bool,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: DeliveryStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_schedule_normalizes_to_disabled_days() {
        let schedule: WeeklySchedule =
            serde_json::from_str(r#"{ "user_id": "u1", "user_name": "Asha" }"#).unwrap();

        assert!(!schedule.holiday_mode.enabled);
        assert_eq!(schedule.holiday_mode.reason, "Holiday");

        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            let slot = schedule.weekly_schedule.day(day);
            assert!(!slot.enabled);
            assert!(slot.deliveries.is_empty());
        }
    }

    #[test]
    fn partial_week_fills_missing_days() {
        let schedule: WeeklySchedule = serde_json::from_str(
            r#"{
                "user_id": "u1",
                "user_name": "Asha",
                "weekly_schedule": {
                    "monday": { "enabled": true, "deliveries": [{ "vendor_id": "v1" }] }
                }
            }"#,
        )
        .unwrap();

        let monday = schedule.weekly_schedule.day(Weekday::Mon);
        assert!(monday.enabled);
        assert_eq!(monday.deliveries.len(), 1);
        assert_eq!(monday.deliveries[0].time, "12:00");
        assert_eq!(monday.deliveries[0].quantity, 1);

        assert!(!schedule.weekly_schedule.day(Weekday::Tue).enabled);
        assert!(!schedule.weekly_schedule.day(Weekday::Sun).enabled);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DeliveryStatus::Pending).unwrap(),
            r#""pending""#
        );
        assert_eq!(
            serde_json::from_str::<DeliveryStatus>(r#""holiday""#).unwrap(),
            DeliveryStatus::Holiday
        );
        assert!(serde_json::from_str::<DeliveryStatus>(r#""lost""#).is_err());
    }
}
