//! Smoke tool: seeds two demo schedules into Redis (one active today, one
//! in holiday mode), runs a single materialization pass, and prints the
//! summary plus the status report.

use std::env;

use chrono::{Datelike, Duration, Local};
use store::{
    ScheduleStore,
    database::RedisStore,
    model::{DATE_FORMAT, DeliveryConfig, HolidayMode, WeekSchedule, WeeklySchedule},
};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let redis_url =
        env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let store = RedisStore::connect(&redis_url).await;

    let today = Local::now().date_naive();
    let today_str = today.format(DATE_FORMAT).to_string();

    let mut active_week = WeekSchedule::default();
    let slot = active_week.day_mut(today.weekday());
    slot.enabled = true;
    slot.deliveries = vec![DeliveryConfig {
        vendor_id: "demo-vendor".to_string(),
        time: "12:00".to_string(),
        quantity: 2,
    }];

    store
        .put_schedule(&WeeklySchedule {
            user_id: "demo-active".to_string(),
            user_name: "Demo Active".to_string(),
            weekly_schedule: active_week,
            holiday_mode: HolidayMode::default(),
        })
        .await
        .unwrap();

    let mut holiday_week = WeekSchedule::default();
    let slot = holiday_week.day_mut(today.weekday());
    slot.enabled = true;
    slot.deliveries = vec![DeliveryConfig {
        vendor_id: "demo-vendor".to_string(),
        time: "13:00".to_string(),
        quantity: 1,
    }];

    store
        .put_schedule(&WeeklySchedule {
            user_id: "demo-holiday".to_string(),
            user_name: "Demo Holiday".to_string(),
            weekly_schedule: holiday_week,
            holiday_mode: HolidayMode {
                enabled: true,
                start_date: Some(today_str.clone()),
                end_date: Some((today + Duration::days(3)).format(DATE_FORMAT).to_string()),
                ..HolidayMode::default()
            },
        })
        .await
        .unwrap();

    let summary = scheduler::process_schedules(&store, today).await.unwrap();

    println!("Processed schedules: {}", summary.processed);
    println!("Created deliveries: {}", summary.created);

    let report = scheduler::status_report(&store, &today_str).await.unwrap();
    println!("{report:?}");
}
