mod calendar_tests;
mod group_tests;

use crate::core::calendar::Interval;
use crate::core::models::recurring_payment::{NewRecurringPayment, RecurringPaymentDefinition};
use crate::core::money::MonetaryAmount;
use crate::core::scheduler::SchedulerSettings;
use crate::core::services::{CronSecret, LedgerService};
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStore;
use chrono::{DateTime, TimeZone, Utc};

pub const TEST_SECRET: &str = "test-cron-secret";

pub type TestService = LedgerService<InMemoryLogging, InMemoryStore>;

pub fn create_test_service() -> TestService {
    create_test_env(SchedulerSettings::default()).0
}

/// Service plus a handle on the same in-memory store, for seeding state the
/// service API cannot produce directly.
pub fn create_test_env(settings: SchedulerSettings) -> (TestService, InMemoryStore) {
    let storage = InMemoryStore::new();
    let logging = InMemoryLogging::new();
    let service = LedgerService::new(storage.clone(), logging, settings, CronSecret::new(TEST_SECRET));
    (service, storage)
}

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

pub fn cents(minor: i64) -> MonetaryAmount {
    MonetaryAmount::from_minor(minor)
}

pub fn new_rent(interval: Interval, start_date: DateTime<Utc>) -> NewRecurringPayment {
    NewRecurringPayment {
        name: "Rent".to_string(),
        value: cents(95_000),
        description: Some("Flat share".to_string()),
        interval,
        start_date,
        end_date: None,
        category_id: "housing".to_string(),
        household_id: "household-1".to_string(),
        user_id: "alice".to_string(),
    }
}

pub fn definition(
    id: &str,
    interval: Interval,
    start_date: DateTime<Utc>,
    last_booking: Option<DateTime<Utc>>,
) -> RecurringPaymentDefinition {
    RecurringPaymentDefinition {
        id: id.to_string(),
        name: format!("Definition {}", id),
        value: cents(1_250),
        description: None,
        interval,
        start_date,
        end_date: None,
        last_booking,
        next_booking: None,
        category_id: "utilities".to_string(),
        household_id: "household-1".to_string(),
        user_id: "alice".to_string(),
    }
}
