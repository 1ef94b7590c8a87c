use crate::core::calendar::Interval;
use crate::core::money::MonetaryAmount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RecurringPaymentDefinition {
    pub id: String,
    pub name: String,
    pub value: MonetaryAmount,
    pub description: Option<String>,
    pub interval: Interval,
    #[schema(value_type = String, example = "2024-06-01T00:00:00Z")]
    pub start_date: DateTime<Utc>,
    #[schema(value_type = Option<String>)]
    pub end_date: Option<DateTime<Utc>>,
    /// Most recent booked period; `None` until the first booking.
    #[schema(value_type = Option<String>)]
    pub last_booking: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>)]
    pub next_booking: Option<DateTime<Utc>>,
    pub category_id: String,
    pub household_id: String,
    pub user_id: String,
}

impl RecurringPaymentDefinition {
    /// Instant elapsed periods are counted from.
    pub fn baseline(&self) -> DateTime<Utc> {
        self.last_booking.unwrap_or(self.start_date)
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.end_date.is_some_and(|end| now > end)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NewRecurringPayment {
    pub name: String,
    pub value: MonetaryAmount,
    pub description: Option<String>,
    pub interval: Interval,
    #[schema(value_type = String, example = "2024-06-01T00:00:00Z")]
    pub start_date: DateTime<Utc>,
    #[schema(value_type = Option<String>)]
    pub end_date: Option<DateTime<Utc>>,
    pub category_id: String,
    pub household_id: String,
    pub user_id: String,
}
