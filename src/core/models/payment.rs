use crate::core::money::MonetaryAmount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A booked payment. Immutable once written.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Payment {
    pub id: String,
    pub name: String,
    pub value: MonetaryAmount,
    pub description: Option<String>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
    pub category_id: String,
    pub household_id: String,
    pub user_id: String,
    /// Definition that produced this payment; `None` for manual entries.
    pub recurring_payment_id: Option<String>,
}
