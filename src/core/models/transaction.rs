use crate::core::money::MonetaryAmount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    TopUp,
    Buy,
    TakeOut,
}

impl TransactionKind {
    /// Top-ups add to the pool; buys and take-outs consume from it.
    pub fn signed(self, magnitude: MonetaryAmount) -> MonetaryAmount {
        match self {
            TransactionKind::TopUp => magnitude,
            TransactionKind::Buy | TransactionKind::TakeOut => -magnitude,
        }
    }

    pub fn splits_cost(self) -> bool {
        !matches!(self, TransactionKind::TopUp)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct GroupTransaction {
    pub id: String,
    pub group_id: String,
    pub name: String,
    /// Signed: positive adds to the pool, negative consumes from it.
    pub amount: MonetaryAmount,
    pub kind: TransactionKind,
    pub user_id: String,
    /// Members sharing a buy/take-out, in split order. Empty for top-ups.
    pub participants: Vec<String>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NewGroupTransaction {
    pub name: String,
    /// Unsigned magnitude; the sign follows from `kind`.
    pub amount: MonetaryAmount,
    pub kind: TransactionKind,
    pub user_id: String,
    #[serde(default)]
    pub participants: Vec<String>,
}
