pub mod in_memory;

use crate::core::errors::LedgerError;
use crate::core::models::{
    group::Group, payment::Payment, recurring_payment::RecurringPaymentDefinition,
    transaction::GroupTransaction,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// One booking, applied all-or-nothing by [`LedgerStore::commit_booking`].
#[derive(Clone, Debug)]
pub struct BookingWrite {
    pub definition_id: String,
    /// `last_booking` the decision was made against; the write is rejected
    /// if the stored value differs.
    pub expected_last_booking: Option<DateTime<Utc>>,
    pub last_booking: DateTime<Utc>,
    pub next_booking: DateTime<Utc>,
    pub payment: Payment,
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn save_recurring_payment(&self, definition: RecurringPaymentDefinition) -> Result<(), LedgerError>;
    async fn get_recurring_payment(&self, id: &str) -> Result<Option<RecurringPaymentDefinition>, LedgerError>;
    async fn list_recurring_payments(&self) -> Result<Vec<RecurringPaymentDefinition>, LedgerError>;

    /// Compare-and-swap on the definition's `last_booking` plus payment
    /// insert, in one atomic step. Fails with `PersistenceConflict` when the
    /// definition moved since it was read.
    async fn commit_booking(&self, write: BookingWrite) -> Result<Payment, LedgerError>;
    async fn list_payments_for_definition(&self, definition_id: &str) -> Result<Vec<Payment>, LedgerError>;

    async fn save_group(&self, group: Group) -> Result<(), LedgerError>;
    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, LedgerError>;

    /// Appends to the group's ledger and moves `Group.value` by the signed
    /// amount atomically. Returns the updated group.
    async fn append_group_transaction(&self, transaction: GroupTransaction) -> Result<Group, LedgerError>;
    /// The group's ledger in append order.
    async fn list_group_transactions(&self, group_id: &str) -> Result<Vec<GroupTransaction>, LedgerError>;
}
