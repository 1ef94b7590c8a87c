use crate::core::errors::LedgerError;
use crate::core::models::{
    group::Group, payment::Payment, recurring_payment::RecurringPaymentDefinition,
    transaction::GroupTransaction,
};
use crate::infrastructure::storage::{BookingWrite, LedgerStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Lock order whenever more than one map is held: definitions before
/// payments, groups before transactions.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    recurring_payments: Arc<RwLock<HashMap<String, RecurringPaymentDefinition>>>,
    payments: Arc<RwLock<Vec<Payment>>>,
    groups: Arc<RwLock<HashMap<String, Group>>>,
    transactions: Arc<RwLock<HashMap<String, Vec<GroupTransaction>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    async fn save_recurring_payment(&self, definition: RecurringPaymentDefinition) -> Result<(), LedgerError> {
        let mut recurring_payments = self.recurring_payments.write().await;
        recurring_payments.insert(definition.id.clone(), definition);
        Ok(())
    }

    async fn get_recurring_payment(&self, id: &str) -> Result<Option<RecurringPaymentDefinition>, LedgerError> {
        let recurring_payments = self.recurring_payments.read().await;
        Ok(recurring_payments.get(id).cloned())
    }

    async fn list_recurring_payments(&self) -> Result<Vec<RecurringPaymentDefinition>, LedgerError> {
        let recurring_payments = self.recurring_payments.read().await;
        let mut definitions: Vec<_> = recurring_payments.values().cloned().collect();
        definitions.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));
        Ok(definitions)
    }

    async fn commit_booking(&self, write: BookingWrite) -> Result<Payment, LedgerError> {
        let mut recurring_payments = self.recurring_payments.write().await;
        let mut payments = self.payments.write().await;

        let definition = recurring_payments
            .get_mut(&write.definition_id)
            .ok_or_else(|| LedgerError::RecurringPaymentNotFound(write.definition_id.clone()))?;

        if definition.last_booking != write.expected_last_booking {
            return Err(LedgerError::PersistenceConflict(format!(
                "recurring payment {} was booked concurrently",
                write.definition_id
            )));
        }
        if write.next_booking <= write.last_booking {
            return Err(LedgerError::StorageError(format!(
                "next booking must follow last booking for {}",
                write.definition_id
            )));
        }

        definition.last_booking = Some(write.last_booking);
        definition.next_booking = Some(write.next_booking);
        payments.push(write.payment.clone());
        Ok(write.payment)
    }

    async fn list_payments_for_definition(&self, definition_id: &str) -> Result<Vec<Payment>, LedgerError> {
        let payments = self.payments.read().await;
        Ok(payments
            .iter()
            .filter(|p| p.recurring_payment_id.as_deref() == Some(definition_id))
            .cloned()
            .collect())
    }

    async fn save_group(&self, group: Group) -> Result<(), LedgerError> {
        let mut groups = self.groups.write().await;
        groups.insert(group.id.clone(), group);
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, LedgerError> {
        let groups = self.groups.read().await;
        Ok(groups.get(group_id).cloned())
    }

    async fn append_group_transaction(&self, transaction: GroupTransaction) -> Result<Group, LedgerError> {
        let mut groups = self.groups.write().await;
        let mut transactions = self.transactions.write().await;

        let group = groups
            .get_mut(&transaction.group_id)
            .ok_or_else(|| LedgerError::GroupNotFound(transaction.group_id.clone()))?;
        let value = group.value.checked_add(transaction.amount).ok_or_else(|| {
            LedgerError::InvalidAmount(format!("group {} total out of range", transaction.group_id))
        })?;

        group.value = value;
        let updated = group.clone();
        transactions
            .entry(transaction.group_id.clone())
            .or_default()
            .push(transaction);
        Ok(updated)
    }

    async fn list_group_transactions(&self, group_id: &str) -> Result<Vec<GroupTransaction>, LedgerError> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(group_id).cloned().unwrap_or_default())
    }
}
