use crate::core::errors::LedgerError;
use crate::core::models::{payment::Payment, recurring_payment::RecurringPaymentDefinition};
use crate::core::scheduler::DueBooking;
use crate::infrastructure::storage::{BookingWrite, LedgerStore};
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

/// Materializes due definitions into payments through the store's atomic
/// booking write.
pub struct LedgerBookingEngine<'a, S: LedgerStore> {
    store: &'a S,
}

impl<'a, S: LedgerStore> LedgerBookingEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        LedgerBookingEngine { store }
    }

    /// Books exactly one payment for `definition`, however many periods are
    /// outstanding. The payment and the `last_booking`/`next_booking` advance
    /// land together or not at all.
    pub async fn book(
        &self,
        definition: &RecurringPaymentDefinition,
        due: &DueBooking,
        now: DateTime<Utc>,
    ) -> Result<Payment, LedgerError> {
        if !definition.value.is_positive() {
            return Err(LedgerError::InvalidAmount(format!(
                "recurring payment {} has non-positive value {}",
                definition.id, definition.value
            )));
        }

        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            name: definition.name.clone(),
            value: definition.value,
            description: definition.description.clone(),
            created_at: now,
            category_id: definition.category_id.clone(),
            household_id: definition.household_id.clone(),
            user_id: definition.user_id.clone(),
            recurring_payment_id: Some(definition.id.clone()),
        };

        debug!(
            definition_id = %definition.id,
            elapsed = due.elapsed,
            period = %due.booked_at,
            "committing booking"
        );

        let payment = self
            .store
            .commit_booking(BookingWrite {
                definition_id: definition.id.clone(),
                expected_last_booking: due.expected_last_booking,
                last_booking: due.booked_at,
                next_booking: due.next_booking,
                payment,
            })
            .await?;

        info!(
            definition_id = %definition.id,
            payment_id = %payment.id,
            value = %payment.value,
            next_booking = %due.next_booking,
            "booked recurring payment"
        );
        Ok(payment)
    }
}
