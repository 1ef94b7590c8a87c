use crate::constants::{
    BOOKING_RUN_COMPLETED, GROUP_CREATED, GROUP_TRANSACTION_ADDED, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH,
    RECURRING_PAYMENT_BOOKED, RECURRING_PAYMENT_CREATED,
};
use crate::core::balances::{calculate_balances, check_participants};
use crate::core::booking::LedgerBookingEngine;
use crate::core::calendar::advance;
use crate::core::errors::LedgerError;
use crate::core::models::{
    audit::AppLog,
    group::{Group, GroupMember, Role},
    payment::Payment,
    recurring_payment::{NewRecurringPayment, RecurringPaymentDefinition},
    transaction::{GroupTransaction, NewGroupTransaction},
};
use crate::core::money::MonetaryAmount;
use crate::core::scheduler::{BookingRunReport, RecurringScheduler, SchedulerSettings};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::LedgerStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone, PartialEq, Eq)]
pub struct GroupBalances {
    pub group_id: String,
    pub balances: BTreeMap<String, MonetaryAmount>,
    /// Running total stored on the group.
    pub group_value: MonetaryAmount,
    /// Sum of the replayed ledger; equals `group_value` when consistent.
    pub ledger_total: MonetaryAmount,
}

/// Shared secret guarding the periodic booking trigger.
pub struct CronSecret(String);

impl CronSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        CronSecret(secret.into())
    }

    pub fn authorize(&self, provided: &str) -> Result<BookingCapability, LedgerError> {
        let expected = self.0.as_bytes();
        let provided = provided.as_bytes();
        if expected.is_empty() || expected.len() != provided.len() {
            return Err(LedgerError::Unauthorized);
        }
        let diff = expected.iter().zip(provided).fold(0u8, |acc, (a, b)| acc | (a ^ b));
        if diff != 0 {
            return Err(LedgerError::Unauthorized);
        }
        Ok(BookingCapability { _private: () })
    }
}

impl core::fmt::Debug for CronSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("CronSecret(<redacted>)")
    }
}

/// Proof that the caller passed [`CronSecret::authorize`].
#[derive(Debug)]
pub struct BookingCapability {
    _private: (),
}

pub struct LedgerService<L: LoggingService, S: LedgerStore> {
    storage: S,
    logging: L,
    scheduler: RecurringScheduler,
    cron_secret: CronSecret,
}

impl<L: LoggingService, S: LedgerStore> LedgerService<L, S> {
    pub fn new(storage: S, logging: L, settings: SchedulerSettings, cron_secret: CronSecret) -> Self {
        LedgerService {
            storage,
            logging,
            scheduler: RecurringScheduler::new(settings),
            cron_secret,
        }
    }

    pub fn authorize_trigger(&self, provided: &str) -> Result<BookingCapability, LedgerError> {
        self.cron_secret.authorize(provided)
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), LedgerError> {
        if value.trim().is_empty() {
            return Err(LedgerError::invalid_input(
                field,
                &format!("Invalid {}", field),
                format!("{} cannot be empty", field),
            ));
        }
        if value.len() > max_length {
            return Err(LedgerError::invalid_input(
                field,
                &format!("{} Too Long", field),
                format!("{} cannot exceed {} characters", field, max_length),
            ));
        }
        if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
            return Err(LedgerError::invalid_input(
                field,
                &format!("Invalid {}", field),
                format!("{} contains invalid characters", field),
            ));
        }
        Ok(())
    }

    fn validate_positive_amount(&self, field: &str, amount: MonetaryAmount) -> Result<(), LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::invalid_input(
                field,
                "Invalid Amount",
                "Amount must be greater than 0",
            ));
        }
        Ok(())
    }

    async fn require_group(&self, group_id: &str) -> Result<Group, LedgerError> {
        self.storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))
    }

    // RECURRING PAYMENTS

    pub async fn create_recurring_payment(
        &self,
        request: NewRecurringPayment,
    ) -> Result<RecurringPaymentDefinition, LedgerError> {
        self.validate_string_input("name", &request.name, MAX_NAME_LENGTH)?;
        if let Some(description) = &request.description {
            self.validate_string_input("description", description, MAX_DESCRIPTION_LENGTH)?;
        }
        self.validate_positive_amount("value", request.value)?;
        if request.end_date.is_some_and(|end| end < request.start_date) {
            return Err(LedgerError::invalid_input(
                "end_date",
                "Invalid End Date",
                "End date cannot be before start date",
            ));
        }

        // Nothing is due until one full period has passed since the start.
        let first_booking = advance(request.start_date, request.interval, 1)?;
        let definition = RecurringPaymentDefinition {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            value: request.value,
            description: request.description,
            interval: request.interval,
            start_date: request.start_date,
            end_date: request.end_date,
            last_booking: None,
            next_booking: Some(first_booking),
            category_id: request.category_id,
            household_id: request.household_id,
            user_id: request.user_id,
        };
        self.storage.save_recurring_payment(definition.clone()).await?;

        self.logging
            .log_action(
                RECURRING_PAYMENT_CREATED,
                json!({
                    "recurring_payment_id": definition.id,
                    "household_id": definition.household_id,
                    "value": definition.value,
                    "interval": definition.interval,
                }),
                Some(definition.user_id.as_str()),
            )
            .await?;
        Ok(definition)
    }

    pub async fn get_recurring_payment(&self, id: &str) -> Result<Option<RecurringPaymentDefinition>, LedgerError> {
        self.storage.get_recurring_payment(id).await
    }

    pub async fn list_booked_payments(&self, definition_id: &str) -> Result<Vec<Payment>, LedgerError> {
        self.storage
            .get_recurring_payment(definition_id)
            .await?
            .ok_or_else(|| LedgerError::RecurringPaymentNotFound(definition_id.to_string()))?;
        self.storage.list_payments_for_definition(definition_id).await
    }

    /// Evaluates every recurring definition at `now` and books at most one
    /// payment per due definition.
    pub async fn run_scheduled_bookings(
        &self,
        now: DateTime<Utc>,
        _capability: &BookingCapability,
    ) -> Result<BookingRunReport, LedgerError> {
        let definitions = self.storage.list_recurring_payments().await?;
        let engine = LedgerBookingEngine::new(&self.storage);
        let report = self.scheduler.run(&engine, definitions, now).await;

        info!(
            evaluated = report.evaluated,
            booked = report.booked.len(),
            failed = report.failures.len(),
            skipped = report.skipped,
            "scheduled booking run finished"
        );

        for payment in &report.booked {
            let logged = self
                .logging
                .log_action(
                    RECURRING_PAYMENT_BOOKED,
                    json!({
                        "payment_id": payment.id,
                        "recurring_payment_id": payment.recurring_payment_id,
                        "household_id": payment.household_id,
                        "value": payment.value,
                    }),
                    Some(payment.user_id.as_str()),
                )
                .await;
            // Committed bookings stand even when their log line is lost.
            if let Err(error) = logged {
                warn!(payment_id = %payment.id, %error, "failed to record booking");
            }
        }
        let summary = self
            .logging
            .log_action(
                BOOKING_RUN_COMPLETED,
                json!({
                    "now": now,
                    "evaluated": report.evaluated,
                    "booked": report.booked.len(),
                    "failures": report.failures.iter().map(|f| &f.definition_id).collect::<Vec<_>>(),
                }),
                None,
            )
            .await;
        if let Err(error) = summary {
            warn!(%error, "failed to record booking run summary");
        }

        Ok(report)
    }

    // GROUPS

    pub async fn create_group(
        &self,
        name: String,
        owner_id: &str,
        member_ids: Vec<String>,
    ) -> Result<Group, LedgerError> {
        self.validate_string_input("name", &name, MAX_NAME_LENGTH)?;
        self.validate_string_input("owner_id", owner_id, MAX_NAME_LENGTH)?;

        let mut members = vec![GroupMember {
            user_id: owner_id.to_string(),
            role: Role::Owner,
        }];
        for user_id in member_ids {
            self.validate_string_input("member_ids", &user_id, MAX_NAME_LENGTH)?;
            if !members.iter().any(|m| m.user_id == user_id) {
                members.push(GroupMember {
                    user_id,
                    role: Role::Member,
                });
            }
        }

        let group = Group {
            id: Uuid::new_v4().to_string(),
            name,
            value: MonetaryAmount::zero(),
            members,
        };
        self.storage.save_group(group.clone()).await?;

        self.logging
            .log_action(
                GROUP_CREATED,
                json!({
                    "group_id": group.id,
                    "name": group.name,
                    "member_ids": group.members.iter().map(|m| m.user_id.clone()).collect::<Vec<_>>(),
                }),
                Some(owner_id),
            )
            .await?;
        Ok(group)
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Option<Group>, LedgerError> {
        self.storage.get_group(group_id).await
    }

    /// Validates and appends a transaction to the group's ledger. Nothing is
    /// written when validation fails.
    pub async fn add_group_transaction(
        &self,
        group_id: &str,
        request: NewGroupTransaction,
    ) -> Result<GroupTransaction, LedgerError> {
        let group = self.require_group(group_id).await?;
        self.validate_string_input("name", &request.name, MAX_NAME_LENGTH)?;
        self.validate_positive_amount("amount", request.amount)?;

        if !group.is_member(&request.user_id) {
            return Err(LedgerError::NotGroupMember(request.user_id));
        }
        check_participants(request.kind, &request.participants)?;
        if let Some(outsider) = request.participants.iter().find(|p| !group.is_member(p)) {
            return Err(LedgerError::NotGroupMember(outsider.clone()));
        }

        let transaction = GroupTransaction {
            id: Uuid::new_v4().to_string(),
            group_id: group.id.clone(),
            name: request.name,
            amount: request.kind.signed(request.amount),
            kind: request.kind,
            user_id: request.user_id,
            participants: request.participants,
            created_at: Utc::now(),
        };
        let updated = self.storage.append_group_transaction(transaction.clone()).await?;

        info!(
            group_id = %updated.id,
            transaction_id = %transaction.id,
            amount = %transaction.amount,
            group_value = %updated.value,
            "group transaction appended"
        );
        self.logging
            .log_action(
                GROUP_TRANSACTION_ADDED,
                json!({
                    "group_id": updated.id,
                    "transaction_id": transaction.id,
                    "kind": transaction.kind,
                    "amount": transaction.amount,
                    "participants": transaction.participants,
                }),
                Some(transaction.user_id.as_str()),
            )
            .await?;
        Ok(transaction)
    }

    pub async fn list_group_transactions(&self, group_id: &str) -> Result<Vec<GroupTransaction>, LedgerError> {
        self.require_group(group_id).await?;
        self.storage.list_group_transactions(group_id).await
    }

    pub async fn get_group_balances(&self, group_id: &str) -> Result<GroupBalances, LedgerError> {
        let group = self.require_group(group_id).await?;
        let transactions = self.storage.list_group_transactions(group_id).await?;
        let balances = calculate_balances(&group, &transactions)?;

        let ledger_total = MonetaryAmount::checked_sum(balances.values().copied())
            .ok_or_else(|| LedgerError::InvalidAmount("group balance out of range".to_string()))?;
        if ledger_total != group.value {
            // The ledger may be a newer snapshot than the group row it was
            // read after; a lasting gap means the running total drifted.
            warn!(
                group_id = %group.id,
                group_value = %group.value,
                %ledger_total,
                "group running total differs from replayed ledger"
            );
        }

        Ok(GroupBalances {
            group_id: group.id,
            balances,
            group_value: group.value,
            ledger_total,
        })
    }

    pub async fn get_app_logs(&self, action: Option<&str>) -> Result<Vec<AppLog>, LedgerError> {
        self.logging.get_logs(action).await
    }
}
