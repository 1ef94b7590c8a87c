use crate::core::booking::LedgerBookingEngine;
use crate::core::calendar::{advance, elapsed_periods};
use crate::core::errors::LedgerError;
use crate::core::models::{payment::Payment, recurring_payment::RecurringPaymentDefinition};
use crate::infrastructure::storage::LedgerStore;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

/// Which instant a booking records as `last_booking`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingAnchor {
    /// The due period itself: the first period slot after `last_booking`,
    /// counted from `start_date`. Missed periods stay outstanding until
    /// later runs book them one by one.
    #[default]
    Period,
    /// The run's `now`. Any further missed periods are forfeited.
    Now,
}

impl FromStr for BookingAnchor {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "period" => Ok(BookingAnchor::Period),
            "now" => Ok(BookingAnchor::Now),
            other => Err(LedgerError::invalid_input(
                "booking_anchor",
                "Invalid booking anchor",
                format!("expected `period` or `now`, got `{}`", other),
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchedulerSettings {
    pub anchor: BookingAnchor,
    /// Definitions evaluated in parallel within one run.
    pub concurrency: usize,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        SchedulerSettings {
            anchor: BookingAnchor::Period,
            concurrency: 8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DueBooking {
    /// Whole periods elapsed since the baseline, at least 1.
    pub elapsed: u32,
    pub expected_last_booking: Option<DateTime<Utc>>,
    pub booked_at: DateTime<Utc>,
    pub next_booking: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScheduleDecision {
    Ended,
    NotDue,
    Due(DueBooking),
}

#[derive(Clone, Debug, Serialize)]
pub struct BookingFailure {
    pub definition_id: String,
    pub error: LedgerError,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BookingRunReport {
    pub booked: Vec<Payment>,
    pub failures: Vec<BookingFailure>,
    /// Definitions past their end date.
    pub skipped: usize,
    pub evaluated: usize,
}

enum Outcome {
    Booked(Payment),
    Ended,
    NotDue,
    Failed(BookingFailure),
}

pub struct RecurringScheduler {
    settings: SchedulerSettings,
}

impl RecurringScheduler {
    pub fn new(settings: SchedulerSettings) -> Self {
        RecurringScheduler { settings }
    }

    pub fn evaluate(
        &self,
        definition: &RecurringPaymentDefinition,
        now: DateTime<Utc>,
    ) -> Result<ScheduleDecision, LedgerError> {
        if definition.has_ended(now) {
            return Ok(ScheduleDecision::Ended);
        }

        let baseline = definition.baseline();
        let elapsed = elapsed_periods(now, baseline, definition.interval);
        if elapsed == 0 {
            return Ok(ScheduleDecision::NotDue);
        }

        let (booked_at, next_booking) = match self.settings.anchor {
            BookingAnchor::Period => {
                // Slots are counted from the start date so month-end clamping
                // never carries over into later periods.
                let booked = definition
                    .last_booking
                    .map_or(0, |last| elapsed_periods(last, definition.start_date, definition.interval));
                let slot = booked.checked_add(1).ok_or(LedgerError::InstantOutOfRange)?;
                let booked_at = advance(definition.start_date, definition.interval, slot)?;
                if booked_at > now {
                    return Ok(ScheduleDecision::NotDue);
                }
                let next_slot = slot.checked_add(1).ok_or(LedgerError::InstantOutOfRange)?;
                (booked_at, advance(definition.start_date, definition.interval, next_slot)?)
            }
            BookingAnchor::Now => (now, advance(now, definition.interval, 1)?),
        };

        Ok(ScheduleDecision::Due(DueBooking {
            elapsed,
            expected_last_booking: definition.last_booking,
            booked_at,
            next_booking,
        }))
    }

    /// One pass over `definitions`. A failing definition is reported and
    /// the pass carries on with the rest.
    pub async fn run<S: LedgerStore>(
        &self,
        engine: &LedgerBookingEngine<'_, S>,
        definitions: Vec<RecurringPaymentDefinition>,
        now: DateTime<Utc>,
    ) -> BookingRunReport {
        let evaluated = definitions.len();
        let outcomes: Vec<Outcome> = stream::iter(definitions)
            .map(move |definition| async move { self.process(engine, definition, now).await })
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        let mut report = BookingRunReport {
            evaluated,
            ..BookingRunReport::default()
        };
        for outcome in outcomes {
            match outcome {
                Outcome::Booked(payment) => report.booked.push(payment),
                Outcome::Ended => report.skipped += 1,
                Outcome::NotDue => {}
                Outcome::Failed(failure) => report.failures.push(failure),
            }
        }
        report
    }

    async fn process<S: LedgerStore>(
        &self,
        engine: &LedgerBookingEngine<'_, S>,
        definition: RecurringPaymentDefinition,
        now: DateTime<Utc>,
    ) -> Outcome {
        let booking = match self.evaluate(&definition, now) {
            Ok(ScheduleDecision::Ended) => {
                debug!(definition_id = %definition.id, "recurring payment ended, skipping");
                return Outcome::Ended;
            }
            Ok(ScheduleDecision::NotDue) => return Outcome::NotDue,
            Ok(ScheduleDecision::Due(due)) => engine.book(&definition, &due, now).await,
            Err(error) => Err(error),
        };

        match booking {
            Ok(payment) => Outcome::Booked(payment),
            Err(error) => {
                warn!(definition_id = %definition.id, %error, "booking failed");
                Outcome::Failed(BookingFailure {
                    definition_id: definition.id,
                    error,
                })
            }
        }
    }
}
