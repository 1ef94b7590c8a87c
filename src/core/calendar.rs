use crate::core::errors::LedgerError;
use chrono::{DateTime, Datelike, Months, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Interval {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

/// Daily and weekly periods are fixed durations; the rest move along the
/// calendar and clamp to the last day of shorter months.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Days(i64),
    Months(u32),
}

impl Interval {
    pub const ALL: [Interval; 5] = [
        Interval::Daily,
        Interval::Weekly,
        Interval::Monthly,
        Interval::Quarterly,
        Interval::Yearly,
    ];

    fn step(self) -> Step {
        match self {
            Interval::Daily => Step::Days(1),
            Interval::Weekly => Step::Days(7),
            Interval::Monthly => Step::Months(1),
            Interval::Quarterly => Step::Months(3),
            Interval::Yearly => Step::Months(12),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Interval::Daily => "DAILY",
            Interval::Weekly => "WEEKLY",
            Interval::Monthly => "MONTHLY",
            Interval::Quarterly => "QUARTERLY",
            Interval::Yearly => "YEARLY",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Interval::ALL
            .into_iter()
            .find(|interval| interval.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| LedgerError::InvalidInterval(s.to_string()))
    }
}

/// Number of whole periods of `unit` that fully elapsed between `since` and
/// `reference`. Zero when `reference` is not after `since`.
pub fn elapsed_periods(reference: DateTime<Utc>, since: DateTime<Utc>, unit: Interval) -> u32 {
    if reference <= since {
        return 0;
    }
    match unit.step() {
        Step::Days(days) => {
            let periods = (reference - since).num_days() / days;
            u32::try_from(periods).unwrap_or(u32::MAX)
        }
        Step::Months(months) => elapsed_months(reference, since) / months,
    }
}

/// Shifts `from` forward by `count` whole periods of `unit`.
///
/// Calendar periods are always measured from `from` itself, so
/// `advance(jan_31, Monthly, 2)` is March 31 rather than the 28th/29th
/// carried over from February.
pub fn advance(from: DateTime<Utc>, unit: Interval, count: u32) -> Result<DateTime<Utc>, LedgerError> {
    match unit.step() {
        Step::Days(days) => TimeDelta::try_days(days * i64::from(count))
            .and_then(|delta| from.checked_add_signed(delta)),
        Step::Months(months) => months
            .checked_mul(count)
            .and_then(|total| shift_months(from, total)),
    }
    .ok_or(LedgerError::InstantOutOfRange)
}

fn shift_months(from: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    from.checked_add_months(Months::new(months))
}

fn elapsed_months(reference: DateTime<Utc>, since: DateTime<Utc>) -> u32 {
    let diff = i64::from(reference.year() - since.year()) * 12 + i64::from(reference.month())
        - i64::from(since.month());
    let mut months = u32::try_from(diff.max(0)).unwrap_or(u32::MAX);
    // The month index difference overshoots by one when the day/time of
    // `reference` has not yet reached that of `since`.
    while months > 0 && shift_months(since, months).is_none_or(|shifted| shifted > reference) {
        months -= 1;
    }
    months
}
