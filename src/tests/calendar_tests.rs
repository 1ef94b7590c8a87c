use crate::core::calendar::{Interval, advance, elapsed_periods};
use crate::core::errors::LedgerError;
use crate::tests::at;
use chrono::{DateTime, TimeZone, Utc};

fn at_hour(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

#[test]
fn test_fixed_duration_periods() {
    let since = at(2024, 1, 1);
    assert_eq!(elapsed_periods(at_hour(2024, 1, 3, 12), since, Interval::Daily), 2);
    assert_eq!(elapsed_periods(at_hour(2024, 1, 1, 23), since, Interval::Daily), 0);
    assert_eq!(elapsed_periods(at(2024, 1, 16), since, Interval::Weekly), 2);
    assert_eq!(elapsed_periods(at(2024, 1, 14), since, Interval::Weekly), 1);
}

#[test]
fn test_nothing_elapses_backwards() {
    for interval in Interval::ALL {
        assert_eq!(elapsed_periods(at(2024, 1, 1), at(2024, 6, 1), interval), 0);
        assert_eq!(elapsed_periods(at(2024, 1, 1), at(2024, 1, 1), interval), 0);
    }
}

#[test]
fn test_monthly_periods_follow_the_calendar() {
    let since = at_hour(2024, 1, 15, 10);
    assert_eq!(elapsed_periods(at_hour(2024, 2, 15, 9), since, Interval::Monthly), 0);
    assert_eq!(elapsed_periods(at_hour(2024, 2, 15, 10), since, Interval::Monthly), 1);
    assert_eq!(elapsed_periods(at_hour(2024, 4, 15, 10), since, Interval::Monthly), 3);

    // January 31st plus one month clamps to the end of February.
    let month_end = at(2024, 1, 31);
    assert_eq!(elapsed_periods(at(2024, 2, 28), month_end, Interval::Monthly), 0);
    assert_eq!(elapsed_periods(at(2024, 2, 29), month_end, Interval::Monthly), 1);
}

#[test]
fn test_quarterly_and_yearly_periods() {
    let since = at(2024, 1, 1);
    assert_eq!(elapsed_periods(at(2024, 6, 30), since, Interval::Quarterly), 1);
    assert_eq!(elapsed_periods(at(2024, 7, 1), since, Interval::Quarterly), 2);
    assert_eq!(elapsed_periods(at(2026, 12, 31), since, Interval::Yearly), 2);

    let leap_day = at(2024, 2, 29);
    assert_eq!(elapsed_periods(at(2025, 2, 27), leap_day, Interval::Yearly), 0);
    assert_eq!(elapsed_periods(at(2025, 2, 28), leap_day, Interval::Yearly), 1);
}

#[test]
fn test_advance_measures_from_the_origin() {
    let month_end = at(2024, 1, 31);
    assert_eq!(advance(month_end, Interval::Monthly, 1).unwrap(), at(2024, 2, 29));
    assert_eq!(advance(month_end, Interval::Monthly, 2).unwrap(), at(2024, 3, 31));
    assert_eq!(advance(at(2023, 11, 30), Interval::Quarterly, 1).unwrap(), at(2024, 2, 29));
    assert_eq!(advance(at(2024, 2, 29), Interval::Yearly, 4).unwrap(), at(2028, 2, 29));
    assert_eq!(advance(at(2024, 12, 30), Interval::Daily, 3).unwrap(), at(2025, 1, 2));
    assert_eq!(advance(at(2024, 1, 1), Interval::Weekly, 2).unwrap(), at(2024, 1, 15));
    assert_eq!(advance(at(2024, 1, 1), Interval::Monthly, 0).unwrap(), at(2024, 1, 1));
}

#[test]
fn test_advanced_instant_is_exactly_one_elapsed_period_away() {
    let since = at_hour(2023, 8, 31, 7);
    for interval in Interval::ALL {
        let next = advance(since, interval, 1).unwrap();
        assert_eq!(elapsed_periods(next, since, interval), 1, "{}", interval);
        let later = advance(since, interval, 5).unwrap();
        assert_eq!(elapsed_periods(later, since, interval), 5, "{}", interval);
    }
}

#[test]
fn test_advance_out_of_range() {
    let result = advance(DateTime::<Utc>::MAX_UTC, Interval::Daily, 1);
    assert!(matches!(result, Err(LedgerError::InstantOutOfRange)));
    let result = advance(DateTime::<Utc>::MAX_UTC, Interval::Yearly, 1);
    assert!(matches!(result, Err(LedgerError::InstantOutOfRange)));
}

#[test]
fn test_interval_names() {
    assert_eq!("monthly".parse::<Interval>().unwrap(), Interval::Monthly);
    assert_eq!("QUARTERLY".parse::<Interval>().unwrap(), Interval::Quarterly);
    assert!(matches!(
        "fortnightly".parse::<Interval>(),
        Err(LedgerError::InvalidInterval(_))
    ));
    assert_eq!(serde_json::to_string(&Interval::Weekly).unwrap(), "\"WEEKLY\"");
    let parsed: Interval = serde_json::from_str("\"YEARLY\"").unwrap();
    assert_eq!(parsed, Interval::Yearly);
}
