//! Day counting for settlements.
//!
//! All counts are inclusive of both ends: a contract that starts and ends on
//! the same day has worked one day.

use chrono::{Datelike, NaiveDate};

use crate::models::{Contract, ContractStatus};

/// Inclusive number of days from `from` to `to`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::inclusive_days;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
/// assert_eq!(inclusive_days(start, end), 365);
/// ```
pub fn inclusive_days(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days() + 1
}

/// Inclusive number of days from `from` to `to` on a calendar of 30-day
/// months.
///
/// The 31st and the last day of February both count as day 30, so a full
/// calendar year is 360 days and a span that starts on the last day of a
/// month still covers one day.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::commercial_days;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
/// assert_eq!(commercial_days(start, end), 360);
/// ```
pub fn commercial_days(from: NaiveDate, to: NaiveDate) -> i64 {
    commercial_ordinal(to) - commercial_ordinal(from) + 1
}

fn commercial_ordinal(date: NaiveDate) -> i64 {
    let last_of_month = date.succ_opt().is_none_or(|next| next.month() != date.month());
    let day = if last_of_month { 30 } else { date.day().min(30) };
    i64::from(date.year()) * 360 + i64::from(date.month0()) * 30 + i64::from(day)
}

/// The last day a settlement counts.
///
/// A terminated contract settles up to its termination date; anything else
/// settles up to the requested settlement date.
pub fn effective_end_date(contract: &Contract, settlement_date: NaiveDate) -> NaiveDate {
    match (contract.status, contract.end_date) {
        (ContractStatus::Terminated, Some(end)) => end,
        _ => settlement_date,
    }
}

/// The calendar semester (Jan 1–Jun 30 or Jul 1–Dec 31) containing `date`.
pub fn semester_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let year = date.year();
    let (start, end) = if date.month() <= 6 {
        ((1, 1), (6, 30))
    } else {
        ((7, 1), (12, 31))
    };
    // Both dates exist in every year.
    (
        NaiveDate::from_ymd_opt(year, start.0, start.1).unwrap_or(date),
        NaiveDate::from_ymd_opt(year, end.0, end.1).unwrap_or(date),
    )
}

/// Zero-based month index (`year * 12 + month0`) used to compare months.
pub(crate) fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}
