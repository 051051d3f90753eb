//! Budget period arithmetic
//!
//! Parses the start month a user typed and computes the inclusive end date of
//! a budget from its cadence.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::{WizardError, WizardResult};
use crate::models::BudgetCadence;

const MONTH_NAMES: [(&str, u32); 24] = [
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
    ("sep", 9),
];

/// Parse a start month to the first day of that month
///
/// Formats supported: "2025-09", "2025-9", "2025-09-14" (day is dropped),
/// "September 2025", "Sep 2025", "sept. 2025".
pub fn parse_start_month(s: &str) -> WizardResult<NaiveDate> {
    let trimmed = s.trim();
    let invalid = || WizardError::InvalidDate(format!("'{}' is not a month (expected YYYY-MM)", s));

    if trimmed.is_empty() {
        return Err(invalid());
    }

    if let Some(date) = parse_numeric_month(trimmed) {
        return Ok(date);
    }

    parse_month_name(&trimmed.to_lowercase()).ok_or_else(invalid)
}

fn parse_numeric_month(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month_part = parts.next()?;
    if month_part.is_empty() || month_part.len() > 2 {
        return None;
    }
    let month: u32 = month_part.parse().ok()?;

    // An optional day component must itself be valid
    if let Some(day) = parts.next() {
        let day: u32 = day.parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)?;
    }
    if parts.next().is_some() || !(1000..=9999).contains(&year) {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, 1)
}

fn parse_month_name(s: &str) -> Option<NaiveDate> {
    for (name, month) in MONTH_NAMES {
        if let Some(rest) = s.strip_prefix(name) {
            let rest = rest.trim_start_matches('.').trim().trim_start_matches(',').trim();
            // Reject "marchx 2025" and friends
            if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let year: i32 = rest.parse().ok()?;
            if !(1000..=9999).contains(&year) {
                return None;
            }
            return NaiveDate::from_ymd_opt(year, month, 1);
        }
    }
    None
}

/// Inclusive end date of a budget starting on the first day of `start`
///
/// Advances by the cadence's month count and steps back one day, landing on
/// the last day of the final covered month.
pub fn end_date_for(start: NaiveDate, cadence: BudgetCadence) -> WizardResult<NaiveDate> {
    let first = start.with_day(1).unwrap_or(start);
    first
        .checked_add_months(Months::new(cadence.months()))
        .and_then(|advanced| advanced.pred_opt())
        .ok_or_else(|| WizardError::InvalidDate(format!("{} is out of range", start)))
}

/// Compute a budget's end date from the start month text and period name
///
/// Fails with `InvalidPeriod` for an unknown period and `InvalidDate` when
/// the start cannot be read as a month.
pub fn compute_end_date(start: &str, period: &str) -> WizardResult<NaiveDate> {
    let cadence: BudgetCadence = period.parse()?;
    let start = parse_start_month(start)?;
    end_date_for(start, cadence)
}

/// First day of the month after `today`
pub fn next_month_start(today: NaiveDate) -> NaiveDate {
    let first = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap_or(today);
    first.checked_add_months(Months::new(1)).unwrap_or(first)
}

/// Format a month as `YYYY-MM`
pub fn format_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Default draft start month: the month after `today`, as `YYYY-MM`
pub fn default_start_month(today: NaiveDate) -> String {
    format_month(next_month_start(today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_start_month("2025-09").unwrap(), ymd(2025, 9, 1));
        assert_eq!(parse_start_month("2025-9").unwrap(), ymd(2025, 9, 1));
        assert_eq!(parse_start_month(" 2025-09-14 ").unwrap(), ymd(2025, 9, 1));
    }

    #[test]
    fn test_parse_month_names() {
        assert_eq!(parse_start_month("September 2025").unwrap(), ymd(2025, 9, 1));
        assert_eq!(parse_start_month("sep 2025").unwrap(), ymd(2025, 9, 1));
        assert_eq!(parse_start_month("Sept. 2025").unwrap(), ymd(2025, 9, 1));
        assert_eq!(parse_start_month("march, 2026").unwrap(), ymd(2026, 3, 1));
        assert_eq!(parse_start_month("May 2024").unwrap(), ymd(2024, 5, 1));
    }

    #[test]
    fn test_parse_rejects() {
        for bad in ["", "2025", "2025-13", "2025-00", "2025-02-30", "September", "Smarch 2025", "09-2025"] {
            let err = parse_start_month(bad).unwrap_err();
            assert!(matches!(err, WizardError::InvalidDate(_)), "{bad} should be invalid");
        }
    }

    #[test]
    fn test_end_date_month() {
        assert_eq!(compute_end_date("2025-09", "month").unwrap(), ymd(2025, 9, 30));
        assert_eq!(compute_end_date("2024-02", "month").unwrap(), ymd(2024, 2, 29));
        assert_eq!(compute_end_date("2025-12", "month").unwrap(), ymd(2025, 12, 31));
    }

    #[test]
    fn test_end_date_quarter_and_year() {
        assert_eq!(compute_end_date("2025-11", "quarter").unwrap(), ymd(2026, 1, 31));
        assert_eq!(compute_end_date("2025-01", "year").unwrap(), ymd(2025, 12, 31));
        assert_eq!(compute_end_date("March 2024", "year").unwrap(), ymd(2025, 2, 28));
    }

    #[test]
    fn test_end_date_is_after_start_month_for_all_cadences() {
        for cadence in [BudgetCadence::Month, BudgetCadence::Quarter, BudgetCadence::Year] {
            for month in 1..=12 {
                let start = ymd(2025, month, 1);
                let end = end_date_for(start, cadence).unwrap();
                let advanced = start.checked_add_months(Months::new(cadence.months())).unwrap();
                assert!(end > start);
                assert_eq!(end.succ_opt().unwrap(), advanced);
            }
        }
    }

    #[test]
    fn test_unknown_period() {
        let err = compute_end_date("2025-09", "weekly").unwrap_err();
        assert!(matches!(err, WizardError::InvalidPeriod(_)));
    }

    #[test]
    fn test_invalid_start() {
        let err = compute_end_date("not a month", "month").unwrap_err();
        assert!(matches!(err, WizardError::InvalidDate(_)));
    }

    #[test]
    fn test_next_month_start() {
        assert_eq!(next_month_start(ymd(2025, 8, 31)), ymd(2025, 9, 1));
        assert_eq!(next_month_start(ymd(2025, 12, 5)), ymd(2026, 1, 1));
        assert_eq!(default_start_month(ymd(2026, 10, 17)), "2026-11");
    }
}
