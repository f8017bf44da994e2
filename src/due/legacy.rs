use chrono::{Datelike, NaiveDate};

use super::{DueCandidate, DueResolution};
use crate::dates;
use crate::ledger;
use crate::order::Payment;

/// candidate date for a recurring monthly due day.
///
/// A payment anywhere in the current month settles this month's cycle and
/// moves the candidate to next month. Without one, the current month's day
/// stays the candidate even once it has passed.
pub fn candidate_date(due_day: u32, payments: &[Payment], today: NaiveDate) -> Option<NaiveDate> {
    if !(1..=31).contains(&due_day) {
        return None;
    }

    if ledger::has_payment_in_month(payments, today) {
        let (year, month) = dates::next_month(today.year(), today.month());
        dates::clamped_date(year, month, due_day)
    } else {
        dates::clamped_date(today.year(), today.month(), due_day)
    }
}

pub fn resolve(due_day: u32, payments: &[Payment], today: NaiveDate) -> DueResolution {
    match candidate_date(due_day, payments, today) {
        Some(date) => DueResolution::Due(DueCandidate::measure(date, today, None)),
        None => DueResolution::NoCandidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn paid_on(date: NaiveDate) -> Payment {
        Payment {
            id: None,
            date,
            value: Money::from_cents(1),
        }
    }

    #[test]
    fn test_day_31_clamps_to_end_of_february() {
        let resolution = resolve(31, &[], ymd(2023, 2, 20));

        assert_eq!(resolution.candidate_date(), Some(ymd(2023, 2, 28)));
        assert!(!resolution.is_overdue());
        assert_eq!(resolution.days_until_due(), Some(8));
    }

    #[test]
    fn test_day_31_in_thirty_day_month() {
        assert_eq!(candidate_date(31, &[], ymd(2024, 4, 2)), Some(ymd(2024, 4, 30)));
        // next-month candidate clamps too
        let payments = [paid_on(ymd(2024, 3, 31))];
        assert_eq!(candidate_date(31, &payments, ymd(2024, 3, 31)), Some(ymd(2024, 4, 30)));
    }

    #[test]
    fn test_payment_this_month_rolls_to_next_cycle() {
        let payments = [paid_on(ymd(2024, 3, 3))];
        let resolution = resolve(10, &payments, ymd(2024, 3, 15));

        assert_eq!(resolution.candidate_date(), Some(ymd(2024, 4, 10)));
        assert!(!resolution.is_overdue());
        assert_eq!(resolution.days_until_due(), Some(26));
    }

    #[test]
    fn test_passed_day_without_payment_is_overdue() {
        let payments = [paid_on(ymd(2024, 2, 10))];
        let resolution = resolve(10, &payments, ymd(2024, 3, 15));

        assert_eq!(resolution.candidate_date(), Some(ymd(2024, 3, 10)));
        assert!(resolution.is_overdue());
        assert_eq!(resolution.days_overdue(), 5);
        assert_eq!(resolution.days_until_due(), Some(0));
    }

    #[test]
    fn test_december_payment_rolls_into_january() {
        let payments = [paid_on(ymd(2024, 12, 1))];
        assert_eq!(candidate_date(15, &payments, ymd(2024, 12, 20)), Some(ymd(2025, 1, 15)));
    }

    #[test]
    fn test_out_of_range_day_has_no_candidate() {
        assert_eq!(resolve(0, &[], ymd(2024, 3, 1)), DueResolution::NoCandidate);
        assert_eq!(resolve(32, &[], ymd(2024, 3, 1)), DueResolution::NoCandidate);
    }
}
