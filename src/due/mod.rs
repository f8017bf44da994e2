//! Next-due-date resolution.
//!
//! An order is resolved by exactly one strategy, chosen once from its
//! shape: the explicit installment list when it has one, otherwise the
//! recurring legacy day of month, otherwise nothing is due.

pub mod explicit;
pub mod legacy;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::dates;
use crate::order::Order;

/// which strategy resolves an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueMode {
    Explicit,
    Legacy { due_day: u32 },
    Unscheduled,
}

impl DueMode {
    pub fn for_order(order: &Order) -> Self {
        if order.has_schedule() {
            DueMode::Explicit
        } else if let Some(due_day) = order.legacy_due_day {
            DueMode::Legacy { due_day }
        } else {
            DueMode::Unscheduled
        }
    }
}

/// outcome of resolving an order against a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DueResolution {
    /// nothing left to collect on a date; counts as infinitely far away
    NoCandidate,
    Due(DueCandidate),
}

/// next collection date and its distance from today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DueCandidate {
    pub date: NaiveDate,
    pub days_until_due: i64,
    pub overdue: bool,
    pub days_overdue: i64,
    /// set by the explicit strategy only
    pub installment_number: Option<u32>,
}

impl DueCandidate {
    pub fn measure(date: NaiveDate, today: NaiveDate, installment_number: Option<u32>) -> Self {
        let diff = dates::days_between(today, date);
        let overdue = date < today;

        Self {
            date,
            days_until_due: diff.max(0),
            overdue,
            days_overdue: if overdue { -diff } else { 0 },
            installment_number,
        }
    }
}

impl DueResolution {
    pub fn candidate(&self) -> Option<&DueCandidate> {
        match self {
            DueResolution::Due(candidate) => Some(candidate),
            DueResolution::NoCandidate => None,
        }
    }

    pub fn candidate_date(&self) -> Option<NaiveDate> {
        self.candidate().map(|c| c.date)
    }

    /// `None` stands for an infinite distance
    pub fn days_until_due(&self) -> Option<i64> {
        self.candidate().map(|c| c.days_until_due)
    }

    pub fn is_overdue(&self) -> bool {
        self.candidate().map(|c| c.overdue).unwrap_or(false)
    }

    pub fn days_overdue(&self) -> i64 {
        self.candidate().map(|c| c.days_overdue).unwrap_or(0)
    }

    pub fn next_installment_number(&self) -> Option<u32> {
        self.candidate().and_then(|c| c.installment_number)
    }
}

/// resolve the next due date of `order` as seen on `today`
pub fn resolve(order: &Order, today: NaiveDate) -> DueResolution {
    let mode = DueMode::for_order(order);

    let resolution = match mode {
        DueMode::Explicit => explicit::resolve(&order.installments, today),
        DueMode::Legacy { due_day } => legacy::resolve(due_day, &order.payment_history, today),
        DueMode::Unscheduled => DueResolution::NoCandidate,
    };

    debug!(
        order_id = %order.id,
        ?mode,
        candidate = ?resolution.candidate_date(),
        overdue = resolution.is_overdue(),
        "due date resolved"
    );

    resolution
}

/// resolve against the provider's "now", taken as a day in the business timezone
pub fn resolve_at(order: &Order, time_provider: &SafeTimeProvider, config: &EngineConfig) -> DueResolution {
    resolve(order, config.today(time_provider.now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::order::{Installment, Payment};
    use crate::types::InstallmentStatus;
    use chrono::{Duration, TimeZone, Utc};
    use hourglass_rs::TimeSource;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order(installments: Vec<Installment>, legacy_due_day: Option<u32>) -> Order {
        Order {
            id: "o-1".to_string(),
            customer_id: None,
            date: None,
            items: Vec::new(),
            total: Money::from_cents(1000),
            installments,
            legacy_due_day,
            payment_history: Vec::new(),
            paid: Money::ZERO,
        }
    }

    fn pending(number: u32, due: NaiveDate) -> Installment {
        Installment {
            number,
            due_date: Some(due),
            amount: Money::from_cents(500),
            status: InstallmentStatus::Pending,
        }
    }

    #[test]
    fn test_mode_selection() {
        let explicit = order(vec![pending(1, ymd(2024, 3, 10))], Some(5));
        assert_eq!(DueMode::for_order(&explicit), DueMode::Explicit);

        let legacy = order(Vec::new(), Some(5));
        assert_eq!(DueMode::for_order(&legacy), DueMode::Legacy { due_day: 5 });

        let bare = order(Vec::new(), None);
        assert_eq!(DueMode::for_order(&bare), DueMode::Unscheduled);
        assert_eq!(resolve(&bare, ymd(2024, 3, 1)), DueResolution::NoCandidate);
    }

    #[test]
    fn test_explicit_list_wins_over_legacy_day() {
        // the legacy day would be overdue, the schedule is not
        let o = order(vec![pending(1, ymd(2024, 3, 20))], Some(1));
        let resolution = resolve(&o, ymd(2024, 3, 15));

        assert_eq!(resolution.candidate_date(), Some(ymd(2024, 3, 20)));
        assert!(!resolution.is_overdue());
        assert_eq!(resolution.next_installment_number(), Some(1));
    }

    #[test]
    fn test_measure() {
        let ahead = DueCandidate::measure(ymd(2024, 3, 20), ymd(2024, 3, 15), None);
        assert_eq!(ahead.days_until_due, 5);
        assert!(!ahead.overdue);
        assert_eq!(ahead.days_overdue, 0);

        let today = DueCandidate::measure(ymd(2024, 3, 15), ymd(2024, 3, 15), None);
        assert_eq!(today.days_until_due, 0);
        assert!(!today.overdue);

        let late = DueCandidate::measure(ymd(2024, 3, 10), ymd(2024, 3, 15), Some(2));
        assert_eq!(late.days_until_due, 0);
        assert!(late.overdue);
        assert_eq!(late.days_overdue, 5);
    }

    #[test]
    fn test_no_candidate_accessors() {
        let none = DueResolution::NoCandidate;
        assert_eq!(none.days_until_due(), None);
        assert!(!none.is_overdue());
        assert_eq!(none.days_overdue(), 0);
        assert_eq!(none.next_installment_number(), None);
    }

    #[test]
    fn test_resolve_at_follows_test_clock() {
        let o = order(vec![pending(1, ymd(2024, 3, 10))], None);
        let config = EngineConfig::storefront();
        // 02:00 UTC on the 10th is 23:00 on the 9th in the shop
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 3, 10, 2, 0, 0).unwrap(),
        ));

        let before = resolve_at(&o, &time, &config);
        assert_eq!(before.days_until_due(), Some(1));
        assert!(!before.is_overdue());

        let control = time.test_control().unwrap();
        control.advance(Duration::days(2));

        let after = resolve_at(&o, &time, &config);
        assert!(after.is_overdue());
        assert_eq!(after.days_overdue(), 1);
    }

    #[test]
    fn test_legacy_dispatch_sees_payment_history() {
        let mut o = order(Vec::new(), Some(10));
        o.payment_history.push(Payment {
            id: None,
            date: ymd(2024, 3, 3),
            value: Money::from_cents(100),
        });

        let resolution = resolve(&o, ymd(2024, 3, 15));
        assert_eq!(resolution.candidate_date(), Some(ymd(2024, 4, 10)));
        assert!(!resolution.is_overdue());
    }

    #[test]
    fn test_resolution_serializes_with_kind_tag() {
        let resolution = DueResolution::Due(DueCandidate::measure(ymd(2024, 3, 20), ymd(2024, 3, 15), Some(1)));
        let json = serde_json::to_value(&resolution).unwrap();
        assert_eq!(json["kind"], "due");
        assert_eq!(json["days_until_due"], 5);

        let json = serde_json::to_value(&DueResolution::NoCandidate).unwrap();
        assert_eq!(json["kind"], "no_candidate");
    }
}
