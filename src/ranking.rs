use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::due::{self, DueResolution};
use crate::order::Order;
use crate::types::SortMode;

/// what the urgency ordering looks at for one order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UrgencyKey {
    pub settled: bool,
    pub overdue: bool,
    pub days_overdue: i64,
    /// `None` when nothing is scheduled, i.e. infinitely far away
    pub days_until_due: Option<i64>,
    pub order_date: Option<DateTime<Utc>>,
}

impl UrgencyKey {
    pub fn for_order(order: &Order, today: NaiveDate) -> Self {
        let settled = order.is_settled();
        // settled orders are ordered by date alone
        let resolution = if settled {
            DueResolution::NoCandidate
        } else {
            due::resolve(order, today)
        };

        Self {
            settled,
            overdue: resolution.is_overdue(),
            days_overdue: resolution.days_overdue(),
            days_until_due: resolution.days_until_due(),
            order_date: order.date,
        }
    }

    /// most urgent first; settled orders last, oldest of them first
    pub fn urgency_cmp(&self, other: &Self) -> Ordering {
        let by_state = match (self.settled, other.settled) {
            (false, true) => return Ordering::Less,
            (true, false) => return Ordering::Greater,
            (true, true) => Ordering::Equal,
            (false, false) => match (self.overdue, other.overdue) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (true, true) => other.days_overdue.cmp(&self.days_overdue),
                (false, false) => cmp_present_first(self.days_until_due, other.days_until_due),
            },
        };

        by_state.then_with(|| cmp_present_first(self.order_date, other.order_date))
    }
}

/// ascending, with `None` after every value
fn cmp_present_first<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// urgency ranking; stable, so equal keys keep their input order
pub fn rank(orders: Vec<Order>, today: NaiveDate) -> Vec<Order> {
    let mut keyed: Vec<(UrgencyKey, Order)> = orders
        .into_iter()
        .map(|order| (UrgencyKey::for_order(&order, today), order))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| a.urgency_cmp(b));
    keyed.into_iter().map(|(_, order)| order).collect()
}

/// most recent order date first, undated orders last
pub fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| match (a.date, b.date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (a, b) => cmp_present_first(a, b),
    });
    orders
}

pub fn sort_orders(orders: Vec<Order>, mode: SortMode, today: NaiveDate) -> Vec<Order> {
    match mode {
        SortMode::Newest => newest_first(orders),
        SortMode::Urgency => rank(orders, today),
    }
}
