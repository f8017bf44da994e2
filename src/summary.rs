use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::money::Money;
use crate::order::Order;

/// headline figures over a set of orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub order_count: usize,
    pub total_revenue: Money,
    pub item_count: u64,
    pub average_order_value: Money,
    /// sum of remaining balances
    pub pending_revenue: Money,
    pub settled_count: usize,
}

impl PortfolioSummary {
    pub fn from_orders(orders: &[Order]) -> Self {
        let total_revenue: Money = orders.iter().map(|o| o.total).sum();

        PortfolioSummary {
            order_count: orders.len(),
            total_revenue,
            item_count: orders.iter().map(Order::item_count).sum(),
            average_order_value: average(total_revenue, orders.len()),
            pending_revenue: orders.iter().map(Order::remaining).sum(),
            settled_count: orders.iter().filter(|o| o.is_settled()).count(),
        }
    }
}

/// mean in cents, rounded half away from zero; zero for an empty set
fn average(total: Money, count: usize) -> Money {
    if count == 0 {
        return Money::ZERO;
    }

    let mean = (Decimal::from(total.cents()) / Decimal::from(count as u64))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    Money::from_cents(mean.to_i64().unwrap_or(0))
}
