pub mod builder;

use chrono::NaiveDate;

use crate::errors::Result;
use crate::order::Order;

pub use builder::{apply_paid_budget, InstallmentSchedule, ScheduleRequest};

impl ScheduleRequest {
    /// request regrouping an existing order into `count` installments over
    /// everything the store says has been paid so far
    pub fn for_order(order: &Order, count: u32) -> Self {
        Self::new(order.total, count).with_already_paid(order.paid)
    }
}

/// copy of `order` carrying a freshly generated schedule; the store still
/// recomputes totals when the copy is submitted
pub fn rebuild_order(order: &Order, request: &ScheduleRequest, today: NaiveDate) -> Result<Order> {
    let schedule = InstallmentSchedule::generate(request, today)?;

    let mut rebuilt = order.clone();
    rebuilt.total = request.total;
    rebuilt.installments = schedule.into_installments();
    Ok(rebuilt)
}
