/// read-time views of orders
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::due::{self, DueMode, DueResolution};
use crate::money::Money;
use crate::order::{Installment, Order};
use crate::types::{InstallmentStatus, OrderId};

/// serializable view of an order as shown on a given day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub customer_id: Option<String>,
    pub order_date: Option<DateTime<Utc>>,
    pub as_of: NaiveDate,
    pub balance: BalanceView,
    pub due_mode: DueMode,
    pub next_due: DueResolution,
    pub installments: Vec<InstallmentView>,
    pub last_payment_date: Option<NaiveDate>,
    pub payment_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceView {
    pub total: Money,
    pub paid: Money,
    pub remaining: Money,
    pub ledger_total: Money,
    /// invoice figure, total minus the ledger
    pub amount_due: Money,
    pub ledger_drift: Money,
    pub settled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallmentView {
    pub number: u32,
    pub due_date: Option<NaiveDate>,
    pub amount: Money,
    pub status: InstallmentStatus,
}

/// status to display: unpaid installments past their due date show as late
pub fn display_status(installment: &Installment, today: NaiveDate) -> InstallmentStatus {
    match (installment.status, installment.due_date) {
        (InstallmentStatus::Paid, _) => InstallmentStatus::Paid,
        (_, Some(due)) if due < today => InstallmentStatus::Late,
        _ => InstallmentStatus::Pending,
    }
}

impl OrderView {
    pub fn build(order: &Order, today: NaiveDate) -> Self {
        OrderView {
            id: order.id.clone(),
            customer_id: order.customer_id.clone(),
            order_date: order.date,
            as_of: today,
            balance: BalanceView {
                total: order.total,
                paid: order.paid,
                remaining: order.remaining(),
                ledger_total: order.ledger_total(),
                amount_due: order.amount_due(),
                ledger_drift: order.ledger_drift(),
                settled: order.is_settled(),
            },
            due_mode: DueMode::for_order(order),
            next_due: due::resolve(order, today),
            installments: order
                .installments
                .iter()
                .map(|i| InstallmentView {
                    number: i.number,
                    due_date: i.due_date,
                    amount: i.amount,
                    status: display_status(i, today),
                })
                .collect(),
            last_payment_date: order.last_payment_date(),
            payment_count: order.payment_history.len(),
        }
    }

    pub fn paid_installment_count(&self) -> usize {
        self.installments
            .iter()
            .filter(|i| i.status.is_paid())
            .count()
    }

    pub fn late_installment_count(&self) -> usize {
        self.installments
            .iter()
            .filter(|i| i.status == InstallmentStatus::Late)
            .count()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
