use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::ledger::PaymentSubmission;
use crate::order::{Order, Payment};
use crate::schedule::apply_paid_budget;
use crate::types::{OrderId, PaymentId};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// external system of record for orders.
///
/// Implementations recompute `paidCents` and installment paid statuses
/// themselves after every mutation; callers re-fetch instead of trusting
/// their own arithmetic.
pub trait OrderStore {
    /// get the current snapshot of an order
    fn fetch_order(&self, id: &str) -> StoreResult<Order>;

    /// replace the whole order document (last write wins)
    fn replace_order(&mut self, order: &Order) -> StoreResult<()>;

    /// append a payment, returning the id the store assigned
    fn append_payment(&mut self, id: &str, payment: &PaymentSubmission) -> StoreResult<PaymentId>;

    /// delete a payment by id
    fn delete_payment(&mut self, id: &str, payment_id: &str) -> StoreResult<()>;
}

/// in-memory store for testing and demos
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: HashMap<OrderId, Order>,
    fail_next: RefCell<Option<StoreError>>,
    calls: Cell<usize>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// seed an order exactly as given, without recomputing anything
    pub fn insert(&mut self, order: Order) {
        self.orders.insert(order.id.clone(), order);
    }

    /// make the next store call fail with `error`
    pub fn fail_next(&self, error: StoreError) {
        *self.fail_next.borrow_mut() = Some(error);
    }

    /// number of store calls made so far, failed ones included
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// snapshot of every stored order
    pub fn orders(&self) -> Vec<Order> {
        self.orders.values().cloned().collect()
    }

    fn begin_call(&self) -> StoreResult<()> {
        self.calls.set(self.calls.get() + 1);
        match self.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn order_mut(&mut self, id: &str) -> StoreResult<&mut Order> {
        self.orders
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }
}

/// server-side recomputation after a mutation: the paid total follows the
/// ledger and installment statuses follow the paid total
fn recompute(order: &mut Order) {
    order.paid = order.ledger_total();
    apply_paid_budget(&mut order.installments, order.paid);

    debug!(
        order_id = %order.id,
        paid = %order.paid,
        paid_installments = order.paid_installment_count(),
        "order totals recomputed"
    );
}

impl OrderStore for MemoryOrderStore {
    fn fetch_order(&self, id: &str) -> StoreResult<Order> {
        self.begin_call()?;

        self.orders
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    fn replace_order(&mut self, order: &Order) -> StoreResult<()> {
        self.begin_call()?;

        if order.id.is_empty() {
            return Err(StoreError::Rejected {
                status: 400,
                message: "order id is required".to_string(),
            });
        }

        let mut stored = order.clone();
        recompute(&mut stored);
        self.orders.insert(stored.id.clone(), stored);
        Ok(())
    }

    fn append_payment(&mut self, id: &str, payment: &PaymentSubmission) -> StoreResult<PaymentId> {
        self.begin_call()?;

        if !payment.value.is_positive() {
            return Err(StoreError::Rejected {
                status: 422,
                message: format!("payment value must be positive, got {}", payment.value),
            });
        }

        let order = self.order_mut(id)?;
        let payment_id = Uuid::new_v4().to_string();

        order.payment_history.push(Payment {
            id: Some(payment_id.clone()),
            date: payment.calendar_date(),
            value: payment.value,
        });
        recompute(order);

        Ok(payment_id)
    }

    fn delete_payment(&mut self, id: &str, payment_id: &str) -> StoreResult<()> {
        self.begin_call()?;

        let order = self.order_mut(id)?;
        let position = order
            .payment_history
            .iter()
            .position(|p| p.id.as_deref() == Some(payment_id))
            .ok_or_else(|| StoreError::PaymentNotFound {
                order_id: id.to_string(),
                payment_id: payment_id.to_string(),
            })?;

        order.payment_history.remove(position);
        recompute(order);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::PaymentEntry;
    use crate::money::Money;
    use crate::order::Installment;
    use crate::types::InstallmentStatus;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scheduled_order() -> Order {
        let installments = [334, 333, 333]
            .iter()
            .enumerate()
            .map(|(i, cents)| Installment {
                number: i as u32 + 1,
                due_date: Some(ymd(2024, 3 + i as u32, 10)),
                amount: Money::from_cents(*cents),
                status: InstallmentStatus::Pending,
            })
            .collect();

        Order {
            id: "o-1".to_string(),
            customer_id: None,
            date: None,
            items: Vec::new(),
            total: Money::from_cents(1000),
            installments,
            legacy_due_day: None,
            payment_history: Vec::new(),
            paid: Money::ZERO,
        }
    }

    fn submission(cents: i64) -> PaymentSubmission {
        PaymentEntry::new(ymd(2024, 3, 3), Money::from_cents(cents))
            .unwrap()
            .to_submission()
    }

    #[test]
    fn test_append_recomputes_paid_and_statuses() {
        let mut store = MemoryOrderStore::new();
        store.insert(scheduled_order());

        let payment_id = store.append_payment("o-1", &submission(400)).unwrap();
        assert!(Uuid::parse_str(&payment_id).is_ok());

        let order = store.fetch_order("o-1").unwrap();
        assert_eq!(order.paid, Money::from_cents(400));
        assert_eq!(order.payment_history[0].date, ymd(2024, 3, 3));
        assert_eq!(order.installments[0].status, InstallmentStatus::Paid);
        assert_eq!(order.installments[1].status, InstallmentStatus::Pending);

        store.append_payment("o-1", &submission(300)).unwrap();
        let order = store.fetch_order("o-1").unwrap();
        assert_eq!(order.paid, Money::from_cents(700));
        assert_eq!(order.paid_installment_count(), 2);
    }

    #[test]
    fn test_delete_reverts_statuses() {
        let mut store = MemoryOrderStore::new();
        store.insert(scheduled_order());

        let payment_id = store.append_payment("o-1", &submission(1000)).unwrap();
        assert!(store.fetch_order("o-1").unwrap().is_settled());

        store.delete_payment("o-1", &payment_id).unwrap();
        let order = store.fetch_order("o-1").unwrap();
        assert_eq!(order.paid, Money::ZERO);
        assert_eq!(order.paid_installment_count(), 0);
        assert!(order.payment_history.is_empty());
    }

    #[test]
    fn test_missing_order_and_payment() {
        let mut store = MemoryOrderStore::new();
        store.insert(scheduled_order());

        assert_eq!(
            store.fetch_order("nope"),
            Err(StoreError::NotFound { id: "nope".to_string() })
        );
        assert!(matches!(
            store.delete_payment("o-1", "missing"),
            Err(StoreError::PaymentNotFound { .. })
        ));
    }

    #[test]
    fn test_fail_next_is_one_shot() {
        let mut store = MemoryOrderStore::new();
        store.insert(scheduled_order());
        store.fail_next(StoreError::Unavailable {
            message: "timeout".to_string(),
        });

        assert!(matches!(
            store.append_payment("o-1", &submission(100)),
            Err(StoreError::Unavailable { .. })
        ));
        assert_eq!(store.fetch_order("o-1").unwrap().paid, Money::ZERO);

        assert!(store.append_payment("o-1", &submission(100)).is_ok());
        assert_eq!(store.call_count(), 3);
    }

    #[test]
    fn test_replace_is_last_write_wins() {
        let mut store = MemoryOrderStore::new();
        store.insert(scheduled_order());

        // a second session holding an old snapshot overwrites the payment
        let stale = store.fetch_order("o-1").unwrap();
        store.append_payment("o-1", &submission(400)).unwrap();
        store.replace_order(&stale).unwrap();

        let order = store.fetch_order("o-1").unwrap();
        assert!(order.payment_history.is_empty());
        assert_eq!(order.paid, Money::ZERO);
    }
}
