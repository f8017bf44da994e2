use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::dates;
use crate::ledger;
use crate::money::Money;
use crate::types::{InstallmentStatus, OrderId, PaymentId};

/// credit-sale order as held by the external store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// order creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<OrderLine>,
    #[serde(rename = "totalCents")]
    pub total: Money,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub installments: Vec<Installment>,
    /// recurring day of month for orders created before per-installment dates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_due_day: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub payment_history: Vec<Payment>,
    /// cached total paid, recomputed by the store after each mutation
    #[serde(rename = "paidCents", default)]
    pub paid: Money,
}

/// one scheduled part of an order total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub number: u32,
    /// `None` when the stored value is missing or not a valid date
    #[serde(default, with = "dates::wire_lenient")]
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "amountCents")]
    pub amount: Money,
    pub status: InstallmentStatus,
}

/// recorded payment against an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PaymentId>,
    #[serde(with = "dates::wire")]
    pub date: NaiveDate,
    #[serde(rename = "valueCents")]
    pub value: Money,
}

/// product line of an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: u32,
    #[serde(rename = "unitPriceCents")]
    pub unit_price: Money,
}

impl OrderLine {
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

impl Order {
    /// balance still owed according to the cached paid total
    pub fn remaining(&self) -> Money {
        (self.total - self.paid).max(Money::ZERO)
    }

    pub fn is_settled(&self) -> bool {
        self.remaining().is_zero()
    }

    /// sum of the payment history
    pub fn ledger_total(&self) -> Money {
        ledger::ledger_total(&self.payment_history)
    }

    /// cached paid total minus the ledger sum; non-zero means a stale snapshot
    pub fn ledger_drift(&self) -> Money {
        self.paid - self.ledger_total()
    }

    /// invoice figure: total minus everything in the ledger
    pub fn amount_due(&self) -> Money {
        self.total - self.ledger_total()
    }

    pub fn last_payment_date(&self) -> Option<NaiveDate> {
        ledger::last_payment_date(&self.payment_history)
    }

    pub fn paid_installment_count(&self) -> usize {
        self.installments
            .iter()
            .filter(|i| i.status.is_paid())
            .count()
    }

    pub fn scheduled_total(&self) -> Money {
        self.installments.iter().map(|i| i.amount).sum()
    }

    pub fn items_total(&self) -> Money {
        self.items.iter().map(OrderLine::line_total).sum()
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn has_schedule(&self) -> bool {
        !self.installments.is_empty()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const STORE_JSON: &str = r#"{
        "id": "66f1c2",
        "customerId": "c-17",
        "date": "2024-03-01T14:22:05.120Z",
        "items": [
            { "productId": "p-1", "quantity": 2, "unitPriceCents": 350 },
            { "productId": "p-2", "quantity": 1, "unitPriceCents": 300 }
        ],
        "totalCents": 1000,
        "installments": [
            { "number": 1, "dueDate": "2024-03-10T03:00:00.000Z", "amountCents": 334, "status": "pago" },
            { "number": 2, "dueDate": "Invalid Date", "amountCents": 333, "status": "pendente" },
            { "number": 3, "dueDate": "2024-05-10T12:00:00.000Z", "amountCents": 333, "status": "pendente" }
        ],
        "paymentHistory": [
            { "id": "pay-1", "date": "2024-03-03T12:00:00.000Z", "valueCents": 400 }
        ],
        "paidCents": 400
    }"#;

    #[test]
    fn test_deserialize_store_order() {
        let order: Order = serde_json::from_str(STORE_JSON).unwrap();

        assert_eq!(order.id, "66f1c2");
        assert_eq!(order.total, Money::from_cents(1000));
        assert_eq!(order.installments.len(), 3);
        assert_eq!(order.installments[0].due_date, Some(ymd(2024, 3, 10)));
        assert_eq!(order.installments[1].due_date, None);
        assert_eq!(order.installments[0].status, InstallmentStatus::Paid);
        assert_eq!(order.payment_history[0].date, ymd(2024, 3, 3));
        assert_eq!(order.legacy_due_day, None);
    }

    #[test]
    fn test_derived_figures() {
        let order: Order = serde_json::from_str(STORE_JSON).unwrap();

        assert_eq!(order.remaining(), Money::from_cents(600));
        assert!(!order.is_settled());
        assert_eq!(order.ledger_total(), Money::from_cents(400));
        assert_eq!(order.ledger_drift(), Money::ZERO);
        assert_eq!(order.amount_due(), Money::from_cents(600));
        assert_eq!(order.paid_installment_count(), 1);
        assert_eq!(order.scheduled_total(), order.total);
        assert_eq!(order.items_total(), Money::from_cents(1000));
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.last_payment_date(), Some(ymd(2024, 3, 3)));
    }

    #[test]
    fn test_legacy_order_with_null_lists() {
        let json = r#"{
            "id": "old-1",
            "totalCents": 5000,
            "installments": null,
            "legacyDueDay": 31,
            "paymentHistory": null
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();

        assert!(!order.has_schedule());
        assert!(order.payment_history.is_empty());
        assert_eq!(order.legacy_due_day, Some(31));
        assert_eq!(order.paid, Money::ZERO);
        assert_eq!(order.remaining(), Money::from_cents(5000));
    }

    #[test]
    fn test_overpaid_order_is_settled() {
        let mut order: Order = serde_json::from_str(STORE_JSON).unwrap();
        order.paid = Money::from_cents(1200);
        assert_eq!(order.remaining(), Money::ZERO);
        assert!(order.is_settled());
        assert_eq!(order.ledger_drift(), Money::from_cents(800));
    }

    #[test]
    fn test_serializes_dates_at_boundary() {
        let payment = Payment {
            id: None,
            date: ymd(2024, 3, 3),
            value: Money::from_cents(400),
        };
        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(json["date"], "2024-03-03T12:00:00.000Z");
        assert_eq!(json["valueCents"], 400);
        assert!(json.get("id").is_none());

        let inst = Installment {
            number: 1,
            due_date: Some(ymd(2024, 4, 30)),
            amount: Money::from_cents(334),
            status: InstallmentStatus::Pending,
        };
        let json = serde_json::to_value(&inst).unwrap();
        assert_eq!(json["dueDate"], "2024-04-30T12:00:00.000Z");
        assert_eq!(json["amountCents"], 334);
        assert_eq!(json["status"], "pendente");
    }
}
