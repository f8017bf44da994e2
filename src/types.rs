use serde::{Deserialize, Serialize};

/// identifier assigned to an order by the external store
pub type OrderId = String;

/// identifier assigned to a payment by the external store
pub type PaymentId = String;

/// installment status as persisted by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallmentStatus {
    /// not yet covered by payments
    #[serde(rename = "pendente", alias = "pending")]
    Pending,
    /// covered by the accumulated ledger
    #[serde(rename = "pago", alias = "paga", alias = "paid")]
    Paid,
    /// past due and not covered; only ever derived at read time
    #[serde(rename = "atrasado", alias = "late")]
    Late,
}

impl InstallmentStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, InstallmentStatus::Paid)
    }
}

/// ordering applied to an order list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortMode {
    /// most recent order date first
    #[default]
    Newest,
    /// most urgent collection first
    Urgency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&InstallmentStatus::Pending).unwrap(), "\"pendente\"");
        assert_eq!(serde_json::to_string(&InstallmentStatus::Paid).unwrap(), "\"pago\"");
        assert_eq!(serde_json::to_string(&InstallmentStatus::Late).unwrap(), "\"atrasado\"");
    }

    #[test]
    fn test_status_accepts_alternate_spellings() {
        let paid: InstallmentStatus = serde_json::from_str("\"paga\"").unwrap();
        assert_eq!(paid, InstallmentStatus::Paid);
        let paid: InstallmentStatus = serde_json::from_str("\"paid\"").unwrap();
        assert!(paid.is_paid());
        let late: InstallmentStatus = serde_json::from_str("\"late\"").unwrap();
        assert_eq!(late, InstallmentStatus::Late);
        assert!(serde_json::from_str::<InstallmentStatus>("\"quitado\"").is_err());
    }
}
