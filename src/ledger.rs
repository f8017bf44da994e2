use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::errors::{EngineError, Result};
use crate::money::Money;
use crate::order::Payment;

/// payment as entered by a user, not yet validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDraft {
    pub date: String,
    pub value: Money,
}

/// validated payment ready for submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentEntry {
    pub date: NaiveDate,
    pub value: Money,
}

/// payload sent to the store when appending a payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSubmission {
    /// calendar date pinned to the neutral hour in UTC
    pub date: DateTime<Utc>,
    #[serde(rename = "valueCents")]
    pub value: Money,
}

impl PaymentDraft {
    pub fn new(date: impl Into<String>, value: Money) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }

    /// draft from a human-entered amount in currency units, e.g. "19,90"
    pub fn from_major_units(amount: &str, date: impl Into<String>) -> Result<Self> {
        Ok(Self::new(date, Money::from_major_str(amount)?))
    }

    pub fn validate(&self) -> Result<PaymentEntry> {
        let date = dates::parse_calendar_date(&self.date).ok_or_else(|| {
            EngineError::InvalidPaymentDate {
                value: self.date.clone(),
            }
        })?;

        PaymentEntry::new(date, self.value)
    }
}

impl PaymentEntry {
    pub fn new(date: NaiveDate, value: Money) -> Result<Self> {
        if !value.is_positive() {
            return Err(EngineError::InvalidPaymentAmount { amount: value });
        }

        Ok(Self { date, value })
    }

    pub fn to_submission(&self) -> PaymentSubmission {
        PaymentSubmission {
            date: dates::to_boundary(self.date),
            value: self.value,
        }
    }
}

impl PaymentSubmission {
    /// calendar date carried by the submission
    pub fn calendar_date(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

pub fn ledger_total(payments: &[Payment]) -> Money {
    payments.iter().map(|p| p.value).sum()
}

pub fn last_payment_date(payments: &[Payment]) -> Option<NaiveDate> {
    payments.iter().map(|p| p.date).max()
}

/// true when any payment falls in the calendar month of `today`
pub fn has_payment_in_month(payments: &[Payment], today: NaiveDate) -> bool {
    payments.iter().any(|p| dates::same_month(p.date, today))
}
