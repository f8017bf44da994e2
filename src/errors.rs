use thiserror::Error;

use crate::money::Money;
use crate::types::{OrderId, PaymentId};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid installment count: {count}")]
    InvalidInstallmentCount {
        count: u32,
    },

    #[error("installment count {count} is not offered: allowed {offered:?}")]
    InstallmentCountNotOffered {
        count: u32,
        offered: Vec<u32>,
    },

    #[error("order total cannot be negative: {total}")]
    NegativeTotal {
        total: Money,
    },

    #[error("due date count mismatch: expected {expected}, provided {provided}")]
    DueDateCountMismatch {
        expected: u32,
        provided: usize,
    },

    #[error("missing due date for installment {installment}")]
    MissingDueDate {
        installment: u32,
    },

    #[error("invalid due date for installment {installment}: {value}")]
    InvalidDueDate {
        installment: u32,
        value: String,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("invalid payment date: {value}")]
    InvalidPaymentDate {
        value: String,
    },

    #[error("invalid amount: {input}")]
    InvalidAmount {
        input: String,
    },

    #[error("ambiguous amount, thousands or decimal separator: {input}")]
    AmbiguousAmount {
        input: String,
    },

    #[error("payment id required to remove a payment")]
    MissingPaymentId,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("remote store failure: {0}")]
    Remote(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// true for errors raised before any store call
    pub fn is_validation(&self) -> bool {
        !matches!(self, EngineError::Remote(_) | EngineError::Serialization(_))
    }
}

/// failures reported by the external order store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("order not found: {id}")]
    NotFound {
        id: OrderId,
    },

    #[error("payment {payment_id} not found on order {order_id}")]
    PaymentNotFound {
        order_id: OrderId,
        payment_id: PaymentId,
    },

    #[error("store unavailable: {message}")]
    Unavailable {
        message: String,
    },

    #[error("store rejected request ({status}): {message}")]
    Rejected {
        status: u16,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
