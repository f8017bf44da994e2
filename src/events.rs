use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{OrderId, PaymentId};

/// all events that can be emitted by the order service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // schedule events
    ScheduleReplaced {
        order_id: OrderId,
        installment_count: u32,
        total: Money,
        timestamp: DateTime<Utc>,
    },

    // ledger events
    PaymentRecorded {
        order_id: OrderId,
        amount: Money,
        payment_date: NaiveDate,
        timestamp: DateTime<Utc>,
    },
    PaymentRemoved {
        order_id: OrderId,
        payment_id: PaymentId,
        timestamp: DateTime<Utc>,
    },

    // snapshot events
    SnapshotRefreshed {
        order_id: OrderId,
        paid: Money,
        remaining: Money,
        timestamp: DateTime<Utc>,
    },
    LedgerDriftObserved {
        order_id: OrderId,
        /// cached paid total minus the ledger sum
        drift: Money,
        timestamp: DateTime<Utc>,
    },
    MutationFailed {
        order_id: OrderId,
        operation: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl Event {
    pub fn order_id(&self) -> &OrderId {
        match self {
            Event::ScheduleReplaced { order_id, .. }
            | Event::PaymentRecorded { order_id, .. }
            | Event::PaymentRemoved { order_id, .. }
            | Event::SnapshotRefreshed { order_id, .. }
            | Event::LedgerDriftObserved { order_id, .. }
            | Event::MutationFailed { order_id, .. } => order_id,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
