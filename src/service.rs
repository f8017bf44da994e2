use std::collections::HashMap;

use hourglass_rs::SafeTimeProvider;
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::due::{self, DueResolution};
use crate::errors::{EngineError, Result};
use crate::events::{Event, EventStore};
use crate::ledger::PaymentDraft;
use crate::order::Order;
use crate::ranking;
use crate::schedule::{self, InstallmentSchedule, ScheduleRequest};
use crate::store::OrderStore;
use crate::types::{OrderId, SortMode};
use crate::view::OrderView;

/// order operations against an external store.
///
/// The cache only ever holds snapshots fetched from the store. Every
/// successful mutation discards the cached copy and re-reads it; a failed
/// one leaves the cache exactly as it was.
pub struct OrderService<S: OrderStore> {
    store: S,
    config: EngineConfig,
    cache: HashMap<OrderId, Order>,
    events: EventStore,
}

impl<S: OrderStore> OrderService<S> {
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            cache: HashMap::new(),
            events: EventStore::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    pub fn cached(&self, order_id: &str) -> Option<&Order> {
        self.cache.get(order_id)
    }

    /// fetch an order and cache the snapshot
    pub fn load(&mut self, order_id: &str, time_provider: &SafeTimeProvider) -> Result<Order> {
        self.refresh(order_id, time_provider)
    }

    /// lenient schedule preview; nothing is validated strictly or sent
    pub fn preview_schedule(
        &self,
        request: &ScheduleRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<InstallmentSchedule> {
        InstallmentSchedule::generate(request, self.config.today(time_provider.now()))
    }

    /// rebuild an order's installments and submit the whole order
    pub fn replace_schedule(
        &mut self,
        order_id: &str,
        request: &ScheduleRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<Order> {
        request.validate(&self.config)?;

        // rebuild on the store's current ledger, not on a possibly stale cache
        let current = self.store.fetch_order(order_id)?;
        let today = self.config.today(time_provider.now());
        let rebuilt = schedule::rebuild_order(&current, request, today)?;

        if let Err(e) = self.store.replace_order(&rebuilt) {
            return Err(self.mutation_failed(order_id, "replace_order", e.into(), time_provider));
        }

        info!(
            order_id = %order_id,
            installment_count = request.count,
            total = %request.total,
            "installment schedule replaced"
        );
        self.events.emit(Event::ScheduleReplaced {
            order_id: order_id.to_string(),
            installment_count: request.count,
            total: request.total,
            timestamp: time_provider.now(),
        });

        self.refresh(order_id, time_provider)
    }

    /// validate and append a payment, then re-read the order
    pub fn add_payment(
        &mut self,
        order_id: &str,
        draft: &PaymentDraft,
        time_provider: &SafeTimeProvider,
    ) -> Result<Order> {
        let entry = draft.validate()?;
        let submission = entry.to_submission();

        let payment_id = match self.store.append_payment(order_id, &submission) {
            Ok(id) => id,
            Err(e) => {
                return Err(self.mutation_failed(order_id, "append_payment", e.into(), time_provider))
            }
        };

        info!(
            payment_id = %payment_id,
            order_id = %order_id,
            amount = %entry.value,
            date = %entry.date,
            "payment recorded"
        );
        self.events.emit(Event::PaymentRecorded {
            order_id: order_id.to_string(),
            amount: entry.value,
            payment_date: entry.date,
            timestamp: time_provider.now(),
        });

        self.refresh(order_id, time_provider)
    }

    /// delete a payment by id, then re-read the order
    pub fn remove_payment(
        &mut self,
        order_id: &str,
        payment_id: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<Order> {
        if payment_id.trim().is_empty() {
            return Err(EngineError::MissingPaymentId);
        }

        if let Err(e) = self.store.delete_payment(order_id, payment_id) {
            return Err(self.mutation_failed(order_id, "delete_payment", e.into(), time_provider));
        }

        info!(payment_id = %payment_id, order_id = %order_id, "payment removed");
        self.events.emit(Event::PaymentRemoved {
            order_id: order_id.to_string(),
            payment_id: payment_id.to_string(),
            timestamp: time_provider.now(),
        });

        self.refresh(order_id, time_provider)
    }

    /// next due date of a cached order
    pub fn resolve(&self, order_id: &str, time_provider: &SafeTimeProvider) -> Option<DueResolution> {
        self.cache
            .get(order_id)
            .map(|order| due::resolve_at(order, time_provider, &self.config))
    }

    /// read-time view of a cached order
    pub fn view(&self, order_id: &str, time_provider: &SafeTimeProvider) -> Option<OrderView> {
        let today = self.config.today(time_provider.now());
        self.cache.get(order_id).map(|order| OrderView::build(order, today))
    }

    /// cached orders in the requested order
    pub fn sorted_orders(&self, mode: SortMode, time_provider: &SafeTimeProvider) -> Vec<Order> {
        let orders: Vec<Order> = self.cache.values().cloned().collect();
        ranking::sort_orders(orders, mode, self.config.today(time_provider.now()))
    }

    /// drop the cached snapshot, fetch a fresh one and cache it
    fn refresh(&mut self, order_id: &str, time_provider: &SafeTimeProvider) -> Result<Order> {
        self.cache.remove(order_id);

        let order = self.store.fetch_order(order_id)?;
        let now = time_provider.now();

        let drift = order.ledger_drift();
        if !drift.is_zero() {
            warn!(
                order_id = %order_id,
                paid = %order.paid,
                ledger = %order.ledger_total(),
                "stored paid total disagrees with payment history"
            );
            self.events.emit(Event::LedgerDriftObserved {
                order_id: order_id.to_string(),
                drift,
                timestamp: now,
            });
        }

        self.events.emit(Event::SnapshotRefreshed {
            order_id: order_id.to_string(),
            paid: order.paid,
            remaining: order.remaining(),
            timestamp: now,
        });

        self.cache.insert(order_id.to_string(), order.clone());
        Ok(order)
    }

    fn mutation_failed(
        &mut self,
        order_id: &str,
        operation: &str,
        error: EngineError,
        time_provider: &SafeTimeProvider,
    ) -> EngineError {
        warn!(order_id = %order_id, operation, error = %error, "store mutation failed");
        self.events.emit(Event::MutationFailed {
            order_id: order_id.to_string(),
            operation: operation.to_string(),
            reason: error.to_string(),
            timestamp: time_provider.now(),
        });
        error
    }
}
