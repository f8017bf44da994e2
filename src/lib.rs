pub mod config;
pub mod dates;
pub mod due;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod money;
pub mod order;
pub mod ranking;
pub mod schedule;
pub mod service;
pub mod store;
pub mod summary;
pub mod types;
pub mod view;

// re-export key types
pub use config::{CurrencyFormat, EngineConfig};
pub use due::{resolve, resolve_at, DueCandidate, DueMode, DueResolution};
pub use errors::{EngineError, Result, StoreError};
pub use events::{Event, EventStore};
pub use ledger::{PaymentDraft, PaymentEntry, PaymentSubmission};
pub use money::Money;
pub use order::{Installment, Order, OrderLine, Payment};
pub use ranking::{rank, sort_orders, UrgencyKey};
pub use schedule::{apply_paid_budget, rebuild_order, InstallmentSchedule, ScheduleRequest};
pub use service::OrderService;
pub use store::{MemoryOrderStore, OrderStore, StoreResult};
pub use summary::PortfolioSummary;
pub use types::{InstallmentStatus, OrderId, PaymentId, SortMode};
pub use view::{BalanceView, InstallmentView, OrderView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
