/// payment ledger - validation, store failures and refetch after mutation
use credit_sale_rs::{
    EngineConfig, EngineError, Installment, InstallmentStatus, MemoryOrderStore, Money, Order,
    OrderService, PaymentDraft, SafeTimeProvider, StoreError, TimeSource,
};
use chrono::{NaiveDate, TimeZone, Utc};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(true))
        .init();

    println!("=== payment ledger example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 15, 15, 0, 0).unwrap()
    ));
    let config = EngineConfig::storefront();

    let installments = [(1, 10, 3), (2, 10, 4)]
        .into_iter()
        .map(|(number, day, month)| Installment {
            number,
            due_date: NaiveDate::from_ymd_opt(2024, month, day),
            amount: Money::from_cents(2500),
            status: InstallmentStatus::Pending,
        })
        .collect();

    let mut store = MemoryOrderStore::new();
    store.insert(Order {
        id: "order-7".to_string(),
        customer_id: Some("joao".to_string()),
        date: None,
        items: Vec::new(),
        total: Money::from_cents(5000),
        installments,
        legacy_due_day: None,
        payment_history: Vec::new(),
        paid: Money::ZERO,
    });

    let mut service = OrderService::new(store, config.clone());
    service.load("order-7", &time)?;

    // zero payments never reach the store
    match service.add_payment("order-7", &PaymentDraft::new("2024-03-15", Money::ZERO), &time) {
        Err(e) if e.is_validation() => println!("rejected locally: {e}"),
        other => println!("unexpected: {other:?}"),
    }
    println!("store calls so far: {}", service.store().call_count());

    // a store outage leaves the cached snapshot as it was
    service.store().fail_next(StoreError::Unavailable {
        message: "connection reset".to_string(),
    });
    let draft = PaymentDraft::from_major_units("25,00", "2024-03-12")?;
    if let Err(EngineError::Remote(e)) = service.add_payment("order-7", &draft, &time) {
        println!("store failed: {e}");
    }

    // retry succeeds and the store's totals come back
    let order = service.add_payment("order-7", &draft, &time)?;
    println!(
        "paid {} of {}, remaining {}",
        order.paid.format_with(&config.currency),
        order.total.format_with(&config.currency),
        order.remaining().format_with(&config.currency),
    );

    // undo it
    if let Some(payment_id) = order.payment_history.first().and_then(|p| p.id.clone()) {
        let order = service.remove_payment("order-7", &payment_id, &time)?;
        println!("after removal: paid {}", order.paid.format_with(&config.currency));
    }

    println!("\nevents:");
    for event in service.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
