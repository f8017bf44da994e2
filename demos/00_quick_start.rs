/// quick start - build a schedule and record a payment
use credit_sale_rs::{
    EngineConfig, MemoryOrderStore, Money, Order, OrderService, PaymentDraft, SafeTimeProvider,
    ScheduleRequest, TimeSource,
};
use chrono::{TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap()
    ));

    // a R$ 10,00 order with no schedule yet
    let mut store = MemoryOrderStore::new();
    store.insert(Order {
        id: "order-1".to_string(),
        customer_id: Some("maria".to_string()),
        date: Some(time.now()),
        items: Vec::new(),
        total: Money::from_cents(1000),
        installments: Vec::new(),
        legacy_due_day: None,
        payment_history: Vec::new(),
        paid: Money::ZERO,
    });

    let mut service = OrderService::new(store, EngineConfig::storefront());
    let order = service.load("order-1", &time)?;

    // split into 3 monthly installments
    let request = ScheduleRequest::for_order(&order, 3)
        .with_due_dates(["2024-03-10", "2024-04-10", "2024-05-10"]);
    service.replace_schedule("order-1", &request, &time)?;

    // pay R$ 4,00
    service.add_payment("order-1", &PaymentDraft::from_major_units("4,00", "2024-03-03")?, &time)?;

    if let Some(view) = service.view("order-1", &time) {
        println!("{}", view.to_json_pretty()?);
    }

    Ok(())
}
