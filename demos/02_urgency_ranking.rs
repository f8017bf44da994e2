/// urgency ranking - most overdue collections first
use credit_sale_rs::{
    rank, sort_orders, EngineConfig, Installment, InstallmentStatus, Money, Order,
    PortfolioSummary, SafeTimeProvider, SortMode, TimeSource,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};

fn order(id: &str, placed_day: u32, due: NaiveDate, paid: i64) -> Order {
    Order {
        id: id.to_string(),
        customer_id: None,
        date: Utc.with_ymd_and_hms(2024, 1, placed_day, 12, 0, 0).single(),
        items: Vec::new(),
        total: Money::from_cents(1000),
        installments: vec![Installment {
            number: 1,
            due_date: Some(due),
            amount: Money::from_cents(1000),
            status: if paid >= 1000 { InstallmentStatus::Paid } else { InstallmentStatus::Pending },
        }],
        legacy_due_day: None,
        payment_history: Vec::new(),
        paid: Money::from_cents(paid),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== urgency ranking example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 15, 15, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();
    let config = EngineConfig::storefront();
    let ymd = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();

    let orders = vec![
        order("A", 1, ymd(3, 1), 1000),
        order("B", 2, ymd(3, 10), 0),
        order("C", 3, ymd(3, 17), 0),
    ];

    let today = config.today(time.now());
    println!("today: {today}");
    for o in rank(orders.clone(), today) {
        println!("  {}", o.id);
    }

    // a week later C is overdue too, but B still leads
    controller.advance(Duration::days(7));
    let today = config.today(time.now());
    println!("\ntoday: {today}");
    for o in sort_orders(orders.clone(), SortMode::Urgency, today) {
        println!("  {}", o.id);
    }

    println!("\nnewest first:");
    for o in sort_orders(orders.clone(), SortMode::Newest, today) {
        println!("  {}", o.id);
    }

    let summary = PortfolioSummary::from_orders(&orders);
    println!("\n{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
