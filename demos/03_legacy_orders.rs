/// legacy orders - recurring day-of-month schedules
use credit_sale_rs::{
    resolve, DueResolution, EngineConfig, Money, Order, Payment, ScheduleRequest,
};
use chrono::NaiveDate;

fn describe(resolution: &DueResolution) -> String {
    match resolution.candidate() {
        Some(c) if c.overdue => format!("{} overdue by {} days", c.date, c.days_overdue),
        Some(c) => format!("{} due in {} days", c.date, c.days_until_due),
        None => "nothing due".to_string(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== legacy orders example ===\n");

    let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();

    let mut order: Order = serde_json::from_str(
        r#"{ "id": "old-1", "totalCents": 30000, "installments": null,
             "legacyDueDay": 31, "paymentHistory": [] }"#,
    )?;

    // day 31 clamps to the end of short months
    println!("2023-02-20: {}", describe(&resolve(&order, ymd(2023, 2, 20))));
    println!("2024-04-02: {}", describe(&resolve(&order, ymd(2024, 4, 2))));

    // a payment this month moves the cycle forward
    order.legacy_due_day = Some(10);
    order.payment_history.push(Payment {
        id: Some("p-1".to_string()),
        date: ymd(2024, 3, 3),
        value: Money::from_cents(10000),
    });
    order.paid = order.ledger_total();
    println!("2024-03-15 (paid 03-03): {}", describe(&resolve(&order, ymd(2024, 3, 15))));

    // migrating to explicit installments over what was already paid
    let config = EngineConfig::storefront();
    let request = ScheduleRequest::for_order(&order, 3);
    request.validate(&config)?;
    let migrated = credit_sale_rs::rebuild_order(&order, &request, ymd(2024, 3, 15))?;
    for inst in &migrated.installments {
        println!(
            "  #{} {:?} {} {:?}",
            inst.number,
            inst.due_date,
            inst.amount.format_with(&config.currency),
            inst.status
        );
    }
    println!("now: {}", describe(&resolve(&migrated, ymd(2024, 3, 15))));

    Ok(())
}
