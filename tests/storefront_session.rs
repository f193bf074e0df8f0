//! End-to-end session flow over the core crate: browse, fill the cart, place an
//! order and follow its status through fulfilment.

use jiff::tz::TimeZone;
use rust_decimal::Decimal;
use testresult::TestResult;

use lienzo::prelude::*;

#[test]
fn order_lifecycle_drives_notifications_and_analytics() -> TestResult {
    let fixture = Fixture::with_base_path(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"))
        .load_catalog("lienzo")?;

    let mut cart = CartStore::new(ShippingPolicy::default());
    let mut notifications = NotificationStore::new();
    let mut tracker = OrderStatusTracker::new();

    let hoodie = fixture.catalog.require(&ProductId::new("1"))?;
    let shirt = fixture.catalog.require(&ProductId::new("14"))?;

    cart.add_item(hoodie.line_item(Size::M, Color::Black)?);
    cart.add_item(hoodie.line_item(Size::M, Color::Black)?);
    cart.add_item(shirt.line_item(Size::S, Color::White)?);

    assert_eq!(cart.len(), 2);
    assert_eq!(cart.subtotal(), Decimal::new(449_700, 2));
    assert_eq!(cart.total(), Decimal::new(450_700, 2));

    let mut book = AddressBook::default();
    book.add(NewAddress {
        name: "Asha".to_string(),
        line1: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        zip: "560001".to_string(),
        country: "India".to_string(),
        ..NewAddress::default()
    })?;

    let placed = NewOrder::from_cart(
        &cart,
        UserId::new("uid-1"),
        Some("asha@example.com".to_string()),
        book.preferred().cloned(),
        OrderStatus::Paid,
    )
    .with_payment(PaymentRecord::succeeded("pay_1"))
    .into_order(OrderId::new("order-1"));

    cart.clear_cart();

    assert_eq!(cart.total(), Decimal::ZERO);

    let mut current = placed;

    for status in [OrderStatus::Paid, OrderStatus::Shipped, OrderStatus::Delivered] {
        current.status = status;

        for change in tracker.observe(std::slice::from_ref(&current)) {
            change.notify(&mut notifications);
        }
    }

    let messages: Vec<_> = notifications.iter().map(|n| n.message.as_str()).collect();

    assert_eq!(
        messages,
        [
            "Your order has been delivered. Enjoy!",
            "Your order has been shipped and will be arriving soon!",
        ]
    );

    let summary = SalesSummary::from_orders(&[current], &TimeZone::UTC);

    assert_eq!(summary.total_sales, Decimal::new(450_700, 2));
    assert_eq!(summary.delivered_count, 1);

    Ok(())
}
