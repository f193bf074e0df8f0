//! Test Helpers

use std::num::NonZeroU32;

use jiff::Timestamp;
use lienzo::{
    addresses::NewAddress,
    cart::{CartLineItem, CartStore},
    catalog::{Color, ProductId, Size},
    ids::UserId,
    orders::{NewOrder, Order, OrderId, OrderLine, OrderStatus},
    pricing::ShippingPolicy,
};
use rust_decimal::Decimal;

use crate::domain::users::UserProfile;

pub(crate) const UID: &str = "uid-1";

pub(crate) fn line_item(id: u32, quantity: u32) -> CartLineItem {
    CartLineItem {
        id: ProductId::from(id),
        name: format!("Hoodie {id}"),
        price: Decimal::new(1499, 0),
        image: format!("assets/product_mockup/{id}.png"),
        size: Size::M,
        color: Color::Black,
        quantity: NonZeroU32::new(quantity).unwrap_or(NonZeroU32::MIN),
    }
}

pub(crate) fn cart_with(items: impl IntoIterator<Item = CartLineItem>) -> CartStore {
    let mut cart = CartStore::new(ShippingPolicy::default());

    for item in items {
        cart.add_item(item);
    }

    cart
}

pub(crate) fn new_order(status: OrderStatus) -> NewOrder {
    NewOrder::from_cart(
        &cart_with([line_item(1, 1)]),
        UserId::new(UID),
        Some("shopper@example.com".to_string()),
        None,
        status,
    )
}

pub(crate) fn order(id: &str, status: OrderStatus) -> Order {
    Order {
        id: OrderId::new(id),
        user_id: UserId::new(UID),
        user_email: Some("shopper@example.com".to_string()),
        items: vec![OrderLine::from(&line_item(1, 1))],
        total_amount: Decimal::new(1509, 0),
        status,
        created_at: Timestamp::UNIX_EPOCH,
        shipping_address: None,
        payment: None,
    }
}

pub(crate) fn address_form(name: &str) -> NewAddress {
    NewAddress {
        name: name.to_string(),
        line1: "12 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        zip: "560001".to_string(),
        country: "India".to_string(),
        ..NewAddress::default()
    }
}

pub(crate) fn profile() -> UserProfile {
    UserProfile::new(
        UserId::new(UID),
        Some("shopper@example.com".to_string()),
        "Asha",
    )
}

pub(crate) fn profile_with_addresses(names: &[&str]) -> UserProfile {
    let mut profile = profile();

    for name in names {
        _ = profile.addresses.add(address_form(name));
    }

    profile
}
