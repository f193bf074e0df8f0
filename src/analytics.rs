//! Sales Analytics

use std::collections::BTreeMap;

use jiff::{civil::Date, tz::TimeZone};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::orders::{Order, OrderStatus};

/// Dashboard figures derived from every stored order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SalesSummary {
    /// Sum of order totals, cancelled orders excluded
    pub total_sales: Decimal,

    /// Number of orders, cancelled included
    pub order_count: usize,

    /// Number of delivered orders
    pub delivered_count: usize,

    /// Non-cancelled sales per calendar day in the reporting time zone
    pub sales_by_day: BTreeMap<Date, Decimal>,
}

impl SalesSummary {
    /// Summarise `orders`, bucketing days in `tz`.
    pub fn from_orders(orders: &[Order], tz: &TimeZone) -> Self {
        orders.iter().fold(Self::default(), |mut summary, order| {
            summary.order_count += 1;

            if order.status == OrderStatus::Delivered {
                summary.delivered_count += 1;
            }

            if order.status != OrderStatus::Cancelled {
                summary.total_sales += order.total_amount;

                let day = order.created_at.to_zoned(tz.clone()).date();

                *summary.sales_by_day.entry(day).or_default() += order.total_amount;
            }

            summary
        })
    }
}
