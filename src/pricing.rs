//! Pricing

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Findable, Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Flat shipping fee charged on a non-empty cart, in major units.
pub const DEFAULT_SHIPPING_FEE: Decimal = Decimal::TEN;

/// Errors raised while converting or parsing amounts.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The amount overflows when expressed in minor units.
    #[error("amount {0} cannot be expressed in minor units")]
    Unrepresentable(Decimal),

    /// Prices must be zero or positive.
    #[error("negative amount: {0}")]
    Negative(Decimal),

    /// The currency code is not an ISO currency.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The price string is not `AMOUNT CURRENCY`.
    #[error("invalid price format: {0}")]
    InvalidPrice(String),
}

/// Convert a major-unit amount into the minor units of `currency` (e.g. rupees
/// into paise). Half units round to even.
///
/// # Errors
///
/// Returns [`PricingError::Unrepresentable`] when the result does not fit an `i64`.
pub fn to_minor_units(amount: Decimal, currency: &Currency) -> Result<i64, PricingError> {
    10_i64
        .checked_pow(currency.exponent)
        .and_then(|scale| amount.checked_mul(Decimal::from(scale)))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or(PricingError::Unrepresentable(amount))
}

/// Express a major-unit amount as money in the given currency.
///
/// # Errors
///
/// Returns [`PricingError::Unrepresentable`] when the amount overflows minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    Ok(Money::from_minor(to_minor_units(amount, currency)?, currency))
}

/// Look up an ISO currency by its alpha code.
///
/// # Errors
///
/// Returns [`PricingError::UnknownCurrency`] for codes that are not ISO currencies.
pub fn find_currency(code: &str) -> Result<&'static Currency, PricingError> {
    Currency::find(code).ok_or_else(|| PricingError::UnknownCurrency(code.to_string()))
}

/// Parse a price written as `AMOUNT CURRENCY`, e.g. `1499.00 INR`.
///
/// # Errors
///
/// Returns an error when the format is wrong, the amount is negative or the currency
/// is unknown.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), PricingError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PricingError::InvalidPrice(format!(
            "expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| PricingError::InvalidPrice(s.to_string()))?;

    if amount.is_sign_negative() {
        return Err(PricingError::Negative(amount));
    }

    Ok((amount, find_currency(code)?))
}

/// Shipping charged on a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    flat_fee: Decimal,
}

impl ShippingPolicy {
    /// A flat fee charged whenever the cart holds at least one line.
    pub const fn flat(flat_fee: Decimal) -> Self {
        Self { flat_fee }
    }

    /// The configured flat fee.
    pub const fn flat_fee(&self) -> Decimal {
        self.flat_fee
    }

    /// Shipping due for a cart with `lines` distinct lines.
    pub fn fee_for(&self, lines: usize) -> Decimal {
        if lines == 0 {
            Decimal::ZERO
        } else {
            self.flat_fee
        }
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self::flat(DEFAULT_SHIPPING_FEE)
    }
}
