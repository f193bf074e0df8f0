//! Store Config

use clap::Args;
use lienzo::pricing::{PricingError, ShippingPolicy, find_currency};
use rust_decimal::Decimal;
use rusty_money::iso::Currency;

use crate::payments::MerchantSettings;

/// Pricing and payment settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// ISO 4217 code of the store currency
    #[arg(long, env = "STORE_CURRENCY", default_value = "INR")]
    pub currency: String,

    /// Flat shipping fee charged on non-empty carts, in major units
    #[arg(long, env = "SHIPPING_FEE", default_value = "10")]
    pub shipping_fee: Decimal,

    /// Merchant name shown in the payment dialog
    #[arg(long, env = "MERCHANT_NAME", default_value = "Lienzo")]
    pub merchant_name: String,

    /// Publishable payment gateway key
    #[arg(long, env = "PAYMENT_KEY_ID", default_value = "", hide_env_values = true)]
    pub payment_key_id: String,

    /// Description shown in the payment dialog
    #[arg(long, env = "PAYMENT_DESCRIPTION", default_value = "Order Payment")]
    pub payment_description: String,

    /// Payment dialog accent color
    #[arg(long, env = "PAYMENT_THEME_COLOR", default_value = "#facc15")]
    pub theme_color: String,
}

impl StoreConfig {
    /// The configured store currency.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::UnknownCurrency`] for an unrecognised code.
    pub fn currency(&self) -> Result<&'static Currency, PricingError> {
        find_currency(&self.currency)
    }

    /// Shipping charged on carts.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Negative`] when the fee is below zero.
    pub fn shipping_policy(&self) -> Result<ShippingPolicy, PricingError> {
        if self.shipping_fee.is_sign_negative() {
            return Err(PricingError::Negative(self.shipping_fee));
        }

        Ok(ShippingPolicy::flat(self.shipping_fee))
    }

    /// Settings passed to the payment gateway.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::UnknownCurrency`] for an unrecognised currency code.
    pub fn merchant_settings(&self) -> Result<MerchantSettings, PricingError> {
        Ok(MerchantSettings {
            key_id: self.payment_key_id.clone(),
            currency: self.currency()?,
            merchant_name: self.merchant_name.clone(),
            description: self.payment_description.clone(),
            theme_color: self.theme_color.clone(),
        })
    }
}
