//! Payment gateway seam
//!
//! The hosted gateway is driven through a script loaded at checkout time. The
//! storefront only builds the payment request and receives back the
//! gateway-assigned payment id; card handling never touches this crate.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::Serialize;
use thiserror::Error;

use lienzo::pricing::{PricingError, to_minor_units};

/// Errors reported by the payment gateway.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// The gateway script could not be loaded.
    #[error("failed to load payment gateway: {0}")]
    ScriptLoad(String),

    /// The shopper closed the payment dialog.
    #[error("payment dialog dismissed")]
    Dismissed,

    /// The gateway rejected the payment.
    #[error("payment failed: {0}")]
    Failed(String),
}

/// Details shown pre-filled in the payment dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Prefill {
    /// Shopper name, taken from the shipping address
    pub name: String,

    /// Shopper email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Dialog theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    /// Accent color as a CSS hex string
    pub color: String,
}

/// Payment session opened with the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    /// Publishable merchant key
    pub key: String,

    /// Amount in minor units of `currency`
    pub amount: i64,

    /// ISO currency code
    pub currency: String,

    /// Merchant name shown in the dialog
    pub name: String,

    /// Line shown under the merchant name
    pub description: String,

    /// Pre-filled shopper details
    pub prefill: Prefill,

    /// Dialog theme
    pub theme: Theme,
}

/// Merchant settings shared by every payment request.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantSettings {
    /// Publishable merchant key
    pub key_id: String,

    /// Currency every order is charged in
    pub currency: &'static Currency,

    /// Merchant name shown in the dialog
    pub merchant_name: String,

    /// Payment description
    pub description: String,

    /// Dialog accent color
    pub theme_color: String,
}

impl MerchantSettings {
    /// Build a request charging `total` major units.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] when the total cannot be expressed in minor units.
    pub fn request(&self, total: Decimal, prefill: Prefill) -> Result<PaymentRequest, PricingError> {
        Ok(PaymentRequest {
            key: self.key_id.clone(),
            amount: to_minor_units(total, self.currency)?,
            currency: self.currency.iso_alpha_code.to_string(),
            name: self.merchant_name.clone(),
            description: self.description.clone(),
            prefill,
            theme: Theme {
                color: self.theme_color.clone(),
            },
        })
    }
}

/// Confirmation returned by the gateway on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    /// Gateway-assigned payment id
    pub payment_id: String,
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Load the remote gateway script.
    async fn load(&self) -> Result<(), PaymentError>;

    /// Open the payment dialog and wait for its outcome.
    async fn collect(&self, request: PaymentRequest) -> Result<PaymentConfirmation, PaymentError>;
}
