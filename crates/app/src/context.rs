//! App Context

use std::sync::Arc;

use lienzo::{
    cart::CartStore,
    fixtures::FixtureError,
    pricing::{PricingError, ShippingPolicy},
};
use thiserror::Error;

use crate::{
    auth::{AuthProvider, AuthSession},
    checkout::CheckoutFlow,
    config::StoreConfig,
    domain::{
        orders::{DocumentOrdersService, OrdersRepository, OrdersService},
        products::{DocumentProductsService, ProductsRepository, ProductsService},
        users::UsersRepository,
    },
    observability::ObservabilityError,
    payments::{MerchantSettings, PaymentGateway},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid configuration")]
    Config(#[from] clap::Error),

    #[error("invalid store settings")]
    Pricing(#[from] PricingError),

    #[error("failed to load catalog")]
    Fixture(#[from] FixtureError),

    #[error("failed to initialise logging")]
    Observability(#[from] ObservabilityError),
}

/// External collaborators the storefront runs against.
#[derive(Clone)]
pub struct Collaborators {
    pub auth: Arc<dyn AuthProvider>,
    pub users: Arc<dyn UsersRepository>,
    pub orders: Arc<dyn OrdersRepository>,
    pub products: Arc<dyn ProductsRepository>,
    pub payments: Arc<dyn PaymentGateway>,
}

/// Shared services plus the settings needed to open per-session state.
#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthProvider>,
    pub users: Arc<dyn UsersRepository>,
    pub orders: Arc<dyn OrdersService>,
    pub products: Arc<dyn ProductsService>,
    pub payments: Arc<dyn PaymentGateway>,
    merchant: MerchantSettings,
    shipping: ShippingPolicy,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("merchant", &self.merchant)
            .field("shipping", &self.shipping)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context over the given collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error when the store currency or shipping fee is invalid.
    pub fn new(collaborators: Collaborators, store: &StoreConfig) -> Result<Self, AppError> {
        Ok(Self {
            auth: collaborators.auth,
            users: collaborators.users,
            orders: Arc::new(DocumentOrdersService::new(collaborators.orders)),
            products: Arc::new(DocumentProductsService::new(collaborators.products)),
            payments: collaborators.payments,
            merchant: store.merchant_settings()?,
            shipping: store.shipping_policy()?,
        })
    }

    pub fn merchant(&self) -> &MerchantSettings {
        &self.merchant
    }

    /// An empty cart charging the configured shipping.
    pub fn cart(&self) -> CartStore {
        CartStore::new(self.shipping)
    }

    /// A signed-out session.
    pub fn auth_session(&self) -> AuthSession {
        AuthSession::new(Arc::clone(&self.auth), Arc::clone(&self.users))
    }

    /// A fresh checkout attempt.
    pub fn checkout(&self) -> CheckoutFlow {
        CheckoutFlow::new(
            Arc::clone(&self.orders),
            Arc::clone(&self.users),
            Arc::clone(&self.payments),
            self.merchant.clone(),
        )
    }
}
