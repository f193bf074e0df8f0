//! Checkout
//!
//! Drives one checkout attempt from address selection through payment to the
//! stored order:
//!
//! ```text
//! Idle -> AddressSelection -> PaymentInProgress -> PaymentSucceeded -> OrderPersisted
//!                                               \-> PaymentFailed
//!                             PaymentSucceeded  ---> PersistenceFailed
//! ```
//!
//! Nothing about an attempt is persisted until the order itself is written. A
//! failed step leaves the flow in a terminal state; the shopper restarts with
//! [`CheckoutFlow::begin`].

use std::sync::Arc;

use lienzo::{
    addresses::{Address, AddressError, AddressId, NewAddress},
    cart::CartStore,
    orders::{NewOrder, Order, OrderStatus, PaymentRecord},
    pricing::PricingError,
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    database::DatabaseError,
    domain::{
        orders::{OrdersService, OrdersServiceError},
        users::{UserProfile, UsersRepository},
    },
    payments::{MerchantSettings, PaymentError, PaymentGateway, Prefill},
};

/// Shown after a paid order is stored.
pub const PAID_ORDER_MESSAGE: &str = "Payment successful! Order placed.";

/// Shown after a pending order is stored.
pub const PENDING_ORDER_MESSAGE: &str = "Order placed successfully!";

/// Where a checkout attempt currently stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CheckoutState {
    /// No attempt in progress.
    #[default]
    Idle,

    /// Waiting for the shopper to pick or add a shipping address.
    AddressSelection,

    /// The gateway dialog is open.
    PaymentInProgress,

    /// The gateway captured the payment; the order is being written.
    PaymentSucceeded {
        /// Gateway-assigned payment id
        payment_id: String,
    },

    /// The order was written and the cart cleared.
    OrderPersisted {
        /// The stored order
        order: Order,
    },

    /// The gateway could not be loaded or the payment did not complete.
    PaymentFailed {
        /// Why the payment failed
        reason: String,
    },

    /// The payment was captured but the order could not be written.
    PersistenceFailed {
        /// Payment that has no stored order
        payment_id: String,
        /// Why the write failed
        reason: String,
    },
}

impl CheckoutState {
    /// Whether the attempt has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::OrderPersisted { .. } | Self::PaymentFailed { .. } | Self::PersistenceFailed { .. }
        )
    }
}

/// Checkout failures.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    #[error("no signed-in profile")]
    NotSignedIn,

    #[error("cart is empty")]
    EmptyCart,

    #[error("no shipping address selected")]
    NoAddressSelected,

    #[error("checkout step not allowed while {0}")]
    InvalidState(&'static str),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("failed to save addresses")]
    SaveAddresses(#[source] DatabaseError),

    #[error("payment gateway unavailable")]
    GatewayUnavailable(#[source] PaymentError),

    #[error("payment not completed")]
    Payment(#[source] PaymentError),

    #[error("order total cannot be charged")]
    Pricing(#[from] PricingError),

    #[error("payment {payment_id} captured but order not saved")]
    Persistence {
        /// Payment that has no stored order
        payment_id: String,
        /// Underlying failure
        #[source]
        source: OrdersServiceError,
    },

    #[error("failed to place order")]
    PlaceOrder(#[source] OrdersServiceError),
}

impl CheckoutError {
    /// Text shown in the checkout page's error field.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotSignedIn => "You must be logged in to place an order.".to_string(),
            Self::EmptyCart => "Your cart is empty.".to_string(),
            Self::NoAddressSelected => "Please select a shipping address.".to_string(),
            Self::InvalidState(_) => "Checkout is already in progress.".to_string(),
            Self::Address(error) => error.to_string(),
            Self::SaveAddresses(_) => "Failed to save address.".to_string(),
            Self::GatewayUnavailable(_) => "Failed to load payment gateway.".to_string(),
            Self::Payment(PaymentError::Dismissed) => "Payment was cancelled.".to_string(),
            Self::Payment(_) | Self::Pricing(_) => {
                "Payment was not completed. Please try again.".to_string()
            }
            Self::Persistence { .. } => "Failed to save order after payment.".to_string(),
            Self::PlaceOrder(_) => "Failed to place order. Please try again.".to_string(),
        }
    }
}

/// One shopper's checkout attempt.
pub struct CheckoutFlow {
    orders: Arc<dyn OrdersService>,
    users: Arc<dyn UsersRepository>,
    gateway: Arc<dyn PaymentGateway>,
    merchant: MerchantSettings,
    state: CheckoutState,
    customer: Option<UserProfile>,
    selected: Option<AddressId>,
    error: Option<String>,
    success: Option<&'static str>,
}

impl std::fmt::Debug for CheckoutFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutFlow")
            .field("state", &self.state)
            .field("selected", &self.selected)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl CheckoutFlow {
    pub fn new(
        orders: Arc<dyn OrdersService>,
        users: Arc<dyn UsersRepository>,
        gateway: Arc<dyn PaymentGateway>,
        merchant: MerchantSettings,
    ) -> Self {
        Self {
            orders,
            users,
            gateway,
            merchant,
            state: CheckoutState::Idle,
            customer: None,
            selected: None,
            error: None,
            success: None,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Message from the last failed step.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Message from the last completed order.
    pub fn success(&self) -> Option<&str> {
        self.success
    }

    /// The customer's saved addresses.
    pub fn addresses(&self) -> &[Address] {
        self.customer
            .as_ref()
            .map(|customer| customer.addresses.addresses())
            .unwrap_or_default()
    }

    /// The address the order will ship to.
    pub fn selected_address(&self) -> Option<&Address> {
        let id = self.selected?;

        self.customer.as_ref()?.addresses.get(id)
    }

    /// Start a new attempt for `profile`, discarding any finished one.
    ///
    /// The default address, or else the first saved one, is preselected.
    ///
    /// # Errors
    ///
    /// Fails when nobody is signed in, the cart is empty or a payment is in
    /// progress.
    pub fn begin(
        &mut self,
        profile: Option<&UserProfile>,
        cart: &CartStore,
    ) -> Result<(), CheckoutError> {
        if self.state == CheckoutState::PaymentInProgress {
            return Err(self.reject(CheckoutError::InvalidState("a payment is in progress")));
        }

        self.error = None;
        self.success = None;

        let Some(profile) = profile else {
            return Err(self.reject(CheckoutError::NotSignedIn));
        };

        if cart.is_empty() {
            return Err(self.reject(CheckoutError::EmptyCart));
        }

        self.selected = profile.addresses.preferred().map(|address| address.id);
        self.customer = Some(profile.clone());
        self.state = CheckoutState::AddressSelection;

        Ok(())
    }

    /// Ship to a saved address.
    ///
    /// # Errors
    ///
    /// Fails outside address selection or when the id is not a saved address.
    pub fn select_address(&mut self, id: AddressId) -> Result<(), CheckoutError> {
        self.require_address_selection()?;

        if self.addresses().iter().all(|address| address.id != id) {
            return Err(self.reject(CheckoutError::Address(AddressError::NotFound(id))));
        }

        self.selected = Some(id);

        Ok(())
    }

    /// Save a new address as the customer's default and ship to it.
    ///
    /// # Errors
    ///
    /// Fails outside address selection, when a required field is blank, or
    /// when the address list cannot be saved.
    pub async fn add_address(&mut self, address: NewAddress) -> Result<AddressId, CheckoutError> {
        self.require_address_selection()?;

        let Some(customer) = self.customer.as_ref() else {
            return Err(self.reject(CheckoutError::NotSignedIn));
        };

        let uid = customer.uid.clone();
        let mut book = customer.addresses.clone();

        let id = match book.add(NewAddress {
            is_default: true,
            ..address
        }) {
            Ok(id) => id,
            Err(error) => return Err(self.reject(error.into())),
        };

        if let Err(error) = self.users.set_addresses(&uid, book.addresses().to_vec()).await {
            return Err(self.reject(CheckoutError::SaveAddresses(error)));
        }

        if let Some(customer) = self.customer.as_mut() {
            customer.addresses = book;
        }

        self.selected = Some(id);

        Ok(id)
    }

    /// Abandon the attempt.
    pub fn cancel(&mut self) {
        self.state = CheckoutState::Idle;
        self.customer = None;
        self.selected = None;
    }

    /// Charge the cart total through the gateway, then store a paid order and
    /// clear the cart.
    ///
    /// # Errors
    ///
    /// Fails when no address is selected, the gateway cannot be loaded, the
    /// payment does not complete, or the order cannot be written after payment.
    /// The returned error's [`CheckoutError::user_message`] is also kept in
    /// [`Self::error`].
    pub async fn confirm_and_pay(&mut self, cart: &mut CartStore) -> Result<Order, CheckoutError> {
        let (customer, address) = self.ready_to_order(cart)?;

        self.state = CheckoutState::PaymentInProgress;

        if let Err(error) = self.gateway.load().await {
            return Err(self.payment_failed(CheckoutError::GatewayUnavailable(error)));
        }

        let prefill = Prefill {
            name: address.name.clone(),
            email: customer.email.clone(),
        };

        let request = match self.merchant.request(cart.total(), prefill) {
            Ok(request) => request,
            Err(error) => return Err(self.payment_failed(error.into())),
        };

        let confirmation = match self.gateway.collect(request).await {
            Ok(confirmation) => confirmation,
            Err(error) => return Err(self.payment_failed(CheckoutError::Payment(error))),
        };

        let payment_id = confirmation.payment_id;

        info!(payment_id = %payment_id, "payment captured");

        self.state = CheckoutState::PaymentSucceeded {
            payment_id: payment_id.clone(),
        };

        let order = NewOrder::from_cart(
            cart,
            customer.uid,
            customer.email,
            Some(address),
            OrderStatus::Paid,
        )
        .with_payment(PaymentRecord::succeeded(payment_id.clone()));

        match self.orders.place_order(order).await {
            Ok(order) => Ok(self.persisted(order, cart, PAID_ORDER_MESSAGE)),
            Err(source) => {
                error!(payment_id = %payment_id, error = %source, "order not saved after payment");

                let failure = CheckoutError::Persistence {
                    payment_id: payment_id.clone(),
                    source,
                };

                self.state = CheckoutState::PersistenceFailed {
                    payment_id,
                    reason: failure.to_string(),
                };

                Err(self.reject(failure))
            }
        }
    }

    /// Store a pending order for the selected address without taking payment,
    /// then clear the cart.
    ///
    /// # Errors
    ///
    /// Fails when no address is selected or the order cannot be written.
    pub async fn place_pending_order(&mut self, cart: &mut CartStore) -> Result<Order, CheckoutError> {
        let (customer, address) = self.ready_to_order(cart)?;

        let order = NewOrder::from_cart(
            cart,
            customer.uid,
            customer.email,
            Some(address),
            OrderStatus::Pending,
        );

        match self.orders.place_order(order).await {
            Ok(order) => Ok(self.persisted(order, cart, PENDING_ORDER_MESSAGE)),
            Err(source) => Err(self.reject(CheckoutError::PlaceOrder(source))),
        }
    }

    fn ready_to_order(&mut self, cart: &CartStore) -> Result<(UserProfile, Address), CheckoutError> {
        self.require_address_selection()?;

        self.error = None;

        let Some(customer) = self.customer.clone() else {
            return Err(self.reject(CheckoutError::NotSignedIn));
        };

        if cart.is_empty() {
            return Err(self.reject(CheckoutError::EmptyCart));
        }

        let Some(address) = self.selected_address().cloned() else {
            return Err(self.reject(CheckoutError::NoAddressSelected));
        };

        Ok((customer, address))
    }

    fn require_address_selection(&mut self) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::AddressSelection => Ok(()),
            CheckoutState::Idle => Err(self.reject(CheckoutError::InvalidState("idle"))),
            CheckoutState::PaymentInProgress | CheckoutState::PaymentSucceeded { .. } => {
                Err(self.reject(CheckoutError::InvalidState("a payment is in progress")))
            }
            CheckoutState::OrderPersisted { .. }
            | CheckoutState::PaymentFailed { .. }
            | CheckoutState::PersistenceFailed { .. } => {
                Err(self.reject(CheckoutError::InvalidState("finished")))
            }
        }
    }

    fn persisted(&mut self, order: Order, cart: &mut CartStore, message: &'static str) -> Order {
        info!(order = %order.id, status = %order.status, "order placed");

        cart.clear_cart();

        self.success = Some(message);
        self.state = CheckoutState::OrderPersisted {
            order: order.clone(),
        };

        order
    }

    fn payment_failed(&mut self, failure: CheckoutError) -> CheckoutError {
        self.state = CheckoutState::PaymentFailed {
            reason: failure.to_string(),
        };

        self.reject(failure)
    }

    fn reject(&mut self, failure: CheckoutError) -> CheckoutError {
        warn!(error = %failure, "checkout step failed");

        self.error = Some(failure.user_message());

        failure
    }
}

#[cfg(test)]
mod tests {
    use lienzo::{ids::UserId, orders::OrderId};
    use rust_decimal::Decimal;
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::{
        database::{DatabaseError, ORDERS_COLLECTION},
        domain::{orders::MockOrdersService, users::MockUsersRepository},
        payments::{MockPaymentGateway, PaymentConfirmation},
        test::helpers::{address_form, cart_with, line_item, profile, profile_with_addresses},
    };

    use super::*;

    fn merchant() -> MerchantSettings {
        MerchantSettings {
            key_id: "rzp_test_key".to_string(),
            currency: iso::INR,
            merchant_name: "Lienzo".to_string(),
            description: "Order Payment".to_string(),
            theme_color: "#facc15".to_string(),
        }
    }

    fn flow(
        orders: MockOrdersService,
        users: MockUsersRepository,
        gateway: MockPaymentGateway,
    ) -> CheckoutFlow {
        CheckoutFlow::new(Arc::new(orders), Arc::new(users), Arc::new(gateway), merchant())
    }

    fn stored(order: NewOrder) -> Result<Order, OrdersServiceError> {
        Ok(order.into_order(OrderId::new("o1")))
    }

    fn working_gateway() -> MockPaymentGateway {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_load().once().returning(|| Ok(()));
        gateway
            .expect_collect()
            .once()
            .withf(|request| request.amount == 150_900 && request.prefill.name == "Home")
            .returning(|_| {
                Ok(PaymentConfirmation {
                    payment_id: "pay_1".to_string(),
                })
            });

        gateway
    }

    #[test]
    fn begin_requires_a_signed_in_profile() {
        let mut flow = flow(
            MockOrdersService::new(),
            MockUsersRepository::new(),
            MockPaymentGateway::new(),
        );

        let result = flow.begin(None, &cart_with([line_item(1, 1)]));

        assert_eq!(result, Err(CheckoutError::NotSignedIn));
        assert_eq!(flow.error(), Some("You must be logged in to place an order."));
        assert_eq!(flow.state(), &CheckoutState::Idle);
    }

    #[test]
    fn begin_rejects_an_empty_cart() {
        let mut flow = flow(
            MockOrdersService::new(),
            MockUsersRepository::new(),
            MockPaymentGateway::new(),
        );

        let result = flow.begin(Some(&profile()), &cart_with([]));

        assert_eq!(result, Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn begin_preselects_the_default_address() -> TestResult {
        let mut flow = flow(
            MockOrdersService::new(),
            MockUsersRepository::new(),
            MockPaymentGateway::new(),
        );

        flow.begin(
            Some(&profile_with_addresses(&["Home", "Work"])),
            &cart_with([line_item(1, 1)]),
        )?;

        assert_eq!(flow.state(), &CheckoutState::AddressSelection);
        assert_eq!(flow.selected_address().map(|a| a.name.as_str()), Some("Home"));

        let work = flow
            .addresses()
            .iter()
            .find(|address| address.name == "Work")
            .map(|address| address.id)
            .ok_or("work address missing")?;

        flow.select_address(work)?;

        assert_eq!(flow.selected_address().map(|a| a.name.as_str()), Some("Work"));

        Ok(())
    }

    #[test]
    fn select_address_rejects_unknown_ids() -> TestResult {
        let mut flow = flow(
            MockOrdersService::new(),
            MockUsersRepository::new(),
            MockPaymentGateway::new(),
        );

        flow.begin(Some(&profile_with_addresses(&["Home"])), &cart_with([line_item(1, 1)]))?;

        let missing = AddressId::new();
        let result = flow.select_address(missing);

        assert_eq!(
            result,
            Err(CheckoutError::Address(AddressError::NotFound(missing)))
        );
        assert_eq!(flow.selected_address().map(|a| a.name.as_str()), Some("Home"));

        Ok(())
    }

    #[tokio::test]
    async fn add_address_saves_it_as_the_selected_default() -> TestResult {
        let mut users = MockUsersRepository::new();

        users
            .expect_set_addresses()
            .once()
            .withf(|uid, addresses| {
                uid.as_str() == "uid-1"
                    && addresses.len() == 2
                    && addresses
                        .iter()
                        .filter(|address| address.is_default)
                        .all(|address| address.name == "Work")
            })
            .returning(|_, _| Ok(()));

        let mut flow = flow(MockOrdersService::new(), users, MockPaymentGateway::new());

        flow.begin(Some(&profile_with_addresses(&["Home"])), &cart_with([line_item(1, 1)]))?;

        let id = flow.add_address(address_form("Work")).await?;

        let selected = flow.selected_address();

        assert_eq!(selected.map(|address| address.id), Some(id));
        assert_eq!(selected.map(|address| address.is_default), Some(true));

        Ok(())
    }

    #[tokio::test]
    async fn add_address_keeps_local_book_when_save_fails() -> TestResult {
        let mut users = MockUsersRepository::new();

        users
            .expect_set_addresses()
            .once()
            .returning(|_, _| Err(DatabaseError::Unavailable("offline".to_string())));

        let mut flow = flow(MockOrdersService::new(), users, MockPaymentGateway::new());

        flow.begin(Some(&profile()), &cart_with([line_item(1, 1)]))?;

        let result = flow.add_address(address_form("Home")).await;

        assert!(
            matches!(result, Err(CheckoutError::SaveAddresses(_))),
            "expected SaveAddresses, got {result:?}"
        );
        assert!(flow.addresses().is_empty());
        assert!(flow.selected_address().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn add_address_rejects_blank_fields_without_saving() -> TestResult {
        let mut users = MockUsersRepository::new();

        users.expect_set_addresses().never();

        let mut flow = flow(MockOrdersService::new(), users, MockPaymentGateway::new());

        flow.begin(Some(&profile()), &cart_with([line_item(1, 1)]))?;

        let result = flow
            .add_address(NewAddress {
                zip: String::new(),
                ..address_form("Home")
            })
            .await;

        assert_eq!(
            result,
            Err(CheckoutError::Address(AddressError::MissingField("zip")))
        );

        Ok(())
    }

    #[tokio::test]
    async fn confirm_and_pay_stores_a_paid_order_and_clears_the_cart() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .withf(|order| {
                order.status == OrderStatus::Paid
                    && order.total_amount == Decimal::new(1509, 0)
                    && order.user_id == UserId::new("uid-1")
                    && order.payment.as_ref().map(|p| p.payment_id.as_str()) == Some("pay_1")
                    && order.shipping_address.as_ref().map(|a| a.name.as_str()) == Some("Home")
            })
            .returning(stored);

        let mut flow = flow(orders, MockUsersRepository::new(), working_gateway());
        let mut cart = cart_with([line_item(1, 1)]);

        flow.begin(Some(&profile_with_addresses(&["Home"])), &cart)?;

        let order = flow.confirm_and_pay(&mut cart).await?;

        assert_eq!(order.id, OrderId::new("o1"));
        assert!(cart.is_empty());
        assert_eq!(flow.success(), Some(PAID_ORDER_MESSAGE));
        assert_eq!(flow.state(), &CheckoutState::OrderPersisted { order });

        Ok(())
    }

    #[tokio::test]
    async fn confirm_and_pay_requires_an_address() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_load().never();
        gateway.expect_collect().never();

        let mut flow = flow(MockOrdersService::new(), MockUsersRepository::new(), gateway);
        let mut cart = cart_with([line_item(1, 1)]);

        flow.begin(Some(&profile()), &cart)?;

        let result = flow.confirm_and_pay(&mut cart).await;

        assert_eq!(result, Err(CheckoutError::NoAddressSelected));
        assert_eq!(flow.error(), Some("Please select a shipping address."));
        assert_eq!(flow.state(), &CheckoutState::AddressSelection);
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn gateway_load_failure_leaves_cart_untouched() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_load()
            .once()
            .returning(|| Err(PaymentError::ScriptLoad("timeout".to_string())));
        gateway.expect_collect().never();

        let mut orders = MockOrdersService::new();

        orders.expect_place_order().never();

        let mut flow = flow(orders, MockUsersRepository::new(), gateway);
        let mut cart = cart_with([line_item(1, 1)]);

        flow.begin(Some(&profile_with_addresses(&["Home"])), &cart)?;

        let result = flow.confirm_and_pay(&mut cart).await;

        assert!(
            matches!(result, Err(CheckoutError::GatewayUnavailable(_))),
            "expected GatewayUnavailable, got {result:?}"
        );
        assert_eq!(flow.error(), Some("Failed to load payment gateway."));
        assert!(
            matches!(flow.state(), CheckoutState::PaymentFailed { .. }),
            "expected PaymentFailed, got {:?}",
            flow.state()
        );
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn dismissed_payment_writes_no_order() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_load().once().returning(|| Ok(()));
        gateway
            .expect_collect()
            .once()
            .returning(|_| Err(PaymentError::Dismissed));

        let mut orders = MockOrdersService::new();

        orders.expect_place_order().never();

        let mut flow = flow(orders, MockUsersRepository::new(), gateway);
        let mut cart = cart_with([line_item(1, 1)]);

        flow.begin(Some(&profile_with_addresses(&["Home"])), &cart)?;

        let result = flow.confirm_and_pay(&mut cart).await;

        assert_eq!(result, Err(CheckoutError::Payment(PaymentError::Dismissed)));
        assert_eq!(flow.error(), Some("Payment was cancelled."));
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn failed_write_after_payment_keeps_the_payment_id() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_place_order().once().returning(|_| {
            Err(OrdersServiceError::Database(DatabaseError::PermissionDenied(
                ORDERS_COLLECTION,
            )))
        });

        let mut flow = flow(orders, MockUsersRepository::new(), working_gateway());
        let mut cart = cart_with([line_item(1, 1)]);

        flow.begin(Some(&profile_with_addresses(&["Home"])), &cart)?;

        let result = flow.confirm_and_pay(&mut cart).await;

        assert!(
            matches!(&result, Err(CheckoutError::Persistence { payment_id, .. }) if payment_id == "pay_1"),
            "expected Persistence, got {result:?}"
        );
        assert_eq!(flow.error(), Some("Failed to save order after payment."));
        assert!(
            matches!(flow.state(), CheckoutState::PersistenceFailed { payment_id, .. } if payment_id == "pay_1"),
            "expected PersistenceFailed, got {:?}",
            flow.state()
        );
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn finished_attempt_must_be_restarted() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_load().once().returning(|| Ok(()));
        gateway
            .expect_collect()
            .once()
            .returning(|_| Err(PaymentError::Failed("card declined".to_string())));

        let mut flow = flow(MockOrdersService::new(), MockUsersRepository::new(), gateway);
        let mut cart = cart_with([line_item(1, 1)]);

        flow.begin(Some(&profile_with_addresses(&["Home"])), &cart)?;

        let first = flow.confirm_and_pay(&mut cart).await;
        let second = flow.confirm_and_pay(&mut cart).await;

        assert!(first.is_err(), "declined payment should fail");
        assert_eq!(second, Err(CheckoutError::InvalidState("finished")));

        flow.begin(Some(&profile_with_addresses(&["Home"])), &cart)?;

        assert_eq!(flow.state(), &CheckoutState::AddressSelection);
        assert!(flow.error().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn place_pending_order_skips_the_gateway() -> TestResult {
        let mut gateway = MockPaymentGateway::new();

        gateway.expect_load().never();
        gateway.expect_collect().never();

        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .withf(|order| order.status == OrderStatus::Pending && order.payment.is_none())
            .returning(stored);

        let mut flow = flow(orders, MockUsersRepository::new(), gateway);
        let mut cart = cart_with([line_item(1, 2)]);

        flow.begin(Some(&profile_with_addresses(&["Home"])), &cart)?;

        let order = flow.place_pending_order(&mut cart).await?;

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.unit_count(), 2);
        assert!(cart.is_empty());
        assert_eq!(flow.success(), Some(PENDING_ORDER_MESSAGE));

        Ok(())
    }

    #[tokio::test]
    async fn failed_pending_order_keeps_the_cart() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_place_order()
            .once()
            .returning(|_| Err(OrdersServiceError::Database(DatabaseError::Unavailable(
                "offline".to_string(),
            ))));

        let mut flow = flow(orders, MockUsersRepository::new(), MockPaymentGateway::new());
        let mut cart = cart_with([line_item(1, 1)]);

        flow.begin(Some(&profile_with_addresses(&["Home"])), &cart)?;

        let result = flow.place_pending_order(&mut cart).await;

        assert!(
            matches!(result, Err(CheckoutError::PlaceOrder(_))),
            "expected PlaceOrder, got {result:?}"
        );
        assert_eq!(flow.error(), Some("Failed to place order. Please try again."));
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn cancel_returns_to_idle() -> TestResult {
        let mut flow = flow(
            MockOrdersService::new(),
            MockUsersRepository::new(),
            MockPaymentGateway::new(),
        );

        flow.begin(Some(&profile_with_addresses(&["Home"])), &cart_with([line_item(1, 1)]))?;
        flow.cancel();

        assert_eq!(flow.state(), &CheckoutState::Idle);
        assert!(flow.selected_address().is_none());
        assert!(!flow.state().is_terminal());

        Ok(())
    }
}
