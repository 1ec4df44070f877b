//! Drives one customer's order from cart to paid.
//!
//! Cash-on-delivery orders are created settled and returned at once. Card orders are created
//! `pending`/`unpaid`; the customer then waits on a [`CardCheckout`] that follows that one
//! order on the change feed and charges the card when the order moves into `accepted`.
//!
//! A charge happens at most once per order: attempts are serialised through an in-flight set
//! keyed by order id, and the order is re-read before the gateway is called, so a redelivered
//! `accepted` event finds it already paid.

use crate::checkout::{pricing, Cart, CheckoutError, Fulfilment, OrderQuote, Redemption};
use crate::clients::{OrderClient, PointsClient};
use crate::config::PricingConfig;
use crate::model::{
    Order, OrderCreate, OrderId, OrderStatus, OrderType, PaymentStatus, UserId,
};
use crate::payment::{CardToken, IntentRequest, IntentStatus, PaymentGateway};
use orderline_actor::{ChangeEvent, ChangeKind};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub enum PaymentMethod {
    CashOnDelivery,
    Card(CardToken),
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub user_id: Option<UserId>,
    pub full_name: String,
    pub phone: String,
    pub fulfilment: Fulfilment,
    pub payment: PaymentMethod,
    pub redemption: Redemption,
}

#[derive(Debug)]
pub enum PlacedOrder {
    /// Created settled; points already earned.
    CashOnDelivery(Order),
    /// Created pending; wait for the restaurant's decision.
    AwaitingApproval(CardCheckout),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    Paid(Order),
    Denied,
    Cancelled,
    /// The order stays `accepted` with `payment_status = failed`; see [`Checkout::retry_payment`].
    PaymentFailed { message: String },
    /// Staff cancelled the order while the card was being charged. The charge is recorded
    /// on the cancelled order and has to be refunded.
    RefundDue(Order),
}

#[derive(Clone)]
pub struct Checkout {
    orders: OrderClient,
    points: PointsClient,
    gateway: Arc<dyn PaymentGateway>,
    pricing: PricingConfig,
    in_flight: Arc<Mutex<HashSet<OrderId>>>,
}

impl std::fmt::Debug for Checkout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkout")
            .field("pricing", &self.pricing)
            .finish_non_exhaustive()
    }
}

impl Checkout {
    pub fn new(
        orders: OrderClient,
        points: PointsClient,
        gateway: Arc<dyn PaymentGateway>,
        pricing: PricingConfig,
    ) -> Self {
        Self {
            orders,
            points,
            gateway,
            pricing,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Prices the cart for `request` without creating anything.
    pub async fn quote(&self, cart: &Cart, request: &CheckoutRequest) -> Result<OrderQuote, CheckoutError> {
        validate(cart, request)?;
        let balance = match (&request.user_id, request.redemption) {
            (_, Redemption::None) => 0,
            (None, _) => return Err(CheckoutError::SignInRequired),
            (Some(user_id), _) => self.points.balance(user_id.clone()).await?,
        };
        pricing::quote(cart, &request.fulfilment, request.redemption, balance, &self.pricing)
    }

    /// Creates the order and empties the cart.
    ///
    /// Validation and pricing run before anything is written; the cart is only cleared
    /// once the order exists.
    #[instrument(skip(self, cart, request), fields(items = cart.item_count()))]
    pub async fn place_order(
        &self,
        cart: &mut Cart,
        request: CheckoutRequest,
    ) -> Result<PlacedOrder, CheckoutError> {
        let quote = self.quote(cart, &request).await?;
        let (payment_status, card) = match &request.payment {
            PaymentMethod::CashOnDelivery => (PaymentStatus::CashOnDelivery, None),
            PaymentMethod::Card(card) => {
                if quote.amount_minor() <= 0 {
                    return Err(CheckoutError::NothingToCharge);
                }
                (PaymentStatus::Unpaid, Some(card.clone()))
            }
        };
        let (order_type, delivery_address) = match &request.fulfilment {
            Fulfilment::Delivery { address } => (OrderType::Delivery, Some(address.clone())),
            Fulfilment::Pickup => (OrderType::Pickup, None),
        };

        let params = OrderCreate {
            user_id: request.user_id,
            status: OrderStatus::Pending,
            payment_status,
            order_type,
            subtotal: quote.subtotal,
            delivery_fee: quote.delivery_fee,
            points_redeemed: quote.points_redeemed,
            points_discount: quote.points_discount,
            order_total: quote.order_total,
            delivery_address,
            phone: request.phone,
            full_name: request.full_name,
            metadata: cart.to_line_items(),
        };

        // Subscribe first so the decision cannot slip between create and subscribe.
        let feed = self.orders.subscribe();
        let order_id = self.orders.create_order(params).await?;
        cart.clear();
        info!(%order_id, total = quote.order_total, "Order placed");

        match card {
            None => Ok(PlacedOrder::CashOnDelivery(
                self.orders.get_required(order_id).await?,
            )),
            Some(card) => Ok(PlacedOrder::AwaitingApproval(CardCheckout {
                order_id,
                card,
                feed,
                checkout: self.clone(),
            })),
        }
    }

    /// Reacts to one change of `order_id`. Returns the outcome once there is one.
    ///
    /// The card is charged only for an update *into* `accepted` while the order is still
    /// unpaid; repeated deliveries of that update charge nothing.
    pub async fn on_order_change(
        &self,
        order_id: &OrderId,
        event: &ChangeEvent<Order>,
        card: &CardToken,
    ) -> Result<Option<CheckoutOutcome>, CheckoutError> {
        let Some(order) = event.new.as_ref().filter(|order| &order.id == order_id) else {
            return Ok(None);
        };
        match (order.status, order.payment_status) {
            (OrderStatus::Denied, _) => return Ok(Some(CheckoutOutcome::Denied)),
            (OrderStatus::Cancelled, PaymentStatus::Paid) => {
                return Ok(Some(CheckoutOutcome::RefundDue(order.clone())))
            }
            (OrderStatus::Cancelled, _) => return Ok(Some(CheckoutOutcome::Cancelled)),
            _ => {}
        }
        if order.payment_status == PaymentStatus::Paid {
            return Ok(Some(CheckoutOutcome::Paid(order.clone())));
        }

        let entered_accepted = order.status == OrderStatus::Accepted
            && event.old.as_ref().map(|old| old.status) != Some(OrderStatus::Accepted);
        if !entered_accepted || order.payment_status != PaymentStatus::Unpaid {
            return Ok(None);
        }

        match self.collect_payment(order_id, card, false).await {
            Ok(paid) if paid.status == OrderStatus::Cancelled => {
                Ok(Some(CheckoutOutcome::RefundDue(paid)))
            }
            Ok(paid) => Ok(Some(CheckoutOutcome::Paid(paid))),
            Err(CheckoutError::PaymentFailed(message)) => {
                Ok(Some(CheckoutOutcome::PaymentFailed { message }))
            }
            Err(CheckoutError::PaymentInFlight(_) | CheckoutError::NotAwaitingPayment { .. }) => {
                debug!(%order_id, "Duplicate acceptance ignored");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Manual retry after a failed charge. The order must be `accepted` and unpaid or failed.
    #[instrument(skip(self, card))]
    pub async fn retry_payment(&self, order_id: OrderId, card: &CardToken) -> Result<Order, CheckoutError> {
        self.collect_payment(&order_id, card, true).await
    }

    async fn collect_payment(
        &self,
        order_id: &OrderId,
        card: &CardToken,
        allow_failed: bool,
    ) -> Result<Order, CheckoutError> {
        if !self.in_flight.lock().await.insert(order_id.clone()) {
            return Err(CheckoutError::PaymentInFlight(order_id.clone()));
        }
        let result = self.charge(order_id, card, allow_failed).await;
        self.in_flight.lock().await.remove(order_id);
        result
    }

    async fn charge(
        &self,
        order_id: &OrderId,
        card: &CardToken,
        allow_failed: bool,
    ) -> Result<Order, CheckoutError> {
        let order = self.orders.get_required(order_id.clone()).await?;
        let due = match order.payment_status {
            PaymentStatus::Unpaid => true,
            PaymentStatus::Failed => allow_failed,
            _ => false,
        };
        if order.status != OrderStatus::Accepted || !due {
            return Err(CheckoutError::NotAwaitingPayment {
                order_id: order.id,
                status: order.status,
                payment_status: order.payment_status,
            });
        }

        let request = IntentRequest::new(order.amount_minor(), self.pricing.currency.clone())?;
        let intent = match self.gateway.create_intent(request).await {
            Ok(intent) => intent,
            Err(e) => return Err(self.record_failure(order_id, e.to_string()).await),
        };
        let confirmed = match self.gateway.confirm(&intent.client_secret, card).await {
            Ok(confirmed) => confirmed,
            Err(e) => return Err(self.record_failure(order_id, e.to_string()).await),
        };
        if confirmed.status != IntentStatus::Succeeded {
            let message = "Your card requires additional authentication.".to_string();
            return Err(self.record_failure(order_id, message).await);
        }

        // Recorded even if the order was cancelled meanwhile; see `CheckoutOutcome::RefundDue`.
        let paid = self
            .orders
            .confirm_payment(order_id.clone(), confirmed.id)
            .await?;
        info!(%order_id, amount = order.amount_minor(), status = %paid.status, "Payment captured");
        Ok(paid)
    }

    async fn record_failure(&self, order_id: &OrderId, message: String) -> CheckoutError {
        warn!(%order_id, %message, "Payment failed");
        if let Err(e) = self
            .orders
            .fail_payment(order_id.clone(), message.clone())
            .await
        {
            warn!(%order_id, error = %e, "Could not record payment failure");
        }
        CheckoutError::PaymentFailed(message)
    }
}

/// Handle on a card order waiting for the restaurant's decision.
pub struct CardCheckout {
    order_id: OrderId,
    card: CardToken,
    feed: broadcast::Receiver<ChangeEvent<Order>>,
    checkout: Checkout,
}

impl std::fmt::Debug for CardCheckout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardCheckout")
            .field("order_id", &self.order_id)
            .finish_non_exhaustive()
    }
}

impl CardCheckout {
    pub fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Follows the order until it is paid, denied or cancelled, or its payment fails.
    ///
    /// There is no timeout: an order nobody acts on stays pending.
    pub async fn wait_for_outcome(mut self) -> Result<CheckoutOutcome, CheckoutError> {
        loop {
            let event = match self.feed.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(missed)) => {
                    warn!(order_id = %self.order_id, missed, "Order feed lagged, re-reading order");
                    let current = self
                        .checkout
                        .orders
                        .get_required(self.order_id.clone())
                        .await?;
                    ChangeEvent {
                        kind: ChangeKind::Update,
                        table: "orders",
                        new: Some(current),
                        old: None,
                    }
                }
                Err(RecvError::Closed) => return Err(CheckoutError::FeedClosed),
            };
            if let Some(outcome) = self
                .checkout
                .on_order_change(&self.order_id, &event, &self.card)
                .await?
            {
                return Ok(outcome);
            }
        }
    }
}

fn validate(cart: &Cart, request: &CheckoutRequest) -> Result<(), CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if request.full_name.trim().is_empty() {
        return Err(CheckoutError::MissingField("Full name"));
    }
    if request.phone.trim().is_empty() {
        return Err(CheckoutError::MissingField("Phone"));
    }
    if let Fulfilment::Delivery { address } = &request.fulfilment {
        if address.trim().is_empty() {
            return Err(CheckoutError::MissingField("Delivery address"));
        }
    }
    Ok(())
}
