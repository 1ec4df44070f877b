//! [`ActorEntity`] implementation for [`Order`].
//!
//! Creation validates the payload and settles points; every later mutation is an
//! [`OrderAction`] checked against the [`lifecycle`](super::lifecycle) graph.

use crate::model::{
    Order, OrderCreate, OrderId, OrderQuery, OrderStatus, OrderType, OrderUpdate, PaymentStatus,
};
use crate::money;
use crate::order_actor::lifecycle::check_transition;
use crate::order_actor::{OrderAction, OrderContext, OrderError};
use async_trait::async_trait;
use chrono::Utc;
use orderline_actor::ActorEntity;
use tracing::{error, info, warn};

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = Order;
    type Query = OrderQuery;
    type Context = OrderContext;
    type Error = OrderError;
    const TABLE: &'static str = "orders";

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        validate_create(&params)?;

        let now = Utc::now();
        // Punched orders skip approval, so they count as accepted on arrival.
        let accepted_at = (params.status == OrderStatus::Punched).then_some(now);

        Ok(Self {
            id,
            user_id: params.user_id,
            status: params.status,
            payment_status: params.payment_status,
            order_type: params.order_type,
            subtotal: params.subtotal,
            delivery_fee: params.delivery_fee,
            points_redeemed: params.points_redeemed,
            points_discount: params.points_discount,
            order_total: params.order_total,
            points_earned: None,
            delivery_address: params.delivery_address,
            phone: params.phone,
            full_name: params.full_name,
            payment_intent_id: None,
            payment_error: None,
            metadata: params.metadata,
            created_at: now,
            accepted_at,
            completed_at: None,
            updated_at: now,
        })
    }

    fn matches(&self, query: &OrderQuery) -> bool {
        query.accepts(self)
    }

    /// Writes the redemption entry and, for cash-on-delivery, the earn entry.
    ///
    /// If the earn entry fails, the redemption is reversed and the order is not created.
    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), Self::Error> {
        let Some(user_id) = self.user_id.clone() else {
            if self.payment_status.earns_points() {
                self.points_earned = Some(0);
            }
            return Ok(());
        };

        if self.points_redeemed > 0 {
            ctx.points
                .redeem(user_id.clone(), self.id.clone(), self.points_redeemed)
                .await?;
        }

        if self.payment_status.earns_points() {
            if let Err(e) = self.award_points(ctx).await {
                if self.points_redeemed > 0 {
                    match ctx.points.reverse(user_id.clone(), self.id.clone()).await {
                        Ok(_) => info!(order_id = %self.id, %user_id, "Redemption reversed"),
                        Err(reverse_err) => error!(
                            order_id = %self.id,
                            %user_id,
                            error = %reverse_err,
                            "Failed to reverse redemption"
                        ),
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &OrderContext) -> Result<(), Self::Error> {
        if self.status != OrderStatus::Pending {
            return Err(OrderError::ValidationError(format!(
                "{} can only be edited while pending, it is {}",
                self.id, self.status
            )));
        }
        let before = self.clone();
        if let Some(phone) = update.phone {
            self.phone = non_blank("phone", phone)?;
        }
        if let Some(full_name) = update.full_name {
            self.full_name = non_blank("full name", full_name)?;
        }
        if let Some(address) = update.delivery_address {
            self.delivery_address = Some(non_blank("delivery address", address)?);
        }
        if *self != before {
            self.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<Order, Self::Error> {
        let before = self.clone();

        match action {
            OrderAction::Transition { to, expected } => self.transition(to, expected, ctx).await?,
            OrderAction::ConfirmPayment { payment_intent_id } => {
                if self.payment_status == PaymentStatus::Paid {
                    return Err(OrderError::AlreadyPaid(self.id.to_string()));
                }
                match self.status {
                    OrderStatus::Accepted => {
                        self.record_charge(payment_intent_id);
                        self.status = OrderStatus::Processing;
                        // The charge is final; a ledger failure must not roll it back.
                        if let Err(e) = self.award_points(ctx).await {
                            warn!(order_id = %self.id, error = %e, "Earn entry missing, retry with AwardPoints");
                        }
                    }
                    // Cancelled while the gateway was charging: the money moved, so the
                    // charge is kept on the order for a refund. No points are earned.
                    OrderStatus::Cancelled if self.payment_status.awaits_card() => {
                        warn!(
                            order_id = %self.id,
                            %payment_intent_id,
                            "Charge captured on a cancelled order, refund due"
                        );
                        self.record_charge(payment_intent_id);
                    }
                    other => {
                        return Err(OrderError::IllegalTransition {
                            from: other,
                            to: OrderStatus::Processing,
                        });
                    }
                }
            }
            OrderAction::FailPayment { reason } => {
                if !self.payment_status.awaits_card() {
                    return Err(OrderError::ValidationError(format!(
                        "{} is not awaiting a card payment ({})",
                        self.id, self.payment_status
                    )));
                }
                self.payment_status = PaymentStatus::Failed;
                self.payment_error = Some(reason);
            }
            OrderAction::SetPaymentStatus(to) => {
                if self.payment_status == PaymentStatus::Paid && to != PaymentStatus::Paid {
                    return Err(OrderError::AlreadyPaid(self.id.to_string()));
                }
                self.payment_status = to;
                if self.points_due() && self.points_earned.is_none() {
                    if let Err(e) = self.award_points(ctx).await {
                        warn!(order_id = %self.id, error = %e, "Earn entry missing, retry with AwardPoints");
                    }
                }
            }
            OrderAction::AwardPoints => {
                if !self.points_due() {
                    return Err(OrderError::PointsNotDue(self.id.to_string()));
                }
                if self.points_earned.is_none() {
                    self.award_points(ctx).await?;
                }
            }
        }

        if *self != before {
            self.updated_at = Utc::now();
        }
        Ok(self.clone())
    }
}

impl Order {
    async fn transition(
        &mut self,
        to: OrderStatus,
        expected: Option<OrderStatus>,
        ctx: &OrderContext,
    ) -> Result<(), OrderError> {
        if let Some(expected) = expected {
            if expected != self.status {
                return Err(OrderError::StaleStatus {
                    expected,
                    actual: self.status,
                });
            }
        }
        check_transition(self.status, to)?;
        if matches!(to, OrderStatus::Processing | OrderStatus::Cooking)
            && self.payment_status.awaits_card()
        {
            return Err(OrderError::PaymentRequired(self.id.to_string()));
        }
        if matches!(to, OrderStatus::Denied | OrderStatus::Cancelled) {
            self.return_redemption(ctx).await?;
        }

        let now = Utc::now();
        self.status = to;
        match to {
            OrderStatus::Accepted if self.accepted_at.is_none() => self.accepted_at = Some(now),
            OrderStatus::Completed if self.completed_at.is_none() => self.completed_at = Some(now),
            _ => {}
        }
        info!(order_id = %self.id, status = %to, "Status changed");
        Ok(())
    }

    /// Gives back the points redeemed on a card order that will never be charged.
    ///
    /// Cash and counter orders are settled at creation and keep their ledger entries.
    async fn return_redemption(&self, ctx: &OrderContext) -> Result<(), OrderError> {
        let Some(user_id) = self.user_id.clone() else {
            return Ok(());
        };
        if self.points_redeemed == 0 || !self.payment_status.awaits_card() {
            return Ok(());
        }
        ctx.points.reverse(user_id.clone(), self.id.clone()).await?;
        info!(order_id = %self.id, %user_id, points = self.points_redeemed, "Redemption returned");
        Ok(())
    }

    fn record_charge(&mut self, payment_intent_id: String) {
        self.payment_status = PaymentStatus::Paid;
        self.payment_intent_id = Some(payment_intent_id);
        self.payment_error = None;
    }

    /// Settled and still going ahead.
    fn points_due(&self) -> bool {
        self.payment_status.earns_points()
            && !matches!(self.status, OrderStatus::Denied | OrderStatus::Cancelled)
    }

    /// Writes the earn entry (`floor(total × rate)`) and records the amount on the order.
    async fn award_points(&mut self, ctx: &OrderContext) -> Result<(), OrderError> {
        let points = money::floor_points(self.order_total, ctx.earn_rate);
        if let Some(user_id) = &self.user_id {
            if points > 0 {
                ctx.points
                    .earn(user_id.clone(), self.id.clone(), points)
                    .await?;
            }
        }
        self.points_earned = Some(if self.user_id.is_some() { points } else { 0 });
        Ok(())
    }
}

fn validate_create(params: &OrderCreate) -> Result<(), OrderError> {
    let invalid = |msg: String| Err(OrderError::ValidationError(msg));

    match params.status {
        OrderStatus::Pending => {
            if !matches!(
                params.payment_status,
                PaymentStatus::Unpaid | PaymentStatus::CashOnDelivery
            ) {
                return invalid(format!(
                    "online orders start unpaid or cash on delivery, not {}",
                    params.payment_status
                ));
            }
        }
        OrderStatus::Punched => {
            if params.payment_status != PaymentStatus::DineIn {
                return invalid("punched orders are paid at the counter".to_string());
            }
            if params.order_type == OrderType::Delivery {
                return invalid("punched orders cannot be delivered".to_string());
            }
        }
        other => return invalid(format!("orders cannot be created as {other}")),
    }

    if params.metadata.is_empty() {
        return invalid("order has no items".to_string());
    }
    if params.metadata.iter().any(|item| item.quantity == 0) {
        return invalid("line item quantity must be at least 1".to_string());
    }
    if params.full_name.trim().is_empty() || params.phone.trim().is_empty() {
        return invalid("full name and phone are required".to_string());
    }
    if params.order_type == OrderType::Delivery
        && params
            .delivery_address
            .as_deref()
            .map_or(true, |address| address.trim().is_empty())
    {
        return invalid("delivery orders need an address".to_string());
    }
    let amounts = [
        params.subtotal,
        params.delivery_fee,
        params.points_discount,
        params.order_total,
    ];
    if amounts.iter().any(|a| !a.is_finite() || *a < 0.0) {
        return invalid("amounts must be non-negative".to_string());
    }
    if !money::approx_eq(params.order_total, params.expected_total()) {
        return invalid(format!(
            "order_total {} does not match subtotal + delivery_fee - discount = {}",
            params.order_total,
            params.expected_total()
        ));
    }
    if params.points_redeemed > 0 && params.user_id.is_none() {
        return invalid("redeeming points requires a signed-in user".to_string());
    }
    Ok(())
}

fn non_blank(field: &str, value: String) -> Result<String, OrderError> {
    if value.trim().is_empty() {
        Err(OrderError::ValidationError(format!("{field} cannot be blank")))
    } else {
        Ok(value)
    }
}
