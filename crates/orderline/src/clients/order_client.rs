//! # Order Client
//!
//! High-level API over the order actor: creation, contact corrections, staff actions
//! (accept, deny, advance, cancel), payment bookkeeping and the change feed.
use crate::model::{
    DineInOrder, Order, OrderCreate, OrderId, OrderStatus, OrderUpdate, PaymentStatus,
};
use crate::order_actor::lifecycle::kitchen_next;
use crate::order_actor::{OrderAction, OrderError};
use async_trait::async_trait;
use orderline_actor::{ActorClient, ChangeEvent, FrameworkError, ResourceClient};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
///
/// Points redemption and cash-on-delivery earn entries happen in the order actor's
/// `on_create` hook, not here.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => other
                .downcast_entity::<OrderError>()
                .unwrap_or_else(|e| OrderError::ActorCommunicationError(e.to_string())),
        }
    }
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(status = %params.status, total = params.order_total))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        info!("Sending create_order to actor");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Creates a counter order directly in `punched`.
    #[instrument(skip(self, punch))]
    pub async fn punch_dine_in(&self, punch: DineInOrder) -> Result<OrderId, OrderError> {
        self.create_order(punch.into_create()).await
    }

    /// Like `get`, but a missing order is an error.
    pub async fn get_required(&self, id: OrderId) -> Result<Order, OrderError> {
        self.get(id.clone())
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    /// Corrects the phone, name or address of an order that is still `pending`.
    #[instrument(skip(self, update))]
    pub async fn update_contact(&self, id: OrderId, update: OrderUpdate) -> Result<Order, OrderError> {
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Moves an order to `to`. With `expected` set, fails with `StaleStatus` unless the
    /// order is still in that status.
    #[instrument(skip(self))]
    pub async fn transition(
        &self,
        id: OrderId,
        to: OrderStatus,
        expected: Option<OrderStatus>,
    ) -> Result<Order, OrderError> {
        self.act(id, OrderAction::Transition { to, expected }).await
    }

    pub async fn accept(&self, id: OrderId) -> Result<Order, OrderError> {
        self.transition(id, OrderStatus::Accepted, Some(OrderStatus::Pending))
            .await
    }

    pub async fn deny(&self, id: OrderId) -> Result<Order, OrderError> {
        self.transition(id, OrderStatus::Denied, Some(OrderStatus::Pending))
            .await
    }

    pub async fn cancel(&self, id: OrderId) -> Result<Order, OrderError> {
        self.transition(id, OrderStatus::Cancelled, None).await
    }

    /// Kitchen board button: moves the order one stage on from the status it has now.
    #[instrument(skip(self))]
    pub async fn advance(&self, id: OrderId) -> Result<Order, OrderError> {
        let current = self.get_required(id.clone()).await?;
        let next = kitchen_next(current.status).ok_or_else(|| {
            OrderError::ValidationError(format!(
                "{id} has no next kitchen stage from {}",
                current.status
            ))
        })?;
        self.transition(id, next, Some(current.status)).await
    }

    #[instrument(skip(self))]
    pub async fn confirm_payment(
        &self,
        id: OrderId,
        payment_intent_id: String,
    ) -> Result<Order, OrderError> {
        self.act(id, OrderAction::ConfirmPayment { payment_intent_id })
            .await
    }

    #[instrument(skip(self))]
    pub async fn fail_payment(&self, id: OrderId, reason: String) -> Result<Order, OrderError> {
        self.act(id, OrderAction::FailPayment { reason }).await
    }

    #[instrument(skip(self))]
    pub async fn set_payment_status(
        &self,
        id: OrderId,
        status: PaymentStatus,
    ) -> Result<Order, OrderError> {
        self.act(id, OrderAction::SetPaymentStatus(status)).await
    }

    #[instrument(skip(self))]
    pub async fn award_points(&self, id: OrderId) -> Result<Order, OrderError> {
        self.act(id, OrderAction::AwardPoints).await
    }

    /// Subscribes to every committed change of every order.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent<Order>> {
        self.inner.subscribe()
    }

    async fn act(&self, id: OrderId, action: OrderAction) -> Result<Order, OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderLineItem, OrderType};
    use orderline_actor::mock::MockClient;

    fn punch() -> DineInOrder {
        DineInOrder {
            user_id: None,
            order_type: OrderType::DineIn,
            full_name: "Table 4".to_string(),
            phone: "555-0100".to_string(),
            metadata: vec![OrderLineItem {
                menu_item_id: "burger".to_string(),
                name: "Burger".to_string(),
                quantity: 2,
                price: 8.0,
                image_url: None,
                options: Default::default(),
            }],
        }
    }

    #[tokio::test]
    async fn test_missing_order_maps_to_not_found() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_get(OrderId(5)).return_ok(None);
        mock.expect_action(OrderId(6))
            .return_err(FrameworkError::NotFound("order_6".to_string()));

        let client = OrderClient::new(mock.client());
        assert_eq!(
            client.get_required(OrderId(5)).await,
            Err(OrderError::NotFound("order_5".to_string()))
        );
        assert_eq!(
            client.accept(OrderId(6)).await,
            Err(OrderError::NotFound("order_6".to_string()))
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_entity_errors_survive_the_actor_boundary() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action(OrderId(1))
            .return_err(FrameworkError::EntityError(Box::new(
                OrderError::IllegalTransition {
                    from: OrderStatus::Completed,
                    to: OrderStatus::Cooking,
                },
            )));

        let client = OrderClient::new(mock.client());
        let err = client
            .transition(OrderId(1), OrderStatus::Cooking, None)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::IllegalTransition {
                from: OrderStatus::Completed,
                to: OrderStatus::Cooking
            }
        );
    }

    #[test]
    fn test_punch_is_created_punched_and_settled_at_counter() {
        let create = punch().into_create();
        assert_eq!(create.status, OrderStatus::Punched);
        assert_eq!(create.payment_status, PaymentStatus::DineIn);
        assert_eq!(create.delivery_fee, 0.0);
        assert_eq!(create.subtotal, 16.0);
        assert_eq!(create.order_total, 16.0);
    }
}
