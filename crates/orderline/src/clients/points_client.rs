//! # Points Client
//!
//! Typed API over the points actor. Accounts are opened lazily: the first ledger write for
//! a user creates their account.
use crate::model::{LedgerEntry, OrderId, PointsAccount, PointsCreate, UserId};
use crate::points_actor::{PointsAction, PointsActionResult, PointsError};
use async_trait::async_trait;
use orderline_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the points actor.
#[derive(Clone)]
pub struct PointsClient {
    inner: ResourceClient<PointsAccount>,
}

#[async_trait]
impl ActorClient<PointsAccount> for PointsClient {
    type Error = PointsError;

    fn inner(&self) -> &ResourceClient<PointsAccount> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        e.downcast_entity::<PointsError>()
            .unwrap_or_else(|e| PointsError::ActorCommunicationError(e.to_string()))
    }
}

impl PointsClient {
    pub fn new(inner: ResourceClient<PointsAccount>) -> Self {
        Self { inner }
    }

    /// Current balance. A user without an account has 0 points.
    #[instrument(skip(self))]
    pub async fn balance(&self, user_id: UserId) -> Result<u32, PointsError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(user_id, PointsAction::Balance)
            .await
        {
            Ok(PointsActionResult::Balance(balance)) => Ok(balance),
            Ok(other) => Err(unexpected(other)),
            Err(FrameworkError::NotFound(_)) => Ok(0),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn earn(
        &self,
        user_id: UserId,
        order_id: OrderId,
        points: u32,
    ) -> Result<LedgerEntry, PointsError> {
        self.record(user_id, PointsAction::Earn { order_id, points })
            .await
    }

    #[instrument(skip(self))]
    pub async fn redeem(
        &self,
        user_id: UserId,
        order_id: OrderId,
        points: u32,
    ) -> Result<LedgerEntry, PointsError> {
        self.record(user_id, PointsAction::Redeem { order_id, points })
            .await
    }

    #[instrument(skip(self))]
    pub async fn reverse(&self, user_id: UserId, order_id: OrderId) -> Result<LedgerEntry, PointsError> {
        self.record(user_id, PointsAction::Reverse { order_id }).await
    }

    /// Every ledger entry of `user_id`, oldest first.
    pub async fn history(&self, user_id: UserId) -> Result<Vec<LedgerEntry>, PointsError> {
        Ok(self
            .get(user_id)
            .await?
            .map(|account| account.entries)
            .unwrap_or_default())
    }

    async fn record(&self, user_id: UserId, action: PointsAction) -> Result<LedgerEntry, PointsError> {
        debug!("Sending request");
        let result = match self
            .inner
            .perform_action(user_id.clone(), action.clone())
            .await
        {
            Err(FrameworkError::NotFound(_)) => {
                self.open_account(user_id.clone()).await?;
                self.inner.perform_action(user_id, action).await
            }
            other => other,
        };
        match result.map_err(Self::map_error)? {
            PointsActionResult::Recorded(entry) => Ok(entry),
            other => Err(unexpected(other)),
        }
    }

    async fn open_account(&self, user_id: UserId) -> Result<(), PointsError> {
        debug!(%user_id, "Opening points account");
        match self.inner.create(PointsCreate { user_id }).await {
            // Lost a race with another first write; the account is there either way.
            Ok(_) | Err(FrameworkError::AlreadyExists(_)) => Ok(()),
            Err(e) => Err(Self::map_error(e)),
        }
    }
}

fn unexpected(result: PointsActionResult) -> PointsError {
    PointsError::ActorCommunicationError(format!("Unexpected points reply: {result:?}"))
}
