//! [`ActorEntity`] implementation for [`PointsAccount`].

use crate::model::{EntryKind, LedgerEntry, OrderId, PointsAccount, PointsCreate, UserId};
use crate::points_actor::{PointsAction, PointsActionResult, PointsError};
use async_trait::async_trait;
use chrono::Utc;
use orderline_actor::ActorEntity;
use tracing::debug;

#[async_trait]
impl ActorEntity for PointsAccount {
    type Id = UserId;
    type Create = PointsCreate;
    type Update = ();
    type Action = PointsAction;
    type ActionResult = PointsActionResult;
    type Query = ();
    type Context = ();
    type Error = PointsError;
    const TABLE: &'static str = "royalty_points";

    fn from_create_params(id: UserId, _params: PointsCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: id,
            entries: Vec::new(),
        })
    }

    fn natural_id(params: &PointsCreate) -> Option<UserId> {
        Some(params.user_id.clone())
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: PointsAction,
        _ctx: &(),
    ) -> Result<PointsActionResult, Self::Error> {
        match action {
            PointsAction::Balance => Ok(PointsActionResult::Balance(self.balance())),
            PointsAction::Earn { order_id, points } => {
                if points == 0 {
                    return Err(PointsError::InvalidAmount(points));
                }
                if let Some(existing) = self.entry_for(&order_id, EntryKind::Earned) {
                    debug!(user_id = %self.user_id, %order_id, "Earn already recorded");
                    return Ok(PointsActionResult::Recorded(existing.clone()));
                }
                let balance = self.balance().saturating_add(points);
                Ok(self.append(EntryKind::Earned, order_id, points, 0, balance))
            }
            PointsAction::Redeem { order_id, points } => {
                if points == 0 {
                    return Err(PointsError::InvalidAmount(points));
                }
                if let Some(existing) = self.entry_for(&order_id, EntryKind::Redeemed) {
                    return Ok(PointsActionResult::Recorded(existing.clone()));
                }
                let available = self.balance();
                if points > available {
                    return Err(PointsError::InsufficientPoints {
                        requested: points,
                        available,
                    });
                }
                Ok(self.append(EntryKind::Redeemed, order_id, 0, points, available - points))
            }
            PointsAction::Reverse { order_id } => {
                if let Some(existing) = self.entry_for(&order_id, EntryKind::Reversal) {
                    return Ok(PointsActionResult::Recorded(existing.clone()));
                }
                let spent = self
                    .entry_for(&order_id, EntryKind::Redeemed)
                    .map(|entry| entry.points_spent)
                    .ok_or_else(|| PointsError::NothingToReverse(order_id.to_string()))?;
                let balance = self.balance().saturating_add(spent);
                Ok(self.append(EntryKind::Reversal, order_id, spent, 0, balance))
            }
        }
    }
}

impl PointsAccount {
    fn append(
        &mut self,
        kind: EntryKind,
        order_id: OrderId,
        points_earned: u32,
        points_spent: u32,
        current_balance: u32,
    ) -> PointsActionResult {
        let entry = LedgerEntry {
            kind,
            order_id: Some(order_id),
            points_earned,
            points_spent,
            current_balance,
            created_at: Utc::now(),
        };
        self.entries.push(entry.clone());
        PointsActionResult::Recorded(entry)
    }
}
