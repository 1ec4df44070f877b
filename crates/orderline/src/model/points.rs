use crate::model::{OrderId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Loyalty points account of one user.
///
/// # Actor Framework
/// Managed by a [`ResourceActor`](orderline_actor::ResourceActor) keyed by [`UserId`]
/// (see [`ActorEntity::natural_id`](orderline_actor::ActorEntity::natural_id)); entries
/// are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsAccount {
    pub user_id: UserId,
    pub entries: Vec<LedgerEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Earned,
    Redeemed,
    /// Gives back points redeemed by an order that was never created or never charged.
    Reversal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub kind: EntryKind,
    pub order_id: Option<OrderId>,
    pub points_earned: u32,
    pub points_spent: u32,
    /// Balance after this entry.
    pub current_balance: u32,
    pub created_at: DateTime<Utc>,
}

/// Payload for opening an account.
#[derive(Debug, Clone)]
pub struct PointsCreate {
    pub user_id: UserId,
}

impl PointsAccount {
    /// The running balance of the latest entry, not a sum.
    pub fn balance(&self) -> u32 {
        self.entries
            .last()
            .map(|entry| entry.current_balance)
            .unwrap_or(0)
    }

    pub fn entry_for(&self, order_id: &OrderId, kind: EntryKind) -> Option<&LedgerEntry> {
        self.entries
            .iter()
            .find(|entry| entry.kind == kind && entry.order_id.as_ref() == Some(order_id))
    }
}
