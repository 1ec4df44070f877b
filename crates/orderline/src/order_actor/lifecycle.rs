//! The order status graph.
//!
//! Every status mutation consults [`check_transition`]; nothing else decides which moves
//! are legal.
//!
//! ```text
//! pending ──► accepted ──► processing ──► cooking ──► ready ──► completed
//!    │            │  └──────────────────────▲
//!    ├─► denied   │
//!    │            │         punched ──► processing | cooking
//!    └────────────┴──► cancelled  ◄── (any non-terminal state)
//! ```

use crate::model::OrderStatus;
use crate::order_actor::OrderError;

/// Statuses reachable from `from` in one step.
pub fn allowed_targets(from: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match from {
        Pending => &[Accepted, Denied, Cancelled],
        Accepted => &[Processing, Cooking, Cancelled],
        Punched => &[Processing, Cooking, Cancelled],
        Processing => &[Cooking, Cancelled],
        Cooking => &[Ready, Cancelled],
        Ready => &[Completed, Cancelled],
        Completed | Denied | Cancelled => &[],
    }
}

pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    allowed_targets(from).contains(&to)
}

pub fn check_transition(from: OrderStatus, to: OrderStatus) -> Result<(), OrderError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(OrderError::IllegalTransition { from, to })
    }
}

/// The stage a kitchen card's single action button moves the order to.
pub fn kitchen_next(from: OrderStatus) -> Option<OrderStatus> {
    use OrderStatus::*;
    match from {
        Punched | Accepted | Processing => Some(Cooking),
        Cooking => Some(Ready),
        Ready => Some(Completed),
        _ => None,
    }
}

/// Position along the happy path. Terminal side exits share the top rank.
pub fn stage_rank(status: OrderStatus) -> u8 {
    use OrderStatus::*;
    match status {
        Pending => 0,
        Accepted | Punched => 1,
        Processing => 2,
        Cooking => 3,
        Ready => 4,
        Completed | Denied | Cancelled => 5,
    }
}
