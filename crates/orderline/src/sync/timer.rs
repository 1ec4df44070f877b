//! Kitchen prep countdown. Display only; it never changes an order.

use crate::model::{Order, OrderStatus};
use chrono::{DateTime, TimeDelta, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepCountdown {
    window: TimeDelta,
}

impl PrepCountdown {
    pub fn new(prep_minutes: u32) -> Self {
        Self {
            window: TimeDelta::minutes(i64::from(prep_minutes)),
        }
    }

    /// Time left in the prep window, negative once overdue. `None` until the order is accepted.
    ///
    /// Finished orders stop the clock at their last update.
    pub fn remaining(&self, order: &Order, now: DateTime<Utc>) -> Option<TimeDelta> {
        let accepted_at = order.accepted_at?;
        let stopped = matches!(
            order.status,
            OrderStatus::Completed | OrderStatus::Cancelled | OrderStatus::Denied
        );
        let at = if stopped { order.updated_at } else { now };
        Some(accepted_at + self.window - at)
    }

    pub fn is_overdue(&self, order: &Order, now: DateTime<Utc>) -> bool {
        self.remaining(order, now)
            .is_some_and(|left| left < TimeDelta::zero())
    }

    /// `MM:SS`, or `-MM:SS` once overdue.
    pub fn display(&self, order: &Order, now: DateTime<Utc>) -> Option<String> {
        self.remaining(order, now).map(format_countdown)
    }
}

fn format_countdown(left: TimeDelta) -> String {
    let secs = left.num_seconds();
    let sign = if secs < 0 { "-" } else { "" };
    let secs = secs.unsigned_abs();
    format!("{sign}{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::tests::sample_order;
    use chrono::TimeZone;

    #[test]
    fn test_countdown_runs_from_acceptance() {
        let accepted = Utc.with_ymd_and_hms(2024, 6, 3, 18, 0, 0).unwrap();
        let mut order = sample_order(1, OrderStatus::Cooking);
        order.accepted_at = Some(accepted);
        let timer = PrepCountdown::new(45);

        let now = accepted + TimeDelta::seconds(10 * 60 + 5);
        assert_eq!(timer.display(&order, now).as_deref(), Some("34:55"));
        assert!(!timer.is_overdue(&order, now));

        let late = accepted + TimeDelta::minutes(47);
        assert_eq!(timer.display(&order, late).as_deref(), Some("-02:00"));
        assert!(timer.is_overdue(&order, late));
    }

    #[test]
    fn test_countdown_freezes_when_finished() {
        let accepted = Utc.with_ymd_and_hms(2024, 6, 3, 18, 0, 0).unwrap();
        let mut order = sample_order(1, OrderStatus::Completed);
        order.accepted_at = Some(accepted);
        order.updated_at = accepted + TimeDelta::minutes(30);
        let timer = PrepCountdown::new(45);

        let much_later = accepted + TimeDelta::hours(5);
        assert_eq!(timer.display(&order, much_later).as_deref(), Some("15:00"));
    }

    #[test]
    fn test_no_countdown_before_acceptance() {
        let order = sample_order(1, OrderStatus::Pending);
        assert!(PrepCountdown::new(45).display(&order, Utc::now()).is_none());
    }
}
