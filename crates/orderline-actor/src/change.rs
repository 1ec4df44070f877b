//! # Change Feed
//!
//! Every `ResourceActor` owns a `tokio::sync::broadcast` channel and publishes one
//! [`ChangeEvent`] per committed mutation. Subscribers get events in the order the actor
//! committed them; a subscriber that falls behind by more than the channel capacity sees
//! `RecvError::Lagged` and is expected to refetch.

use std::fmt;

/// Kind of row-level change, mirroring insert/update/delete notifications of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeKind::Insert => "INSERT",
            ChangeKind::Update => "UPDATE",
            ChangeKind::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A committed change to one entity.
///
/// `new` is set for inserts and updates, `old` for updates and deletes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent<T> {
    pub kind: ChangeKind,
    pub table: &'static str,
    pub new: Option<T>,
    pub old: Option<T>,
}

impl<T> ChangeEvent<T> {
    pub fn insert(table: &'static str, new: T) -> Self {
        Self {
            kind: ChangeKind::Insert,
            table,
            new: Some(new),
            old: None,
        }
    }

    pub fn update(table: &'static str, old: T, new: T) -> Self {
        Self {
            kind: ChangeKind::Update,
            table,
            new: Some(new),
            old: Some(old),
        }
    }

    pub fn delete(table: &'static str, old: T) -> Self {
        Self {
            kind: ChangeKind::Delete,
            table,
            new: None,
            old: Some(old),
        }
    }

    /// The row the event is about: `new` when present, otherwise `old`.
    pub fn row(&self) -> Option<&T> {
        self.new.as_ref().or(self.old.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_prefers_new() {
        let event = ChangeEvent::update("orders", 1, 2);
        assert_eq!(event.row(), Some(&2));
        let event = ChangeEvent::delete("orders", 1);
        assert_eq!(event.row(), Some(&1));
    }
}
