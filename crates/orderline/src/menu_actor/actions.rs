//! Custom actions for the menu item actor.

#[derive(Debug, Clone)]
pub enum MenuAction {
    /// Take an item off the storefront, or put it back. Returns the item as committed.
    SetAvailable(bool),
}
