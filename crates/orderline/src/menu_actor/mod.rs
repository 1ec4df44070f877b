//! # Menu Actors
//!
//! Two resource actors back the admin menu pages: one owns [`MenuItem`]s, the other
//! [`Category`]s. The item actor checks category references through a category client
//! injected at `run()` time, so it is started after the category actor and stopped first.
//!
//! - [`entity`] - [`ActorEntity`](orderline_actor::ActorEntity) implementations for both
//! - [`actions`] - [`MenuAction`], the availability switch
//! - [`error`] - [`MenuError`]
//!
//! ```rust,ignore
//! let (category_actor, categories) = menu_actor::new_categories(&config.actors);
//! let (item_actor, items) = menu_actor::new_items(&config.actors);
//! tokio::spawn(category_actor.run(()));
//! tokio::spawn(item_actor.run(MenuContext::new(categories.clone())));
//! let menu = MenuClient::new(items, categories);
//! ```
//!
//! Orders copy name and price into their line items, so editing or deleting a menu item
//! never changes an existing order.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::config::ActorConfig;
use crate::model::{Category, MenuItem};
use orderline_actor::{ResourceActor, ResourceClient};

/// Dependencies of the menu item actor.
#[derive(Clone)]
pub struct MenuContext {
    pub categories: ResourceClient<Category>,
}

impl MenuContext {
    pub fn new(categories: ResourceClient<Category>) -> Self {
        Self { categories }
    }
}

/// Creates a new menu item actor and its client.
pub fn new_items(config: &ActorConfig) -> (ResourceActor<MenuItem>, ResourceClient<MenuItem>) {
    ResourceActor::with_feed_capacity(config.buffer_size, config.feed_capacity)
}

/// Creates a new category actor and its client.
pub fn new_categories(config: &ActorConfig) -> (ResourceActor<Category>, ResourceClient<Category>) {
    ResourceActor::with_feed_capacity(config.buffer_size, config.feed_capacity)
}
