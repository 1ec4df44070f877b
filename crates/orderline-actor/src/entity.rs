//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every resource (Order, PointsAccount, …) implements
//! to be managed by the generic `ResourceActor`. It fixes the associated types for ids, DTOs,
//! actions, queries, context and errors, and provides the lifecycle hooks (`on_create`,
//! `on_update`, `on_delete`, `handle_action`).
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`] / [`ActorEntity::on_delete`] default to `Ok(())`.
//! - [`ActorEntity::matches`] defaults to `true`, so `list` returns every entity.
//! - [`ActorEntity::natural_id`] defaults to `None`, so the actor assigns sequential ids.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they can call other actors. The `Context` type is injected
/// into every hook at `run()` time, which lets dependencies be wired after construction.
///
/// # Change detection
/// Entities are `PartialEq`: the actor compares the state before and after an update or
/// action and only publishes a change event when something actually changed.
#[async_trait]
pub trait ActorEntity: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// The unique identifier for this entity.
    /// Must be convertible from u32 for automatic ID generation.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g., `Transition`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Filter accepted by `list`. Use `()` when every listing returns everything.
    type Query: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One enum per actor rather than one per message: clients match on a single
    /// error type, at the price of every action nominally returning every variant.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Table name stamped on change events (e.g. `"orders"`).
    const TABLE: &'static str = "resources";

    /// Construct the full Entity from the ID and Payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// External key for entities addressed by something other than a generated id.
    fn natural_id(_params: &Self::Create) -> Option<Self::Id> {
        None
    }

    /// Whether this entity belongs in the result of `list(query)`.
    fn matches(&self, _query: &Self::Query) -> bool {
        true
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after `from_create_params` and before the entity is stored.
    /// A failure here discards the entity.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed from the system.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
