//! # Orderline Actor Runtime
//!
//! Building blocks for type-safe, resource-oriented actor systems on Tokio.
//!
//! Each resource type (orders, points accounts, …) is owned by one [`ResourceActor`] task
//! that processes requests sequentially. Callers talk to it through a cloneable
//! [`ResourceClient`], and every committed change is fanned out on a broadcast
//! [change feed](change) that views and orchestrators subscribe to.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain model, validation and lifecycle hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - message processing, id allocation, change publication
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed requests and subscriptions
//!
//! ## Context Injection
//!
//! Dependencies are injected at `run(context)` rather than at construction, so actors can be
//! created first and wired afterwards:
//!
//! ```rust
//! use orderline_actor::{ActorEntity, ResourceActor, ResourceClient};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug, PartialEq)] struct Wallet { id: u32, credit: u32 }
//! #[derive(Debug)] struct WalletCreate;
//! #[derive(Debug)] struct WalletUpdate;
//! #[derive(Debug)] enum WalletAction { Spend(u32) }
//! #[derive(Debug, thiserror::Error)] #[error("insufficient credit")] struct WalletError;
//!
//! #[async_trait]
//! impl ActorEntity for Wallet {
//!     type Id = u32; type Create = WalletCreate; type Update = WalletUpdate;
//!     type Action = WalletAction; type ActionResult = u32; type Query = ();
//!     type Context = (); type Error = WalletError;
//!     fn from_create_params(id: u32, _: WalletCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, credit: 10 })
//!     }
//!     async fn on_update(&mut self, _: WalletUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, action: WalletAction, _: &()) -> Result<u32, Self::Error> {
//!         let WalletAction::Spend(amount) = action;
//!         self.credit = self.credit.checked_sub(amount).ok_or(WalletError)?;
//!         Ok(self.credit)
//!     }
//! }
//!
//! #[derive(Clone, Debug, PartialEq)] struct Purchase { id: u32 }
//! #[derive(Debug)] struct PurchaseCreate { wallet: u32, amount: u32 }
//! #[derive(Debug)] struct PurchaseUpdate;
//! #[derive(Debug)] enum PurchaseAction {}
//! #[derive(Debug, thiserror::Error)] #[error("{0}")] struct PurchaseError(String);
//!
//! #[async_trait]
//! impl ActorEntity for Purchase {
//!     type Id = u32; type Create = PurchaseCreate; type Update = PurchaseUpdate;
//!     type Action = PurchaseAction; type ActionResult = (); type Query = ();
//!     // Purchases charge wallets through the wallet actor's client
//!     type Context = ResourceClient<Wallet>;
//!     type Error = PurchaseError;
//!     fn from_create_params(id: u32, _: PurchaseCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
//!     async fn on_update(&mut self, _: PurchaseUpdate, _: &Self::Context) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: PurchaseAction, _: &Self::Context) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (wallet_actor, wallets) = ResourceActor::<Wallet>::new(10);
//!     let (purchase_actor, purchases) = ResourceActor::<Purchase>::new(10);
//!     tokio::spawn(wallet_actor.run(()));
//!     tokio::spawn(purchase_actor.run(wallets.clone()));
//!
//!     let wallet = wallets.create(WalletCreate).await.unwrap();
//!     assert_eq!(wallets.perform_action(wallet, WalletAction::Spend(4)).await.unwrap(), 6);
//!     let _ = purchases.create(PurchaseCreate { wallet, amount: 1 }).await;
//! }
//! ```
//!
//! Shutdown follows from channel closure: once every client of an actor is dropped its
//! loop ends. With an acyclic dependency graph, dropping the top-level clients unwinds
//! the whole system.
//!
//! ## Change Feed
//!
//! [`ResourceClient::subscribe`] returns a `broadcast::Receiver<ChangeEvent<T>>`. Inserts,
//! updates that changed the entity, and deletes are published in commit order.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from scripted expectations and can [emit](mock::MockClient::emit)
//! change events, so orchestration code is testable without spawning actors.

pub mod actor;
pub mod change;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use change::{ChangeEvent, ChangeKind};
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
