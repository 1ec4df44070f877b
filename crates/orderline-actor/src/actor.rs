//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the component that owns the state of one
//! entity type. It processes messages sequentially, so every entity has exactly one
//! writer, and it publishes a [`ChangeEvent`] for each committed mutation.

use crate::change::ChangeEvent;
use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Default capacity of the change feed when none is given.
pub const DEFAULT_FEED_CAPACITY: usize = 256;

/// The generic actor that manages a collection of entities.
///
/// # Concurrency Model
/// Each actor processes its own messages one at a time in a loop, so the `store`
/// needs no `Mutex`. Two clients racing to mutate the same entity are serialised
/// here; the second one sees the state the first one committed.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new()` returns the `actor` (server) and `client` (interface).
/// 2.  **Wire**: pass dependencies (other clients) into `actor.run(context)`.
/// 3.  **Run**: spawn the run loop in a background task.
///
/// ```rust
/// use orderline_actor::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug, PartialEq)] struct Ticket { id: u32 }
/// #[derive(Debug)] struct TicketCreate;
/// #[derive(Debug)] struct TicketUpdate;
/// #[derive(Debug)] enum TicketAction {}
/// #[derive(Debug, thiserror::Error)] #[error("ticket error")] struct TicketError;
///
/// #[async_trait]
/// impl ActorEntity for Ticket {
///     type Id = u32;
///     type Create = TicketCreate;
///     type Update = TicketUpdate;
///     type Action = TicketAction;
///     type ActionResult = ();
///     type Query = ();
///     type Context = ();
///     type Error = TicketError;
///
///     fn from_create_params(id: u32, _: TicketCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
///     async fn on_update(&mut self, _: TicketUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
///     async fn handle_action(&mut self, _: TicketAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Ticket>::new(10);
///     tokio::spawn(actor.run(()));
///     let id = client.create(TicketCreate).await.unwrap();
///     assert_eq!(id, 1);
/// }
/// ```
///
/// # Operations
///
/// * **Create**: uses `T::natural_id` when the entity supplies one (rejecting duplicates),
///   otherwise the next sequential id; builds the entity, runs `on_create`, stores it and
///   publishes an insert.
/// * **Get** / **List**: clones matching entities out of the store.
/// * **Update** / **Action**: run the hook against a working copy. The copy replaces the
///   stored entity only when the hook succeeds, so a failed hook never leaves a half-applied
///   change behind. An update event is published when the state differs.
/// * **Delete**: runs `on_delete`, removes the entity and publishes a delete.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    changes: broadcast::Sender<ChangeEvent<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::with_feed_capacity(buffer_size, DEFAULT_FEED_CAPACITY)
    }

    /// Like [`ResourceActor::new`] with an explicit change-feed capacity.
    pub fn with_feed_capacity(buffer_size: usize, feed_capacity: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (changes, _) = broadcast::channel(feed_capacity.max(1));
        let actor = Self {
            receiver,
            changes: changes.clone(),
            store: HashMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender, changes);
        (actor, client)
    }

    fn publish(&self, event: ChangeEvent<T>) {
        // No subscribers is not an error.
        let receivers = self.changes.send(event).unwrap_or(0);
        debug!(table = T::TABLE, receivers, "Change published");
    }

    fn allocate_id(&mut self, params: &T::Create) -> Result<T::Id, FrameworkError> {
        match T::natural_id(params) {
            Some(id) if self.store.contains_key(&id) => {
                Err(FrameworkError::AlreadyExists(id.to_string()))
            }
            Some(id) => Ok(id),
            None => {
                let id = T::Id::from(self.next_id);
                self.next_id += 1;
                Ok(id)
            }
        }
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// The `context` is injected into every entity hook, so entities can reach other
    /// actors that were created after this one.
    pub async fn run(mut self, context: T::Context) {
        // "Order" rather than "orderline::model::order::Order"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = match self.allocate_id(&params) {
                        Ok(id) => id,
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create rejected");
                            let _ = respond_to.send(Err(e));
                            continue;
                        }
                    };

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, %id, error = %e, "on_create failed");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.store.insert(id.clone(), item.clone());
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            self.publish(ChangeEvent::insert(T::TABLE, item));
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { query, respond_to } => {
                    let items: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| item.matches(&query))
                        .cloned()
                        .collect();
                    debug!(entity_type, ?query, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(current) = self.store.get(&id).cloned() else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut draft = current.clone();
                    if let Err(e) = draft.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    if draft != current {
                        self.store.insert(id.clone(), draft.clone());
                        self.publish(ChangeEvent::update(T::TABLE, current, draft.clone()));
                    }
                    info!(entity_type, %id, "Updated");
                    let _ = respond_to.send(Ok(draft));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    if let Some(removed) = self.store.remove(&id) {
                        self.publish(ChangeEvent::delete(T::TABLE, removed));
                    }
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(current) = self.store.get(&id).cloned() else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut draft = current.clone();
                    match draft.handle_action(action, &context).await {
                        Ok(result) => {
                            if draft != current {
                                self.store.insert(id.clone(), draft.clone());
                                self.publish(ChangeEvent::update(T::TABLE, current, draft));
                            }
                            info!(entity_type, %id, "Action ok");
                            let _ = respond_to.send(Ok(result));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Action failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
