//! # Mock Framework & Testing Guide
//!
//! `MockClient<T>` hands out a real `ResourceClient<T>` whose requests are answered from a
//! queue of expectations instead of an actor. It also owns the change feed behind that
//! client, so tests can inject change events with [`MockClient::emit`].
//!
//! ## When to use Mocks vs Real Actors
//!
//! | | MockClient | Real Actor |
//! |---|---|---|
//! | **State** | none, scripted responses | real store |
//! | **Change feed** | events you `emit` | events the actor commits |
//! | **Error injection** | `return_err` | needs a state that fails |
//! | **Use case** | logic *around* a client | the actor itself, full flows |
//!
//! ## Testing Strategies
//!
//! - **Pattern 0: Client logic.** Wrap `mock.client()` in a resource client and script its replies.
//! - **Pattern 1: Single actor.** Spawn `ResourceActor::<T>::new(..)` with `()` context.
//! - **Pattern 2: Actor with mocked dependencies.** A real actor whose context is built from
//!   mocks (see `tests/order_actor_test.rs` in the `orderline` crate).
//! - **Pattern 3: Full system.** Everything real (see `tests/integration_test.rs` in `orderline`).
//!
//! ```rust
//! use orderline_actor::mock::MockClient;
//! use orderline_actor::{ActorEntity, ChangeEvent, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug, PartialEq)] struct Courier { id: u32, busy: bool }
//! #[derive(Debug)] struct CourierCreate;
//! #[derive(Debug)] struct CourierUpdate;
//! #[derive(Debug)] enum CourierAction {}
//! #[derive(Debug, thiserror::Error)] #[error("courier error")] struct CourierError;
//!
//! #[async_trait]
//! impl ActorEntity for Courier {
//!     type Id = u32; type Create = CourierCreate; type Update = CourierUpdate;
//!     type Action = CourierAction; type ActionResult = (); type Query = ();
//!     type Context = (); type Error = CourierError;
//!     fn from_create_params(id: u32, _: CourierCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, busy: false })
//!     }
//!     async fn on_update(&mut self, _: CourierUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, _: CourierAction, _: &()) -> Result<(), Self::Error> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Courier>::new();
//!     let client = mock.client();
//!     let mut feed = client.subscribe();
//!
//!     mock.expect_get(1).return_ok(Some(Courier { id: 1, busy: true }));
//!     mock.expect_get(2).return_err(FrameworkError::ActorClosed);
//!
//!     assert!(client.get(1).await.unwrap().unwrap().busy);
//!     assert!(matches!(client.get(2).await, Err(FrameworkError::ActorClosed)));
//!
//!     mock.emit(ChangeEvent::insert("couriers", Courier { id: 3, busy: false }));
//!     assert_eq!(feed.recv().await.unwrap().new.unwrap().id, 3);
//!
//!     mock.verify();
//! }
//! ```
//!
//! ## Test-only actions
//!
//! Entities that need to expose internals to integration tests should gate those actions
//! behind a Cargo feature (`testing = []`) rather than `#[cfg(test)]`, which is invisible
//! to a crate's `tests/` directory.

use crate::change::ChangeEvent;
use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc};

const MOCK_FEED_CAPACITY: usize = 64;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// One scripted reply, consumed in FIFO order.
enum Expectation<T: ActorEntity> {
    Get {
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Action {
        response: Result<T::ActionResult, FrameworkError>,
    },
}

impl<T: ActorEntity> Expectation<T> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Get { .. } => "get",
            Expectation::Create { .. } => "create",
            Expectation::List { .. } => "list",
            Expectation::Action { .. } => "action",
        }
    }
}

type Queue<T> = Arc<Mutex<VecDeque<(Option<<T as ActorEntity>::Id>, Expectation<T>)>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Expectations carry the id they were registered for; a request for a different id
/// fails the test.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    changes: broadcast::Sender<ChangeEvent<T>>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let (changes, _) = broadcast::channel(MOCK_FEED_CAPACITY);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue.lock().unwrap().pop_front();
                let Some((expected_id, expectation)) = next else {
                    panic!("Unexpected request: no expectation left for {request:?}");
                };

                let requested_id = match &request {
                    ResourceRequest::Get { id, .. } | ResourceRequest::Action { id, .. } => {
                        Some(id.clone())
                    }
                    _ => None,
                };
                if let (Some(expected), Some(requested)) = (&expected_id, &requested_id) {
                    assert_eq!(expected, requested, "Mock called with unexpected id");
                }

                match (request, expectation) {
                    (ResourceRequest::Get { respond_to, .. }, Expectation::Get { response }) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Expectation::Create { response },
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::List { respond_to, .. }, Expectation::List { response }) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { respond_to, .. },
                        Expectation::Action { response },
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (request, expectation) => {
                        panic!(
                            "Expected a {} request, got {:?}",
                            expectation.name(),
                            request
                        );
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender, changes.clone()),
            changes,
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Publishes `event` to every subscriber of the mock's change feed.
    pub fn emit(&self, event: ChangeEvent<T>) {
        let _ = self.changes.send(event);
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        ExpectationBuilder::new(Some(id), self.expectations.clone(), |response| {
            Expectation::Get { response }
        })
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        ExpectationBuilder::new(None, self.expectations.clone(), |response| {
            Expectation::Create { response }
        })
    }

    /// Expects a `list` operation, whatever the query.
    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        ExpectationBuilder::new(None, self.expectations.clone(), |response| {
            Expectation::List { response }
        })
    }

    /// Expects an `action` operation.
    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        ExpectationBuilder::new(Some(id), self.expectations.clone(), |response| {
            Expectation::Action { response }
        })
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    id: Option<T::Id>,
    expectations: Queue<T>,
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    fn new(
        id: Option<T::Id>,
        expectations: Queue<T>,
        wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    ) -> Self {
        Self {
            id,
            expectations,
            wrap,
        }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        let expectation = (self.wrap)(Ok(value));
        self.expectations
            .lock()
            .unwrap()
            .push_back((self.id, expectation));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.wrap)(Err(error));
        self.expectations
            .lock()
            .unwrap()
            .push_back((self.id, expectation));
    }
}

// =============================================================================
// CHANNEL-LEVEL HELPERS
// =============================================================================

/// Creates a client whose requests land on a receiver the test controls.
///
/// Useful when a test needs to inspect the payload of a request (the action a client
/// built, the parameters of a create) before deciding how to answer it.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (changes, _) = broadcast::channel(MOCK_FEED_CAPACITY);
    (ResourceClient::new(sender, changes), receiver)
}

/// Next request, if it is a Create.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Create,
    tokio::sync::oneshot::Sender<Result<T::Id, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next request, if it is an Action.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    tokio::sync::oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}
