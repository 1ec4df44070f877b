use async_trait::async_trait;
use orderline_actor::{ActorEntity, ChangeKind, FrameworkError, ResourceActor};
use tokio::sync::broadcast::error::TryRecvError;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Booking {
    id: BookingId,
    guest: String,
    party: u8,
    seated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BookingId(String);

impl From<u32> for BookingId {
    fn from(n: u32) -> Self {
        BookingId(format!("booking_{n}"))
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
struct BookingCreate {
    guest: String,
    party: u8,
    reference: Option<String>,
}

#[derive(Debug)]
struct BookingUpdate {
    party: Option<u8>,
}

#[derive(Debug)]
enum BookingAction {
    Seat,
    Resize(u8),
}

#[derive(Debug)]
enum BookingQuery {
    All,
    Waiting,
}

#[derive(Debug, PartialEq, thiserror::Error)]
enum BookingError {
    #[error("party size must be between 1 and 12")]
    PartySize,
    #[error("booking already seated")]
    AlreadySeated,
}

#[async_trait]
impl ActorEntity for Booking {
    type Id = BookingId;
    type Create = BookingCreate;
    type Update = BookingUpdate;
    type Action = BookingAction;
    type ActionResult = bool;
    type Query = BookingQuery;
    type Context = ();
    type Error = BookingError;
    const TABLE: &'static str = "bookings";

    fn from_create_params(id: BookingId, params: BookingCreate) -> Result<Self, Self::Error> {
        if params.party == 0 || params.party > 12 {
            return Err(BookingError::PartySize);
        }
        Ok(Self {
            id,
            guest: params.guest,
            party: params.party,
            seated: false,
        })
    }

    fn natural_id(params: &BookingCreate) -> Option<BookingId> {
        params.reference.clone().map(BookingId)
    }

    fn matches(&self, query: &BookingQuery) -> bool {
        match query {
            BookingQuery::All => true,
            BookingQuery::Waiting => !self.seated,
        }
    }

    async fn on_update(&mut self, update: BookingUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(party) = update.party {
            self.party = party;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: BookingAction, _ctx: &()) -> Result<bool, Self::Error> {
        match action {
            BookingAction::Seat => {
                if self.seated {
                    return Err(BookingError::AlreadySeated);
                }
                self.seated = true;
                Ok(true)
            }
            BookingAction::Resize(party) => {
                // Mutates before validating: the actor must discard the working copy.
                self.party = party;
                if party == 0 || party > 12 {
                    return Err(BookingError::PartySize);
                }
                Ok(true)
            }
        }
    }
}

fn create(guest: &str, party: u8) -> BookingCreate {
    BookingCreate {
        guest: guest.into(),
        party,
        reference: None,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<Booking>::new(10);
    tokio::spawn(actor.run(()));

    let id = client.create(create("Alice", 2)).await.unwrap();
    assert_eq!(id, BookingId("booking_1".into()));

    assert!(client
        .perform_action(id.clone(), BookingAction::Seat)
        .await
        .unwrap());
    let booking: Booking = client.get(id.clone()).await.unwrap().unwrap();
    assert!(booking.seated);

    let updated = client
        .update(id.clone(), BookingUpdate { party: Some(4) })
        .await
        .unwrap();
    assert_eq!(updated.party, 4);

    client.delete(id.clone()).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_action_leaves_entity_untouched() {
    let (actor, client) = ResourceActor::<Booking>::new(10);
    tokio::spawn(actor.run(()));

    let id = client.create(create("Bea", 3)).await.unwrap();
    let mut feed = client.subscribe();

    let err = client
        .perform_action(id.clone(), BookingAction::Resize(40))
        .await
        .unwrap_err()
        .downcast_entity::<BookingError>()
        .unwrap();
    assert_eq!(err, BookingError::PartySize);

    let booking = client.get(id).await.unwrap().unwrap();
    assert_eq!(booking.party, 3);
    assert!(matches!(feed.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_change_feed_reports_commits_in_order() {
    let (actor, client) = ResourceActor::<Booking>::new(10);
    tokio::spawn(actor.run(()));
    let mut feed = client.subscribe();

    let id = client.create(create("Cy", 2)).await.unwrap();
    client
        .perform_action(id.clone(), BookingAction::Seat)
        .await
        .unwrap();
    // Same value: no event.
    client
        .update(id.clone(), BookingUpdate { party: Some(2) })
        .await
        .unwrap();
    client.delete(id.clone()).await.unwrap();

    let insert = feed.recv().await.unwrap();
    assert_eq!(insert.kind, ChangeKind::Insert);
    assert_eq!(insert.table, "bookings");
    assert!(insert.old.is_none());

    let seat = feed.recv().await.unwrap();
    assert_eq!(seat.kind, ChangeKind::Update);
    assert!(!seat.old.unwrap().seated);
    assert!(seat.new.unwrap().seated);

    let delete = feed.recv().await.unwrap();
    assert_eq!(delete.kind, ChangeKind::Delete);
    assert_eq!(delete.old.unwrap().id, id);
    assert!(matches!(feed.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_natural_ids_and_list_queries() {
    let (actor, client) = ResourceActor::<Booking>::new(10);
    tokio::spawn(actor.run(()));

    let keyed = BookingCreate {
        guest: "Dee".into(),
        party: 5,
        reference: Some("window-table".into()),
    };
    let id = client.create(keyed).await.unwrap();
    assert_eq!(id, BookingId("window-table".into()));

    let duplicate = BookingCreate {
        guest: "Eli".into(),
        party: 2,
        reference: Some("window-table".into()),
    };
    assert!(matches!(
        client.create(duplicate).await,
        Err(FrameworkError::AlreadyExists(_))
    ));

    let other = client.create(create("Fay", 2)).await.unwrap();
    client.perform_action(other, BookingAction::Seat).await.unwrap();

    assert_eq!(client.list(BookingQuery::All).await.unwrap().len(), 2);
    let waiting = client.list(BookingQuery::Waiting).await.unwrap();
    assert_eq!(waiting.len(), 1);
    assert_eq!(waiting[0].guest, "Dee");
}

#[tokio::test]
async fn test_missing_entity_and_rejected_create() {
    let (actor, client) = ResourceActor::<Booking>::new(10);
    tokio::spawn(actor.run(()));

    assert!(matches!(
        client.create(create("Gus", 0)).await,
        Err(FrameworkError::EntityError(_))
    ));
    assert!(matches!(
        client
            .perform_action(BookingId("nope".into()), BookingAction::Seat)
            .await,
        Err(FrameworkError::NotFound(_))
    ));
}
