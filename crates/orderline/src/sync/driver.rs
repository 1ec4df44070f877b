//! One background task per view: subscribe, load, then keep up with the change feed.

use crate::clients::OrderClient;
use crate::model::Order;
use crate::order_actor::OrderError;
use crate::sync::FeedScope;
use async_trait::async_trait;
use orderline_actor::ChangeEvent;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch, RwLock, RwLockReadGuard};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A dashboard kept in sync with the orders table.
#[async_trait]
pub trait OrderView: Send + Sync + 'static {
    /// Name used in logs.
    const NAME: &'static str;

    fn scope(&self) -> FeedScope;

    /// Reloads everything the view shows.
    async fn refresh(&mut self, client: &OrderClient) -> Result<(), OrderError>;

    /// Patches the view in place. Returning `false` asks for a [`refresh`](Self::refresh).
    fn apply(&mut self, change: &ChangeEvent<Order>) -> bool;
}

/// Handle on a running view. Dropping it stops the task.
pub struct ViewSync<V> {
    state: Arc<RwLock<V>>,
    revision: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl<V: OrderView> ViewSync<V> {
    pub fn spawn(view: V, client: OrderClient) -> Self {
        // Subscribe before the first load so nothing committed in between is missed.
        let feed = client.subscribe();
        let state = Arc::new(RwLock::new(view));
        let (bump, revision) = watch::channel(0);
        let task = tokio::spawn(drive(state.clone(), client, feed, bump));
        Self {
            state,
            revision,
            task,
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, V> {
        self.state.read().await
    }

    /// Mutable access for local UI state such as dismissing a banner.
    pub async fn with<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut *self.state.write().await)
    }

    /// Number of times the view has changed since it was spawned.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Waits until `ready` holds for the view. Returns `false` if the task stopped first.
    pub async fn wait_until(&self, ready: impl Fn(&V) -> bool) -> bool {
        let mut revision = self.revision.clone();
        loop {
            if ready(&*self.state.read().await) {
                return true;
            }
            if revision.changed().await.is_err() {
                return false;
            }
        }
    }
}

impl<V> Drop for ViewSync<V> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn drive<V: OrderView>(
    state: Arc<RwLock<V>>,
    client: OrderClient,
    mut feed: broadcast::Receiver<ChangeEvent<Order>>,
    bump: watch::Sender<u64>,
) {
    refresh(&state, &client, &bump).await;
    loop {
        match feed.recv().await {
            Ok(change) => {
                let mut view = state.write().await;
                if !view.scope().matches(&change) {
                    continue;
                }
                if view.apply(&change) {
                    drop(view);
                    bump.send_modify(|rev| *rev += 1);
                } else {
                    drop(view);
                    refresh(&state, &client, &bump).await;
                }
            }
            Err(RecvError::Lagged(missed)) => {
                warn!(view = V::NAME, missed, "Change feed lagged, refetching");
                refresh(&state, &client, &bump).await;
            }
            Err(RecvError::Closed) => {
                debug!(view = V::NAME, "Change feed closed");
                break;
            }
        }
    }
}

async fn refresh<V: OrderView>(state: &RwLock<V>, client: &OrderClient, bump: &watch::Sender<u64>) {
    match state.write().await.refresh(client).await {
        Ok(()) => bump.send_modify(|rev| *rev += 1),
        Err(e) => warn!(view = V::NAME, error = %e, "Refresh failed, keeping last state"),
    }
}
