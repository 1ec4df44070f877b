//! Cached weekly schedule with explicit invalidation.

use crate::hours::{HoursStore, WeeklySchedule};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub type ListenerId = u64;

type Listener = Box<dyn Fn() + Send + Sync>;

struct Cached {
    schedule: WeeklySchedule,
    /// `None` once invalidated. The schedule is kept as a fallback for failed fetches.
    fetched_at: Option<Instant>,
}

/// Schedule cache owned by [`HoursService`](crate::hours::HoursService).
///
/// Entries live for `ttl`. [`HoursCache::invalidate`] drops freshness immediately and calls
/// every registered listener, so open-status displays can refresh.
pub struct HoursCache {
    ttl: Duration,
    entry: RwLock<Option<Cached>>,
    listeners: RwLock<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
}

impl HoursCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
            listeners: RwLock::new(Vec::new()),
            next_listener: AtomicU64::new(1),
        }
    }

    /// The cached schedule while fresh, otherwise a fetch from `store`.
    ///
    /// A failed fetch falls back to the last schedule seen, then to the default hours.
    pub async fn get<S: HoursStore + ?Sized>(&self, store: &S) -> WeeklySchedule {
        if let Some(cached) = self.entry.read().await.as_ref() {
            if cached.fetched_at.is_some_and(|at| at.elapsed() < self.ttl) {
                return cached.schedule.clone();
            }
        }

        match store.fetch_all().await {
            Ok(rows) => {
                let schedule = WeeklySchedule::from_rows(&rows);
                debug!(rows = rows.len(), "Hours cache refreshed");
                *self.entry.write().await = Some(Cached {
                    schedule: schedule.clone(),
                    fetched_at: Some(Instant::now()),
                });
                schedule
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch restaurant hours");
                self.entry
                    .read()
                    .await
                    .as_ref()
                    .map(|cached| cached.schedule.clone())
                    .unwrap_or_default()
            }
        }
    }

    /// Forces the next `get` to fetch and notifies listeners.
    pub async fn invalidate(&self) {
        if let Some(cached) = self.entry.write().await.as_mut() {
            cached.fetched_at = None;
        }
        let listeners = self.listeners.read().await;
        debug!(listeners = listeners.len(), "Hours cache invalidated");
        for (_, listener) in listeners.iter() {
            listener();
        }
    }

    pub async fn on_invalidate<F>(&self, listener: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners.write().await.push((id, Box::new(listener)));
        id
    }

    /// Returns whether a listener was removed.
    pub async fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().await;
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }
}
