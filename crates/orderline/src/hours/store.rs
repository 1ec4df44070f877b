//! Persistence seam for the hours table.

use crate::hours::{HoursError, RestaurantHour};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[async_trait]
pub trait HoursStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<RestaurantHour>, HoursError>;

    /// Replaces the whole table in one step; readers see either the old rows or the new.
    async fn replace_all(&self, rows: Vec<RestaurantHour>) -> Result<Vec<RestaurantHour>, HoursError>;
}

#[derive(Debug, Default)]
pub struct MemoryHoursStore {
    rows: RwLock<Vec<RestaurantHour>>,
}

impl MemoryHoursStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<RestaurantHour>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }
}

#[async_trait]
impl HoursStore for MemoryHoursStore {
    async fn fetch_all(&self) -> Result<Vec<RestaurantHour>, HoursError> {
        Ok(self.rows.read().await.clone())
    }

    async fn replace_all(&self, mut rows: Vec<RestaurantHour>) -> Result<Vec<RestaurantHour>, HoursError> {
        rows.sort_by_key(|row| row.day_of_week);
        let mut current = self.rows.write().await;
        *current = rows;
        Ok(current.clone())
    }
}
