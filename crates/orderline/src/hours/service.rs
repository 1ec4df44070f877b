use crate::hours::{DayHours, HoursCache, HoursError, HoursStore, RestaurantHour, WeeklySchedule};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// What the storefront shows about opening hours right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantStatus {
    pub is_open: bool,
    pub today: Option<DayHours>,
    pub next_opening: String,
}

/// Single owner of the hours store handle and the schedule cache.
pub struct HoursService {
    store: Arc<dyn HoursStore>,
    cache: HoursCache,
}

impl HoursService {
    pub fn new(store: Arc<dyn HoursStore>, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache: HoursCache::new(cache_ttl),
        }
    }

    pub fn cache(&self) -> &HoursCache {
        &self.cache
    }

    /// The stored rows, Sunday first.
    pub async fn list(&self) -> Result<Vec<RestaurantHour>, HoursError> {
        let mut rows = self.store.fetch_all().await?;
        rows.sort_by_key(|row| row.day_of_week);
        Ok(rows)
    }

    /// Validates `rows`, swaps the table and invalidates the cache.
    ///
    /// Nothing touches the store unless every row is valid.
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub async fn replace(&self, rows: Vec<RestaurantHour>) -> Result<Vec<RestaurantHour>, HoursError> {
        validate(&rows)?;
        let saved = self.store.replace_all(rows).await?;
        self.cache.invalidate().await;
        info!("Restaurant hours replaced");
        Ok(saved)
    }

    pub async fn schedule(&self) -> WeeklySchedule {
        self.cache.get(self.store.as_ref()).await
    }

    pub async fn is_open_at(&self, at: NaiveDateTime) -> bool {
        self.schedule().await.is_open_at(at)
    }

    pub async fn status_at(&self, at: NaiveDateTime) -> RestaurantStatus {
        let schedule = self.schedule().await;
        RestaurantStatus {
            is_open: schedule.is_open_at(at),
            today: schedule.today(at),
            next_opening: schedule.next_opening(at),
        }
    }
}

pub fn validate(rows: &[RestaurantHour]) -> Result<(), HoursError> {
    if rows.is_empty() {
        return Err(HoursError::Empty);
    }
    let mut seen = HashSet::new();
    for row in rows {
        if row.day_of_week > 6 {
            return Err(HoursError::InvalidDay(row.day_of_week));
        }
        if !seen.insert(row.day_of_week) {
            return Err(HoursError::DuplicateDay(row.day_of_week));
        }
        if row.is_open && (row.open_time.is_none() || row.close_time.is_none()) {
            return Err(HoursError::MissingTimes(row.day_of_week));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hours::MemoryHoursStore;
    use chrono::{NaiveDate, NaiveTime};

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn service(rows: Vec<RestaurantHour>) -> (Arc<MemoryHoursStore>, HoursService) {
        let store = Arc::new(MemoryHoursStore::with_rows(rows));
        let service = HoursService::new(store.clone(), Duration::from_secs(60));
        (store, service)
    }

    #[tokio::test]
    async fn test_invalid_payload_leaves_store_untouched() {
        let original = vec![RestaurantHour::open(1, t(9), t(17))];
        let (store, service) = service(original.clone());

        assert_eq!(service.replace(vec![]).await, Err(HoursError::Empty));
        assert_eq!(
            service
                .replace(vec![RestaurantHour::open(1, t(9), t(17)), RestaurantHour::closed(1)])
                .await,
            Err(HoursError::DuplicateDay(1))
        );
        assert_eq!(
            service.replace(vec![RestaurantHour::closed(7)]).await,
            Err(HoursError::InvalidDay(7))
        );
        let mut no_close = RestaurantHour::open(2, t(9), t(17));
        no_close.close_time = None;
        assert_eq!(
            service.replace(vec![no_close]).await,
            Err(HoursError::MissingTimes(2))
        );

        assert_eq!(store.fetch_all().await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_replace_invalidates_status() {
        let (_, service) = service(vec![RestaurantHour::open(1, t(9), t(17))]);
        // Monday 2024-06-03 at 18:00
        let monday_evening = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_time(t(18));

        let status = service.status_at(monday_evening).await;
        assert!(!status.is_open);
        assert_eq!(status.next_opening, "Monday at 09:00");

        service
            .replace(vec![RestaurantHour::open(1, t(9), t(22)), RestaurantHour::closed(2)])
            .await
            .unwrap();

        let status = service.status_at(monday_evening).await;
        assert!(status.is_open);
        assert_eq!(status.today.unwrap().close, t(22));
        assert_eq!(service.list().await.unwrap().len(), 2);
    }
}
