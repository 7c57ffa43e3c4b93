//! The cache-or-fetch policy shared by every category endpoint.
//!
//! Stored rows for one location and category always come from a single
//! provider fetch, so they share a creation timestamp; freshness is decided
//! per batch against the first row, never per row. The policy itself is a
//! pure function over rows it is handed, with the store and the provider
//! injected as narrow traits so it can be exercised without HTTP or a
//! database.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::debug;

use crate::models::Location;

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("{service} error: {message}")]
    Provider { service: String, message: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for CategoryError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Access to the batch fetch timestamp of a stored category row.
pub trait CacheStamped {
    fn cached_at(&self) -> DateTime<Utc>;
}

/// Parses an RFC 3339 timestamp, treating anything unreadable as the unix
/// epoch so the owning batch reads as long expired and gets refetched.
#[must_use]
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map_or(DateTime::UNIX_EPOCH, |t| t.with_timezone(&Utc))
}

/// Per-location persistence for one data category.
///
/// Invalidation is all-or-nothing per location; there is no row-level
/// update or partial delete.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    type Record: CacheStamped + Send + Sync;
    type Draft: Send + Sync;

    /// All rows for a location, in insertion order.
    async fn rows_for(&self, location_id: i32) -> Result<Vec<Self::Record>, CategoryError>;

    /// Bulk-persists one fetch batch, stamping every row with the location
    /// and a single creation timestamp. Returns the persisted rows.
    async fn insert_all(
        &self,
        location_id: i32,
        drafts: Vec<Self::Draft>,
    ) -> Result<Vec<Self::Record>, CategoryError>;

    /// Removes every row for the location. No-op when already empty.
    async fn delete_all(&self, location_id: i32) -> Result<u64, CategoryError>;
}

/// One category's provider integration: call the external API for a
/// resolved location and normalize the response into draft records.
#[async_trait]
pub trait ProviderFetcher: Send + Sync {
    type Draft: Send + Sync;

    fn service_name(&self) -> &'static str;

    async fn fetch(&self, location: &Location) -> anyhow::Result<Vec<Self::Draft>>;
}

/// Outcome of a freshness check for one location and category.
#[derive(Debug)]
pub enum Decision<R> {
    /// Stored rows are fresh; return them verbatim.
    Hit(Vec<R>),
    /// Stored rows outlived the category TTL; invalidate, then refetch.
    Stale,
    /// Nothing stored yet; fetch and persist.
    Miss,
}

/// Decides HIT / STALE / MISS for a batch of stored rows.
///
/// A batch is stale once its age strictly exceeds `ttl`; an age of exactly
/// `ttl` is still a hit.
#[must_use]
pub fn evaluate<R: CacheStamped>(rows: Vec<R>, ttl: Duration, now: DateTime<Utc>) -> Decision<R> {
    let Some(first) = rows.first() else {
        return Decision::Miss;
    };

    if now - first.cached_at() > ttl {
        Decision::Stale
    } else {
        Decision::Hit(rows)
    }
}

/// Runs the full cache-or-fetch flow for one location and category.
///
/// An empty provider result is a valid outcome, not a failure: nothing is
/// persisted, the caller gets an empty batch, and the next request will ask
/// the provider again.
pub async fn rows_or_fetch<S, F>(
    store: &S,
    fetcher: &F,
    location: &Location,
    ttl: Duration,
) -> Result<Vec<S::Record>, CategoryError>
where
    S: CategoryStore,
    F: ProviderFetcher<Draft = S::Draft>,
{
    let rows = store.rows_for(location.id).await?;

    match evaluate(rows, ttl, Utc::now()) {
        Decision::Hit(rows) => {
            debug!(
                location_id = location.id,
                service = fetcher.service_name(),
                rows = rows.len(),
                "serving stored rows"
            );
            Ok(rows)
        }
        Decision::Stale => {
            debug!(
                location_id = location.id,
                service = fetcher.service_name(),
                "stored rows expired, refetching"
            );
            store.delete_all(location.id).await?;
            fetch_and_persist(store, fetcher, location).await
        }
        Decision::Miss => fetch_and_persist(store, fetcher, location).await,
    }
}

async fn fetch_and_persist<S, F>(
    store: &S,
    fetcher: &F,
    location: &Location,
) -> Result<Vec<S::Record>, CategoryError>
where
    S: CategoryStore,
    F: ProviderFetcher<Draft = S::Draft>,
{
    let drafts = fetcher
        .fetch(location)
        .await
        .map_err(|e| CategoryError::Provider {
            service: fetcher.service_name().to_string(),
            message: e.to_string(),
        })?;

    if drafts.is_empty() {
        debug!(
            location_id = location.id,
            service = fetcher.service_name(),
            "provider returned no rows"
        );
        return Ok(Vec::new());
    }

    store.insert_all(location.id, drafts).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row {
        value: String,
        created_at: String,
    }

    impl CacheStamped for Row {
        fn cached_at(&self) -> DateTime<Utc> {
            parse_timestamp(&self.created_at)
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<Vec<Row>>,
    }

    #[async_trait]
    impl CategoryStore for MemoryStore {
        type Record = Row;
        type Draft = String;

        async fn rows_for(&self, _location_id: i32) -> Result<Vec<Row>, CategoryError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn insert_all(
            &self,
            _location_id: i32,
            drafts: Vec<String>,
        ) -> Result<Vec<Row>, CategoryError> {
            let created_at = Utc::now().to_rfc3339();
            let mut rows = self.rows.lock().unwrap();
            rows.clear();
            rows.extend(drafts.into_iter().map(|value| Row {
                value,
                created_at: created_at.clone(),
            }));
            Ok(rows.clone())
        }

        async fn delete_all(&self, _location_id: i32) -> Result<u64, CategoryError> {
            let mut rows = self.rows.lock().unwrap();
            let removed = rows.len() as u64;
            rows.clear();
            Ok(removed)
        }
    }

    struct ScriptedFetcher {
        batches: Mutex<Vec<anyhow::Result<Vec<String>>>>,
        calls: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn new(batches: Vec<anyhow::Result<Vec<String>>>) -> Self {
            Self {
                batches: Mutex::new(batches),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProviderFetcher for ScriptedFetcher {
        type Draft = String;

        fn service_name(&self) -> &'static str {
            "Scripted"
        }

        async fn fetch(&self, _location: &Location) -> anyhow::Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.batches.lock().unwrap().remove(0)
        }
    }

    fn stamped(value: &str, at: DateTime<Utc>) -> Row {
        Row {
            value: value.to_string(),
            created_at: at.to_rfc3339(),
        }
    }

    fn somewhere() -> Location {
        Location {
            id: 1,
            search_query: "seattle".to_string(),
            formatted_query: "Seattle, WA, USA".to_string(),
            latitude: 47.6062,
            longitude: -122.3321,
        }
    }

    #[test]
    fn empty_store_is_a_miss() {
        let decision = evaluate(Vec::<Row>::new(), Duration::seconds(15), Utc::now());
        assert!(matches!(decision, Decision::Miss));
    }

    #[test]
    fn fresh_rows_are_a_hit_in_original_order() {
        let now = Utc::now();
        let rows = vec![stamped("a", now), stamped("b", now), stamped("c", now)];

        match evaluate(rows, Duration::seconds(15), now) {
            Decision::Hit(rows) => {
                let values: Vec<&str> = rows.iter().map(|r| r.value.as_str()).collect();
                assert_eq!(values, ["a", "b", "c"]);
            }
            other => panic!("expected hit, got {other:?}"),
        }
    }

    #[test]
    fn age_equal_to_ttl_is_still_a_hit() {
        let now = Utc::now();
        let rows = vec![stamped("a", now - Duration::seconds(15))];
        assert!(matches!(
            evaluate(rows, Duration::seconds(15), now),
            Decision::Hit(_)
        ));
    }

    #[test]
    fn expired_rows_are_stale() {
        let now = Utc::now();
        let rows = vec![stamped("a", now - Duration::milliseconds(20_000))];
        assert!(matches!(
            evaluate(rows, Duration::milliseconds(15_000), now),
            Decision::Stale
        ));
    }

    #[test]
    fn unreadable_timestamp_reads_as_expired() {
        let rows = vec![Row {
            value: "a".to_string(),
            created_at: "not a timestamp".to_string(),
        }];
        assert!(matches!(
            evaluate(rows, Duration::days(365), Utc::now()),
            Decision::Stale
        ));
    }

    #[tokio::test]
    async fn miss_fetches_and_persists() {
        let store = MemoryStore::default();
        let fetcher = ScriptedFetcher::new(vec![Ok(vec!["sunny".to_string(), "rain".to_string()])]);

        let rows = rows_or_fetch(&store, &fetcher, &somewhere(), Duration::seconds(15))
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(store.rows_for(1).await.unwrap().len(), 2);
        // One batch, one timestamp.
        assert_eq!(rows[0].created_at, rows[1].created_at);
    }

    #[tokio::test]
    async fn hit_does_not_touch_the_provider() {
        let store = MemoryStore::default();
        let fetcher = ScriptedFetcher::new(vec![Ok(vec!["sunny".to_string()])]);
        let location = somewhere();

        rows_or_fetch(&store, &fetcher, &location, Duration::seconds(60))
            .await
            .unwrap();
        let rows = rows_or_fetch(&store, &fetcher, &location, Duration::seconds(60))
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn stale_rows_are_deleted_then_refetched() {
        let store = MemoryStore::default();
        store.rows.lock().unwrap().push(stamped(
            "old",
            Utc::now() - Duration::seconds(120),
        ));
        let fetcher = ScriptedFetcher::new(vec![Ok(vec!["new".to_string()])]);

        let rows = rows_or_fetch(&store, &fetcher, &somewhere(), Duration::seconds(15))
            .await
            .unwrap();

        assert_eq!(fetcher.calls(), 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, "new");
        let stored = store.rows_for(1).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].value, "new");
    }

    #[test]
    fn freshness_is_judged_by_the_first_row_only() {
        // Rows always land as one batch; only the first row's stamp counts.
        let now = Utc::now();
        let rows = vec![
            stamped("fresh", now),
            stamped("ancient", now - Duration::days(30)),
        ];
        assert!(matches!(
            evaluate(rows, Duration::seconds(15), now),
            Decision::Hit(_)
        ));
    }

    #[tokio::test]
    async fn stale_rows_are_gone_even_when_the_refetch_fails() {
        let store = MemoryStore::default();
        store
            .rows
            .lock()
            .unwrap()
            .push(stamped("old", Utc::now() - Duration::seconds(120)));
        let fetcher = ScriptedFetcher::new(vec![Err(anyhow::anyhow!("timed out"))]);

        let err = rows_or_fetch(&store, &fetcher, &somewhere(), Duration::seconds(15))
            .await
            .unwrap_err();

        // Invalidation happens before the provider call, so the expired
        // batch does not outlive a failed refetch.
        assert!(matches!(err, CategoryError::Provider { .. }));
        assert!(store.rows_for(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_provider_result_is_not_cached() {
        let store = MemoryStore::default();
        let fetcher = ScriptedFetcher::new(vec![Ok(vec![]), Ok(vec!["late".to_string()])]);
        let location = somewhere();

        let first = rows_or_fetch(&store, &fetcher, &location, Duration::seconds(15))
            .await
            .unwrap();
        assert!(first.is_empty());
        assert!(store.rows_for(1).await.unwrap().is_empty());

        // No negative caching: the next request asks the provider again.
        let second = rows_or_fetch(&store, &fetcher, &location, Duration::seconds(15))
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn provider_failure_propagates_and_persists_nothing() {
        let store = MemoryStore::default();
        let fetcher = ScriptedFetcher::new(vec![Err(anyhow::anyhow!("connection refused"))]);

        let err = rows_or_fetch(&store, &fetcher, &somewhere(), Duration::seconds(15))
            .await
            .unwrap_err();

        assert!(matches!(err, CategoryError::Provider { .. }));
        assert!(store.rows_for(1).await.unwrap().is_empty());
    }
}
