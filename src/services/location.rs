use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::clients::geocode::GeocodeClient;
use crate::db::Store;
use crate::models::Location;

#[derive(Debug, Error)]
pub enum LocationError {
    /// The geocoding provider knows nothing matching the query. A
    /// legitimate outcome for an unresolvable address, surfaced to the
    /// caller as such rather than as a generic failure.
    #[error("No geocoding results for '{0}'")]
    NoResults(String),

    #[error("Geocoding error: {0}")]
    Provider(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Resolves free-text queries to canonical locations, geocoding on first
/// sight and serving the stored row ever after. Locations never expire.
pub struct LocationService {
    store: Store,
    geocode: Arc<GeocodeClient>,
}

impl LocationService {
    #[must_use]
    pub const fn new(store: Store, geocode: Arc<GeocodeClient>) -> Self {
        Self { store, geocode }
    }

    /// The query string is the cache key, case-sensitive and unnormalized:
    /// "Seattle" and "seattle" are distinct locations.
    pub async fn resolve(&self, query: &str) -> Result<Location, LocationError> {
        if let Some(row) = self
            .store
            .locations()
            .find_by_query(query)
            .await
            .map_err(|e| LocationError::Database(e.to_string()))?
        {
            debug!(query, "location served from store");
            return Ok(row.into());
        }

        let results = self
            .geocode
            .geocode(query)
            .await
            .map_err(|e| LocationError::Provider(e.to_string()))?;

        let Some(first) = results.into_iter().next() else {
            return Err(LocationError::NoResults(query.to_string()));
        };

        let row = self
            .store
            .locations()
            .insert(
                query,
                &first.formatted_address,
                first.geometry.location.lat,
                first.geometry.location.lng,
            )
            .await
            .map_err(|e| LocationError::Database(e.to_string()))?;

        info!(query, formatted = %row.formatted_query, id = row.id, "resolved new location");
        Ok(row.into())
    }
}
