//! One thin handler per category; the shared behavior all lives in
//! `services::freshness`.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::entities::{meetups, movies, restaurants, trails, weathers};
use crate::models::Location;
use crate::services::freshness::rows_or_fetch;

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    /// A previously resolved Location, JSON-encoded.
    pub data: String,
}

impl CategoryQuery {
    fn location(&self) -> Result<Location, ApiError> {
        serde_json::from_str(&self.data)
            .map_err(|e| ApiError::validation(format!("Invalid location payload: {e}")))
    }
}

pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<weathers::Model>>, ApiError> {
    let location = query.location()?;
    let ttl = state.config().read().await.cache.weather_ttl();
    let rows = rows_or_fetch(
        &state.store().weathers(),
        state.shared.weather.as_ref(),
        &location,
        ttl,
    )
    .await?;
    Ok(Json(rows))
}

pub async fn get_restaurants(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<restaurants::Model>>, ApiError> {
    let location = query.location()?;
    let ttl = state.config().read().await.cache.restaurants_ttl();
    let rows = rows_or_fetch(
        &state.store().restaurants(),
        state.shared.yelp.as_ref(),
        &location,
        ttl,
    )
    .await?;
    Ok(Json(rows))
}

pub async fn get_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<movies::Model>>, ApiError> {
    let location = query.location()?;
    let ttl = state.config().read().await.cache.movies_ttl();
    let rows = rows_or_fetch(
        &state.store().movies(),
        state.shared.movies.as_ref(),
        &location,
        ttl,
    )
    .await?;
    Ok(Json(rows))
}

pub async fn get_meetups(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<meetups::Model>>, ApiError> {
    let location = query.location()?;
    let ttl = state.config().read().await.cache.meetups_ttl();
    let rows = rows_or_fetch(
        &state.store().meetups(),
        state.shared.meetup.as_ref(),
        &location,
        ttl,
    )
    .await?;
    Ok(Json(rows))
}

pub async fn get_trails(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<Vec<trails::Model>>, ApiError> {
    let location = query.location()?;
    let ttl = state.config().read().await.cache.trails_ttl();
    let rows = rows_or_fetch(
        &state.store().trails(),
        state.shared.trails.as_ref(),
        &location,
        ttl,
    )
    .await?;
    Ok(Json(rows))
}
