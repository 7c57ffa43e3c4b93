use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::models::Location;

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    /// Raw search text, e.g. "1000 Main St".
    pub data: String,
}

pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Location>, ApiError> {
    if query.data.trim().is_empty() {
        return Err(ApiError::validation("Missing location query"));
    }

    let location = state.location_service().resolve(&query.data).await?;
    Ok(Json(location))
}
