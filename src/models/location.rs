use serde::{Deserialize, Serialize};

use crate::entities::locations;

/// A resolved geographic point plus the query text it was resolved from.
///
/// This is both the `/location` response body and the payload category
/// endpoints receive back in their `data` query parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i32,
    pub search_query: String,
    pub formatted_query: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<locations::Model> for Location {
    fn from(model: locations::Model) -> Self {
        Self {
            id: model.id,
            search_query: model.search_query,
            formatted_query: model.formatted_query,
            latitude: model.latitude,
            longitude: model.longitude,
        }
    }
}
