use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};

use crate::entities::{locations, prelude::*};

pub struct LocationRepository {
    conn: DatabaseConnection,
}

impl LocationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_query(&self, query: &str) -> Result<Option<locations::Model>> {
        let row = Locations::find()
            .filter(locations::Column::SearchQuery.eq(query))
            .one(&self.conn)
            .await?;
        Ok(row)
    }

    /// Conflict-safe insert: the unique index on `search_query` turns a
    /// concurrent duplicate into a no-op, and the re-select returns
    /// whichever row won.
    pub async fn insert(
        &self,
        query: &str,
        formatted: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<locations::Model> {
        let active_model = locations::ActiveModel {
            search_query: Set(query.to_string()),
            formatted_query: Set(formatted.to_string()),
            latitude: Set(latitude),
            longitude: Set(longitude),
            ..Default::default()
        };

        let insert = Locations::insert(active_model).on_conflict(
            OnConflict::column(locations::Column::SearchQuery)
                .do_nothing()
                .to_owned(),
        );

        match insert.exec(&self.conn).await {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }

        self.find_by_query(query)
            .await?
            .ok_or_else(|| anyhow::anyhow!("location '{query}' missing after insert"))
    }
}
