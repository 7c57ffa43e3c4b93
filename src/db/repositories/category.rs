//! One generic repository behind all five category tables.
//!
//! The original duplicated a lookup/save pair per category; here each
//! entity describes its location column and how a normalized draft becomes
//! a row, and `CategoryRepository` supplies the shared persistence.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entities::{meetups, movies, restaurants, trails, weathers};
use crate::models::{Meetup, Movie, Restaurant, Trail, WeatherDay};
use crate::services::freshness::{CacheStamped, CategoryError, CategoryStore, parse_timestamp};

/// Implemented by each category entity so one repository can serve all of
/// them: which column carries the location FK, which column preserves
/// insertion order, and how a fetched draft becomes a row.
pub trait CategoryEntity: EntityTrait + Send + Sync {
    type Draft: Send + Sync;

    fn location_column() -> Self::Column;

    fn order_column() -> Self::Column;

    fn active_model(draft: Self::Draft, location_id: i32, created_at: &str) -> Self::ActiveModel;
}

pub struct CategoryRepository<E: CategoryEntity> {
    conn: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E: CategoryEntity> CategoryRepository<E> {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E> CategoryStore for CategoryRepository<E>
where
    E: CategoryEntity,
    E::Model: CacheStamped + IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: Send,
{
    type Record = E::Model;
    type Draft = E::Draft;

    async fn rows_for(&self, location_id: i32) -> Result<Vec<E::Model>, CategoryError> {
        let rows = E::find()
            .filter(E::location_column().eq(location_id))
            .order_by_asc(E::order_column())
            .all(&self.conn)
            .await?;
        Ok(rows)
    }

    async fn insert_all(
        &self,
        location_id: i32,
        drafts: Vec<E::Draft>,
    ) -> Result<Vec<E::Model>, CategoryError> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let created_at = Utc::now().to_rfc3339();
        let models: Vec<E::ActiveModel> = drafts
            .into_iter()
            .map(|draft| E::active_model(draft, location_id, &created_at))
            .collect();

        // Delete and insert in one transaction: two requests refilling the
        // same location concurrently converge on a single batch instead of
        // interleaving into duplicates.
        let txn = self.conn.begin().await?;
        E::delete_many()
            .filter(E::location_column().eq(location_id))
            .exec(&txn)
            .await?;
        E::insert_many(models).exec_without_returning(&txn).await?;
        txn.commit().await?;

        self.rows_for(location_id).await
    }

    async fn delete_all(&self, location_id: i32) -> Result<u64, CategoryError> {
        let result = E::delete_many()
            .filter(E::location_column().eq(location_id))
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected)
    }
}

impl CategoryEntity for weathers::Entity {
    type Draft = WeatherDay;

    fn location_column() -> Self::Column {
        weathers::Column::LocationId
    }

    fn order_column() -> Self::Column {
        weathers::Column::Id
    }

    fn active_model(draft: WeatherDay, location_id: i32, created_at: &str) -> Self::ActiveModel {
        weathers::ActiveModel {
            forecast: Set(draft.forecast),
            time: Set(draft.time),
            created_at: Set(created_at.to_string()),
            location_id: Set(location_id),
            ..Default::default()
        }
    }
}

impl CacheStamped for weathers::Model {
    fn cached_at(&self) -> DateTime<Utc> {
        parse_timestamp(&self.created_at)
    }
}

impl CategoryEntity for restaurants::Entity {
    type Draft = Restaurant;

    fn location_column() -> Self::Column {
        restaurants::Column::LocationId
    }

    fn order_column() -> Self::Column {
        restaurants::Column::Id
    }

    fn active_model(draft: Restaurant, location_id: i32, created_at: &str) -> Self::ActiveModel {
        restaurants::ActiveModel {
            name: Set(draft.name),
            url: Set(draft.url),
            rating: Set(draft.rating),
            price: Set(draft.price),
            image_url: Set(draft.image_url),
            created_at: Set(created_at.to_string()),
            location_id: Set(location_id),
            ..Default::default()
        }
    }
}

impl CacheStamped for restaurants::Model {
    fn cached_at(&self) -> DateTime<Utc> {
        parse_timestamp(&self.created_at)
    }
}

impl CategoryEntity for movies::Entity {
    type Draft = Movie;

    fn location_column() -> Self::Column {
        movies::Column::LocationId
    }

    fn order_column() -> Self::Column {
        movies::Column::Id
    }

    fn active_model(draft: Movie, location_id: i32, created_at: &str) -> Self::ActiveModel {
        movies::ActiveModel {
            title: Set(draft.title),
            released_on: Set(draft.released_on),
            total_votes: Set(draft.total_votes),
            average_votes: Set(draft.average_votes),
            popularity: Set(draft.popularity),
            image_url: Set(draft.image_url),
            overview: Set(draft.overview),
            created_at: Set(created_at.to_string()),
            location_id: Set(location_id),
            ..Default::default()
        }
    }
}

impl CacheStamped for movies::Model {
    fn cached_at(&self) -> DateTime<Utc> {
        parse_timestamp(&self.created_at)
    }
}

impl CategoryEntity for meetups::Entity {
    type Draft = Meetup;

    fn location_column() -> Self::Column {
        meetups::Column::LocationId
    }

    fn order_column() -> Self::Column {
        meetups::Column::Id
    }

    fn active_model(draft: Meetup, location_id: i32, created_at: &str) -> Self::ActiveModel {
        meetups::ActiveModel {
            link: Set(draft.link),
            name: Set(draft.name),
            host: Set(draft.host),
            creation_date: Set(draft.creation_date),
            created_at: Set(created_at.to_string()),
            location_id: Set(location_id),
            ..Default::default()
        }
    }
}

impl CacheStamped for meetups::Model {
    fn cached_at(&self) -> DateTime<Utc> {
        parse_timestamp(&self.created_at)
    }
}

impl CategoryEntity for trails::Entity {
    type Draft = Trail;

    fn location_column() -> Self::Column {
        trails::Column::LocationId
    }

    fn order_column() -> Self::Column {
        trails::Column::Id
    }

    fn active_model(draft: Trail, location_id: i32, created_at: &str) -> Self::ActiveModel {
        trails::ActiveModel {
            name: Set(draft.name),
            location: Set(draft.location),
            length: Set(draft.length),
            stars: Set(draft.stars),
            star_votes: Set(draft.star_votes),
            summary: Set(draft.summary),
            trail_url: Set(draft.trail_url),
            conditions: Set(draft.conditions),
            condition_date: Set(draft.condition_date),
            condition_time: Set(draft.condition_time),
            created_at: Set(created_at.to_string()),
            location_id: Set(location_id),
            ..Default::default()
        }
    }
}

impl CacheStamped for trails::Model {
    fn cached_at(&self) -> DateTime<Utc> {
        parse_timestamp(&self.created_at)
    }
}
