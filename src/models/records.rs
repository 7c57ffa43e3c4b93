//! Normalized provider records, one shape per category.
//!
//! These are what the provider fetchers hand to the category store; the
//! store stamps them with `location_id` and a batch `created_at` on insert.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherDay {
    pub forecast: String,
    /// Display date, e.g. "Mon, Jan 1, 2018".
    pub time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    pub name: String,
    pub url: String,
    pub rating: f32,
    pub price: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub title: String,
    pub released_on: Option<String>,
    pub total_votes: i32,
    pub average_votes: f32,
    pub popularity: f32,
    pub image_url: String,
    pub overview: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meetup {
    pub link: String,
    pub name: String,
    pub host: String,
    pub creation_date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    pub name: String,
    pub location: String,
    pub length: f32,
    pub stars: f32,
    pub star_votes: i32,
    pub summary: String,
    pub trail_url: String,
    pub conditions: String,
    pub condition_date: String,
    pub condition_time: String,
}
