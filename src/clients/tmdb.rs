use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ProviderEndpoint;
use crate::constants::movies::{OVERVIEW_MAX_CHARS, PLACEHOLDER_POSTER, POSTER_BASE_URL};
use crate::models::{Location, Movie};
use crate::services::freshness::ProviderFetcher;

#[derive(Debug, Deserialize)]
struct MovieSearchResponse {
    results: Vec<MovieResult>,
}

#[derive(Debug, Deserialize)]
struct MovieResult {
    title: String,
    release_date: Option<String>,
    #[serde(default)]
    vote_count: i32,
    #[serde(default)]
    vote_average: f32,
    #[serde(default)]
    popularity: f32,
    poster_path: Option<String>,
    #[serde(default)]
    overview: String,
}

/// Movies matching the location's original query text (not its
/// coordinates; the movie database searches titles, not places).
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    #[must_use]
    pub fn new(client: Client, endpoint: &ProviderEndpoint) -> Self {
        Self {
            client,
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
            api_key: endpoint.api_key.clone(),
        }
    }
}

fn poster_url(poster_path: Option<&str>) -> String {
    poster_path.map_or_else(
        || PLACEHOLDER_POSTER.to_string(),
        |path| format!("{POSTER_BASE_URL}{path}"),
    )
}

fn truncate_overview(overview: String) -> String {
    if overview.chars().count() > OVERVIEW_MAX_CHARS {
        let mut cut: String = overview.chars().take(OVERVIEW_MAX_CHARS - 3).collect();
        cut.push_str("...");
        cut
    } else {
        overview
    }
}

#[async_trait]
impl ProviderFetcher for TmdbClient {
    type Draft = Movie;

    fn service_name(&self) -> &'static str {
        "TMDb"
    }

    async fn fetch(&self, location: &Location) -> Result<Vec<Movie>> {
        let url = format!(
            "{}/search/movie?api_key={}&query={}",
            self.base_url,
            self.api_key,
            urlencoding::encode(&location.search_query)
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("TMDb API error: {} - {}", status, body));
        }

        let response: MovieSearchResponse = response.json().await?;

        Ok(response
            .results
            .into_iter()
            .map(|movie| Movie {
                title: movie.title,
                released_on: movie.release_date,
                total_votes: movie.vote_count,
                average_votes: movie.vote_average,
                popularity: movie.popularity,
                image_url: poster_url(movie.poster_path.as_deref()),
                overview: truncate_overview(movie.overview),
            })
            .collect())
    }
}
