use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ProviderEndpoint;
use crate::constants::trails::MAX_DISTANCE_MILES;
use crate::models::{Location, Trail};
use crate::services::freshness::ProviderFetcher;

#[derive(Debug, Deserialize)]
struct TrailsResponse {
    trails: Vec<TrailResult>,
}

#[derive(Debug, Deserialize)]
struct TrailResult {
    name: String,
    location: String,
    #[serde(default)]
    length: f32,
    #[serde(default)]
    stars: f32,
    #[serde(rename = "starVotes", default)]
    star_votes: i32,
    #[serde(default)]
    summary: String,
    url: String,
    #[serde(rename = "conditionStatus", default)]
    condition_status: String,
    #[serde(rename = "conditionDetails")]
    condition_details: Option<String>,
    #[serde(rename = "conditionDate")]
    condition_date: Option<String>,
}

/// Hiking trails within a fixed radius of a point.
#[derive(Clone)]
pub struct HikingProjectClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HikingProjectClient {
    #[must_use]
    pub fn new(client: Client, endpoint: &ProviderEndpoint) -> Self {
        Self {
            client,
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
            api_key: endpoint.api_key.clone(),
        }
    }
}

fn join_conditions(status: String, details: Option<String>) -> String {
    match details {
        Some(details) if !details.is_empty() => format!("{status} {details}"),
        _ => status,
    }
}

/// The feed reports conditions as "YYYY-MM-DD HH:MM:SS"; split it into its
/// date and time halves for display.
fn split_condition_date(raw: &str) -> (String, String) {
    let date = raw.get(..10).unwrap_or(raw).to_string();
    let time = raw.get(11..19).unwrap_or_default().to_string();
    (date, time)
}

#[async_trait]
impl ProviderFetcher for HikingProjectClient {
    type Draft = Trail;

    fn service_name(&self) -> &'static str {
        "Hiking Project"
    }

    async fn fetch(&self, location: &Location) -> Result<Vec<Trail>> {
        let url = format!(
            "{}/data/get-trails?lat={}&lon={}&maxDistance={}&key={}",
            self.base_url, location.latitude, location.longitude, MAX_DISTANCE_MILES, self.api_key
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Hiking Project API error: {} - {}",
                status,
                body
            ));
        }

        let response: TrailsResponse = response.json().await?;

        Ok(response
            .trails
            .into_iter()
            .map(|trail| {
                let (condition_date, condition_time) = trail
                    .condition_date
                    .as_deref()
                    .map(split_condition_date)
                    .unwrap_or_default();

                Trail {
                    name: trail.name,
                    location: trail.location,
                    length: trail.length,
                    stars: trail.stars,
                    star_votes: trail.star_votes,
                    summary: trail.summary,
                    trail_url: trail.url,
                    conditions: join_conditions(trail.condition_status, trail.condition_details),
                    condition_date,
                    condition_time,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_date_and_time() {
        let (date, time) = split_condition_date("2018-07-21 14:13:07");
        assert_eq!(date, "2018-07-21");
        assert_eq!(time, "14:13:07");
    }

    #[test]
    fn tolerates_short_values() {
        let (date, time) = split_condition_date("2018-07-21");
        assert_eq!(date, "2018-07-21");
        assert_eq!(time, "");
    }

    #[test]
    fn condition_details_are_appended_when_present() {
        assert_eq!(
            join_conditions("All Clear".to_string(), Some("Dry".to_string())),
            "All Clear Dry"
        );
        assert_eq!(join_conditions("All Clear".to_string(), None), "All Clear");
        assert_eq!(
            join_conditions("All Clear".to_string(), Some(String::new())),
            "All Clear"
        );
    }
}
