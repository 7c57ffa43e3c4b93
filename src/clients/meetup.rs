use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::format_display_date;
use crate::config::ProviderEndpoint;
use crate::models::{Location, Meetup};
use crate::services::freshness::ProviderFetcher;

#[derive(Debug, Deserialize)]
struct OpenEventsResponse {
    results: Vec<OpenEvent>,
}

#[derive(Debug, Deserialize)]
struct OpenEvent {
    name: String,
    event_url: String,
    /// Creation time in milliseconds since the epoch.
    created: i64,
    group: EventGroup,
}

#[derive(Debug, Deserialize)]
struct EventGroup {
    name: String,
}

/// Upcoming public events near a point.
#[derive(Clone)]
pub struct MeetupClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MeetupClient {
    #[must_use]
    pub fn new(client: Client, endpoint: &ProviderEndpoint) -> Self {
        Self {
            client,
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
            api_key: endpoint.api_key.clone(),
        }
    }
}

#[async_trait]
impl ProviderFetcher for MeetupClient {
    type Draft = Meetup;

    fn service_name(&self) -> &'static str {
        "Meetup"
    }

    async fn fetch(&self, location: &Location) -> Result<Vec<Meetup>> {
        let url = format!(
            "{}/2/open_events?lat={}&lon={}&key={}&sign=true&only=group,event_url,name,created&page=10",
            self.base_url, location.latitude, location.longitude, self.api_key
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Meetup API error: {} - {}", status, body));
        }

        let response: OpenEventsResponse = response.json().await?;

        Ok(response
            .results
            .into_iter()
            .map(|event| Meetup {
                link: event.event_url,
                name: event.name,
                host: event.group.name,
                creation_date: format_display_date(event.created / 1000),
            })
            .collect())
    }
}
