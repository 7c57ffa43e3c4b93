use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::format_display_date;
use crate::config::ProviderEndpoint;
use crate::models::{Location, WeatherDay};
use crate::services::freshness::ProviderFetcher;

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    data: Vec<DailyForecast>,
}

#[derive(Debug, Deserialize)]
struct DailyForecast {
    summary: String,
    time: i64,
}

/// Daily forecasts, one record per forecast day.
#[derive(Clone)]
pub struct DarkSkyClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DarkSkyClient {
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
impl ProviderFetcher for DarkSkyClient {
    type Draft = WeatherDay;

    fn service_name(&self) -> &'static str {
        "Dark Sky"
    }

    async fn fetch(&self, location: &Location) -> Result<Vec<WeatherDay>> {
        let url = format!(
            "{}/forecast/{}/{},{}",
            self.base_url, self.api_key, location.latitude, location.longitude
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Dark Sky API error: {} - {}", status, body));
        }

        let response: ForecastResponse = response.json().await?;

        Ok(response
            .daily
            .data
            .into_iter()
            .map(|day| WeatherDay {
                forecast: day.summary,
                time: format_display_date(day.time),
            })
            .collect())
    }
}
