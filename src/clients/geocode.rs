use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ProviderEndpoint;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeocodeClient {
    #[must_use]
    pub fn new(client: Client, endpoint: &ProviderEndpoint) -> Self {
        Self {
            client,
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
            api_key: endpoint.api_key.clone(),
        }
    }

    /// Zero results is a valid response here; the caller decides whether
    /// that is an error.
    pub async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>> {
        let url = format!(
            "{}/json?address={}&key={}",
            self.base_url,
            urlencoding::encode(address),
            self.api_key
        );
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Geocoding API error: {} - {}", status, body));
        }

        let response: GeocodeResponse = response.json().await?;

        Ok(response.results)
    }
}
