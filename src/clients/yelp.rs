use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ProviderEndpoint;
use crate::models::{Location, Restaurant};
use crate::services::freshness::ProviderFetcher;

#[derive(Debug, Deserialize)]
struct BusinessSearchResponse {
    businesses: Vec<Business>,
}

#[derive(Debug, Deserialize)]
struct Business {
    name: String,
    url: String,
    rating: f32,
    price: Option<String>,
    image_url: Option<String>,
}

/// Restaurant listings around a point, bearer-token authenticated.
#[derive(Clone)]
pub struct YelpClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YelpClient {
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
impl ProviderFetcher for YelpClient {
    type Draft = Restaurant;

    fn service_name(&self) -> &'static str {
        "Yelp"
    }

    async fn fetch(&self, location: &Location) -> Result<Vec<Restaurant>> {
        let url = format!(
            "{}/businesses/search?term=restaurants&latitude={}&longitude={}",
            self.base_url, location.latitude, location.longitude
        );
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Yelp API error: {} - {}", status, body));
        }

        let response: BusinessSearchResponse = response.json().await?;

        Ok(response
            .businesses
            .into_iter()
            .map(|business| Restaurant {
                name: business.name,
                url: business.url,
                rating: business.rating,
                price: business.price,
                image_url: business.image_url,
            })
            .collect())
    }
}
