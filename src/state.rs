use std::sync::Arc;

use tokio::sync::RwLock;

use crate::clients::darksky::DarkSkyClient;
use crate::clients::geocode::GeocodeClient;
use crate::clients::hiking_project::HikingProjectClient;
use crate::clients::meetup::MeetupClient;
use crate::clients::tmdb::TmdbClient;
use crate::clients::yelp::YelpClient;
use crate::config::Config;
use crate::constants::USER_AGENT;
use crate::db::Store;
use crate::services::LocationService;

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Reused across every provider client for connection pooling.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub location_service: Arc<LocationService>,

    pub weather: Arc<DarkSkyClient>,

    pub yelp: Arc<YelpClient>,

    pub movies: Arc<TmdbClient>,

    pub meetup: Arc<MeetupClient>,

    pub trails: Arc<HikingProjectClient>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let http_client =
            build_shared_http_client(config.providers.request_timeout_seconds.into())?;

        let geocode = Arc::new(GeocodeClient::new(
            http_client.clone(),
            &config.providers.geocode,
        ));
        let weather = Arc::new(DarkSkyClient::new(
            http_client.clone(),
            &config.providers.weather,
        ));
        let yelp = Arc::new(YelpClient::new(http_client.clone(), &config.providers.yelp));
        let movies = Arc::new(TmdbClient::new(
            http_client.clone(),
            &config.providers.movies,
        ));
        let meetup = Arc::new(MeetupClient::new(
            http_client.clone(),
            &config.providers.meetup,
        ));
        let trails = Arc::new(HikingProjectClient::new(
            http_client,
            &config.providers.trails,
        ));

        let location_service = Arc::new(LocationService::new(store.clone(), geocode));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            location_service,
            weather,
            yelp,
            movies,
            meetup,
            trails,
        })
    }
}
