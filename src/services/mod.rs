pub mod freshness;
pub mod location;

pub use freshness::{
    CacheStamped, CategoryError, CategoryStore, Decision, ProviderFetcher, evaluate, rows_or_fetch,
};
pub use location::{LocationError, LocationService};
