pub mod location;
pub mod records;

pub use location::Location;
pub use records::{Meetup, Movie, Restaurant, Trail, WeatherDay};
