pub const USER_AGENT: &str = concat!("Cityscout/", env!("CARGO_PKG_VERSION"));

pub mod movies {

    pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w200";

    pub const PLACEHOLDER_POSTER: &str = "http://media.graytvinc.com/images/810*607/Movie32.jpg";

    /// Overviews longer than this are cut to 251 chars plus an ellipsis.
    pub const OVERVIEW_MAX_CHARS: usize = 254;
}

pub mod trails {

    pub const MAX_DISTANCE_MILES: u32 = 10;
}
