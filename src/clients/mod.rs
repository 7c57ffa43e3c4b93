pub mod darksky;
pub mod geocode;
pub mod hiking_project;
pub mod meetup;
pub mod tmdb;
pub mod yelp;

use chrono::DateTime;

/// Display-date format shared by the weather and meetup feeds,
/// e.g. "Mon, Jan 1, 2018".
pub(crate) fn format_display_date(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .format("%a, %b %-d, %Y")
        .to_string()
}
