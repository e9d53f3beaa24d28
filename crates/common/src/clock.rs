//! Clock helpers.
//!
//! Output file names are stamped with Unix milliseconds so that two
//! sessions never collide, and the layout caption carries the local date.

use chrono::{DateTime, Local, Utc};

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Build a timestamped file name such as `pixelpop-photos-1700000000000.jpg`.
pub fn stamped_file_name(prefix: &str, extension: &str) -> String {
    stamped_file_name_at(prefix, extension, unix_millis())
}

/// Like [`stamped_file_name`], with an explicit timestamp.
pub fn stamped_file_name_at(prefix: &str, extension: &str, millis: i64) -> String {
    let extension = extension.trim_start_matches('.');
    format!("{prefix}-{millis}.{extension}")
}

/// Today's date formatted for the layout caption (`M/D/YYYY`).
pub fn caption_date() -> String {
    format_caption_date(&Local::now())
}

/// Format a timestamp the way the caption shows it.
pub fn format_caption_date<Tz: chrono::TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-m/%-d/%Y").to_string()
}
