//! Flattening of raw search results into fixed-shape output rows.
//!
//! [`flatten`] is a pure function from a [`Status`] to a [`FlatRecord`]; all
//! I/O lives in the sinks. The one way it can fail is the creation-time
//! parse, which assumes the API's fixed textual layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::twitter::Status;

/// The textual layout of `created_at` in v1.1 payloads,
/// e.g. `Thu Jun 13 21:21:39 +0000 2019`.
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// One output row, derived 1:1 from a search result.
///
/// Field order is the column order of the CSV output; the header row is
/// [`FlatRecord::FIELD_NAMES`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    /// Creation time exactly as the API sent it.
    pub date: String,
    /// Creation time as UTC epoch seconds.
    pub timestamp: i64,
    pub id: u64,
    /// Tweet body with newlines normalized to spaces.
    pub text: String,
    pub user_handle: String,
    pub user_id: u64,
    pub followers_count: u64,
    pub favorite_count: u64,
    pub retweet_count: u64,
    /// Whether the normalized text starts with the literal marker `RT`.
    pub is_retweet: bool,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl FlatRecord {
    /// Column names, in field order.
    pub const FIELD_NAMES: [&'static str; 12] = [
        "date",
        "timestamp",
        "id",
        "text",
        "user_handle",
        "user_id",
        "followers_count",
        "favorite_count",
        "retweet_count",
        "is_retweet",
        "city",
        "country",
    ];
}

/// Replaces embedded newlines with single spaces.
fn normalize_text(text: &str) -> String {
    text.replace("\r\n", " ").replace('\n', " ").replace('\r', " ")
}

/// Parses a `created_at` string into UTC epoch seconds.
///
/// The layout is fixed ([`CREATED_AT_FORMAT`]); anything else is an error.
/// The collector deliberately does not recover from a mismatch, so a
/// malformed timestamp fails the run at that record.
pub fn parse_created_at(
    created_at: &str,
) -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
    let parsed = DateTime::parse_from_str(created_at, CREATED_AT_FORMAT)?;
    Ok(parsed.with_timezone(&Utc).timestamp())
}

/// Flattens a search result into an output row.
///
/// Deterministic and free of I/O. A missing place yields null city/country
/// rather than an error; the only failure path is [`parse_created_at`].
pub fn flatten(status: &Status) -> Result<FlatRecord, Box<dyn std::error::Error + Send + Sync>> {
    let text = normalize_text(&status.full_text);
    let is_retweet = text.starts_with("RT");
    let timestamp = parse_created_at(&status.created_at)?;

    let (city, country) = match &status.place {
        Some(place) => (Some(place.name.clone()), Some(place.country.clone())),
        None => (None, None),
    };

    Ok(FlatRecord {
        date: status.created_at.clone(),
        timestamp,
        id: status.id,
        text,
        user_handle: status.user.screen_name.clone(),
        user_id: status.user.id,
        followers_count: status.user.followers_count,
        favorite_count: status.favorite_count,
        retweet_count: status.retweet_count,
        is_retweet,
        city,
        country,
    })
}
