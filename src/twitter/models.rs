//! Typed views of the v1.1 search API payloads.
//!
//! Only the fields the collector reads are modeled; everything else in the
//! response is ignored during deserialization.

use serde::{Deserialize, Deserializer};

/// Top-level body of `GET search/tweets.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// The page of results, newest first.
    #[serde(default)]
    pub statuses: Vec<Status>,
}

/// A single tweet as returned by the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    /// Creation time in the API's fixed textual layout,
    /// e.g. `Thu Jun 13 21:21:39 +0000 2019`.
    pub created_at: String,
    /// The 64-bit tweet identifier. Pagination cursors are derived from this.
    pub id: u64,
    /// The tweet body. With `tweet_mode=extended` the API calls this
    /// `full_text`; older payloads call it `text`.
    #[serde(alias = "text")]
    pub full_text: String,
    /// The author of the tweet.
    pub user: TwitterUser,
    #[serde(default)]
    pub favorite_count: u64,
    #[serde(default)]
    pub retweet_count: u64,
    /// The place the tweet was tagged with, when present and well-formed.
    /// Anything else (missing, `null`, or an unexpected shape) becomes `None`.
    #[serde(default, deserialize_with = "lenient_place")]
    pub place: Option<Place>,
}

/// The subset of the author object the collector records.
#[derive(Debug, Clone, Deserialize)]
pub struct TwitterUser {
    pub id: u64,
    pub screen_name: String,
    #[serde(default)]
    pub followers_count: u64,
}

/// A tagged place on a tweet.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub name: String,
    pub country: String,
}

/// Deserializes a `place` value without ever failing the record: any value
/// that is not an object with `name` and `country` strings yields `None`.
fn lenient_place<'de, D>(deserializer: D) -> Result<Option<Place>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
