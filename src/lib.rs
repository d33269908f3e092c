//! # Tweetsweep Library
//!
//! A collector for the Twitter search API that walks result history
//! backwards through `max_id` cursors, flattens each tweet into a fixed-shape
//! row, and persists rows to a streaming CSV file or periodic JSON snapshots.
//!
//! ## Components
//!
//! - [`config`]: credential loading from a local secrets file
//! - [`oauth`]: OAuth 1.0a request signing
//! - [`twitter`]: the search client, payload models, and backward paginator
//! - [`record`]: flattening of raw results into output rows
//! - [`sink`]: the streaming CSV and batch snapshot destinations
//!
//! ## Configuration
//!
//! A `secrets.toml` file with the four API credential values is required at
//! startup; see [`config::ApiCredentials`]. Logging is controlled with the
//! `RUST_LOG` environment variable.

pub mod config;
pub mod oauth;
pub mod record;
pub mod sink;
pub mod twitter;

// Re-export commonly used types and functions
pub use config::ApiCredentials;
pub use record::{flatten, FlatRecord};
pub use sink::{CsvSink, SnapshotSink};
pub use twitter::{build_search_term, Paginator, SearchClient, SearchQuery, SearchSource, Status};
