//! Twitter search API integration module.
//!
//! This module contains the authenticated search client, the typed payload
//! models, and the backward paginator that walks result history through
//! `max_id` cursors.

mod client;
mod models;
mod search;

// Re-export public API
pub use client::{SearchClient, SearchSource};
pub use models::{Place, SearchResponse, Status, TwitterUser};
pub use search::{build_search_term, Paginator, SearchQuery, PAGE_SIZE};
