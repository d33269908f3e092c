//! Backward pagination over the Twitter search API.
//!
//! The search endpoint returns pages newest-first and accepts a `max_id`
//! upper bound, so walking history means repeatedly re-querying with
//! `max_id` set just below the oldest tweet seen so far. [`Paginator`] owns
//! that loop and exposes the results as a lazy, ordered sequence.

use log::{debug, info};
use std::collections::VecDeque;

use super::client::SearchSource;
use super::models::Status;

/// Results per page. The search endpoint caps pages at 100.
pub const PAGE_SIZE: u32 = 100;

/// Joins a comma-separated term list into the single term string the API
/// expects.
///
/// # Example
///
/// ```
/// use tweetsweep::twitter::build_search_term;
///
/// assert_eq!(build_search_term("a,b,c"), "a OR b OR c");
/// assert_eq!(build_search_term("rustlang"), "rustlang");
/// ```
pub fn build_search_term(comma_sep_terms: &str) -> String {
    let entries: Vec<&str> = comma_sep_terms.split(',').collect();
    if entries.len() == 1 {
        // Single term to search
        return entries[0].to_string();
    }
    entries.join(" OR ")
}

/// Parameters for one search, mirroring the endpoint's query surface.
///
/// At least one of `term`, `geocode`, or `raw_query` must be set. `max_id`
/// is the merge slot the paginator rewrites between pages; callers normally
/// leave it `None`.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Free-text search term (`q`).
    pub term: Option<String>,
    /// Geo filter of the form `lat,long,radius`.
    pub geocode: Option<String>,
    /// A raw, pre-encoded query string. When set it replaces the other
    /// query fields entirely, except for the paginator's `max_id`.
    pub raw_query: Option<String>,
    /// Restrict results to a language code.
    pub lang: Option<String>,
    /// Page size, fixed at [`PAGE_SIZE`] by default.
    pub count: u32,
    /// Entity expansion. Kept off: the collector never reads entities.
    pub include_entities: bool,
    /// Upper bound on result ids (inclusive). Managed by the paginator.
    pub max_id: Option<u64>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        SearchQuery {
            term: None,
            geocode: None,
            raw_query: None,
            lang: None,
            count: PAGE_SIZE,
            include_entities: false,
            max_id: None,
        }
    }
}

impl SearchQuery {
    /// Checks that the query selects something.
    pub(crate) fn validate(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.term.is_none() && self.geocode.is_none() && self.raw_query.is_none() {
            return Err(
                "Search query must include at least one of: term, geocode, raw_query".into(),
            );
        }
        Ok(())
    }

    /// Renders the query as request parameters.
    ///
    /// A `raw_query` is split into its key/value pairs so the request can be
    /// signed; everything else is dropped in its favor. `max_id` is always
    /// appended when set.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = Vec::new();

        if let Some(raw) = &self.raw_query {
            params.extend(
                url::form_urlencoded::parse(raw.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned())),
            );
        } else {
            if let Some(term) = &self.term {
                params.push(("q".to_string(), term.clone()));
            }
            if let Some(geocode) = &self.geocode {
                params.push(("geocode".to_string(), geocode.clone()));
            }
            if let Some(lang) = &self.lang {
                params.push(("lang".to_string(), lang.clone()));
            }
            params.push(("count".to_string(), self.count.to_string()));
            params.push((
                "include_entities".to_string(),
                self.include_entities.to_string(),
            ));
            params.push(("tweet_mode".to_string(), "extended".to_string()));
        }

        if let Some(max_id) = self.max_id {
            params.push(("max_id".to_string(), max_id.to_string()));
        }

        params
    }
}

/// A lazy backward walk over search results.
///
/// The first fetch runs the query as given; every later fetch merges in
/// `max_id = cursor - 1`, where the cursor is the id of the last (oldest)
/// item of the previous page. The walk ends at the first empty page, or
/// after draining the first page whose last id fell below `start_id`.
///
/// The lower-bound check happens only between pages, so the final page is
/// always emitted in full even when part of it is older than `start_id`.
/// Callers that need a strict lower bound must filter what they consume.
pub struct Paginator<'a, S: SearchSource + ?Sized> {
    source: &'a S,
    query: SearchQuery,
    start_id: u64,
    cursor: Option<u64>,
    buffer: VecDeque<Status>,
    started: bool,
    exhausted: bool,
}

impl<'a, S: SearchSource + ?Sized> Paginator<'a, S> {
    /// Creates a paginator over `source`.
    ///
    /// # Parameters
    ///
    /// - `source`: The search client (or a test double)
    /// - `start_id`: Tweet id marking the oldest tweet to search for
    /// - `query`: The search parameters; must select something
    ///
    /// # Errors
    ///
    /// Fails if the query names none of term, geocode, or raw_query.
    pub fn new(
        source: &'a S,
        start_id: u64,
        query: SearchQuery,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        query.validate()?;
        Ok(Paginator {
            source,
            query,
            start_id,
            cursor: None,
            buffer: VecDeque::new(),
            started: false,
            exhausted: false,
        })
    }

    /// The id of the oldest tweet seen so far, once the first page is in.
    pub fn cursor(&self) -> Option<u64> {
        self.cursor
    }

    /// Pulls the next tweet, fetching a new page when the current one is
    /// drained. Returns `Ok(None)` once the walk is exhausted.
    ///
    /// Fetches may block for as long as the underlying client chooses to
    /// wait out a rate limit. Errors from the source propagate as-is; the
    /// paginator performs no retries of its own.
    pub async fn next_status(
        &mut self,
    ) -> Result<Option<Status>, Box<dyn std::error::Error + Send + Sync>> {
        loop {
            if let Some(status) = self.buffer.pop_front() {
                return Ok(Some(status));
            }
            if self.exhausted {
                return Ok(None);
            }

            if !self.started {
                self.started = true;
                let page = self.source.search(&self.query).await?;
                if page.is_empty() {
                    debug!("First page is empty, nothing to collect");
                    self.exhausted = true;
                    return Ok(None);
                }
                info!("Fetched first page: {} results", page.len());
                if let Some(last) = page.last() {
                    self.cursor = Some(last.id);
                }
                self.buffer.extend(page);
                continue;
            }

            let cursor = match self.cursor {
                Some(cursor) => cursor,
                None => {
                    self.exhausted = true;
                    return Ok(None);
                }
            };
            if cursor < self.start_id {
                debug!(
                    "Cursor {} passed start id {}, stopping",
                    cursor, self.start_id
                );
                self.exhausted = true;
                return Ok(None);
            }

            self.query.max_id = Some(cursor.saturating_sub(1));
            let page = self.source.search(&self.query).await?;
            if page.is_empty() {
                debug!("Empty page at max_id {:?}, stopping", self.query.max_id);
                self.exhausted = true;
                return Ok(None);
            }
            if let Some(last) = page.last() {
                self.cursor = Some(last.id);
                info!("last seen: {} @ {}", last.id, last.created_at);
            }
            self.buffer.extend(page);
        }
    }
}
