//! Scroll query types.
//!
//! This module defines the query structure driving a scroll search and the
//! page-size resolution rules that bound the number of round trips.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default page size when no total-result cap is set.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Maximum page size when a total-result cap is set.
///
/// Capped queries use small pages so the round-trip budget is known in
/// advance: `ceil(limit / page_size)` pages.
pub const MAX_CAPPED_PAGE_SIZE: usize = 10;

/// Parameters for a scroll search.
///
/// This struct represents a search request that will be expanded into a
/// flat sequence of hits, optionally bounded by a total-result cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollQuery {
    /// The query body, in the engine's query DSL.
    pub body: Value,

    /// Target indices. Empty means all indices.
    #[serde(default)]
    pub indices: Vec<String>,

    /// Caller-requested page size.
    /// Ignored when `limit` is set; defaults to [`DEFAULT_PAGE_SIZE`] otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,

    /// Total-result cap.
    /// When set, the stream emits at most this many hits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl ScrollQuery {
    /// Create a query from a raw query body.
    ///
    /// # Example
    ///
    /// ```
    /// use search_stream_shared::ScrollQuery;
    /// use serde_json::json;
    ///
    /// let query = ScrollQuery::new(json!({ "query": { "term": { "tag": "rust" } } }));
    /// ```
    pub fn new(body: Value) -> Self {
        Self {
            body,
            indices: Vec::new(),
            size: None,
            limit: None,
        }
    }

    /// Create a match-all query.
    pub fn match_all() -> Self {
        Self::new(serde_json::json!({ "query": { "match_all": {} } }))
    }

    /// Restrict the query to one index.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.indices.push(index.into());
        self
    }

    /// Set the requested page size.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Cap the total number of emitted hits.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Resolve the effective page size for this query.
    ///
    /// With a cap set, the page size is the lesser of the cap and
    /// [`MAX_CAPPED_PAGE_SIZE`]; otherwise it is the caller-requested size
    /// or `default_size`.
    pub fn resolved_page_size(&self, default_size: usize) -> usize {
        match self.limit {
            Some(cap) => cap.min(MAX_CAPPED_PAGE_SIZE),
            None => self.size.unwrap_or(default_size),
        }
    }

    /// Number of pages the expansion may fetch, if the query is capped.
    ///
    /// Returns `None` for uncapped queries: the expansion then runs until
    /// the engine reports exhaustion.
    pub fn page_budget(&self, page_size: usize) -> Option<usize> {
        self.limit.map(|cap| {
            if page_size == 0 {
                0
            } else {
                cap.div_ceil(page_size)
            }
        })
    }

    /// Validate the query parameters.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if !self.body.is_object() {
            return Err("Query body must be a JSON object".to_string());
        }

        if self.size == Some(0) {
            return Err("Page size must be greater than zero".to_string());
        }

        if self.indices.iter().any(|index| index.is_empty()) {
            return Err("Index names cannot be empty".to_string());
        }

        Ok(())
    }
}
