//! Result record types for scroll searches.
//!
//! This module defines the hit and page structures produced by one round
//! trip to the remote engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single result record returned by the remote engine.
///
/// Field names follow the engine's wire format so hits round-trip through
/// serde unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hit {
    /// The document's unique identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// The index the document lives in.
    #[serde(rename = "_index", skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    /// Legacy mapping type, if the engine still reports one.
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,

    /// Relevance score from the engine.
    /// `None` for scroll contexts that skip scoring.
    #[serde(rename = "_score", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// The document body.
    #[serde(rename = "_source", default)]
    pub source: Value,
}

impl Hit {
    /// Create a hit with just an id and a source body.
    pub fn new(id: impl Into<String>, source: Value) -> Self {
        Self {
            id: id.into(),
            index: None,
            doc_type: None,
            score: None,
            source,
        }
    }
}

/// One page of results from the remote engine.
///
/// Produced once per round trip and consumed immediately by the scroll
/// expansion step to decide whether a continuation call is warranted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultPage {
    /// Cursor token identifying the server-side paging context.
    /// Present only while more pages may exist.
    pub scroll_id: Option<String>,

    /// The result records in this page, in engine order.
    pub hits: Vec<Hit>,

    /// Total number of matching documents across all pages.
    pub total: u64,
}

impl ResultPage {
    /// Create a new result page.
    pub fn new(scroll_id: Option<String>, hits: Vec<Hit>, total: u64) -> Self {
        Self {
            scroll_id,
            hits,
            total,
        }
    }

    /// Create an empty page with no cursor.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the number of hits in this page.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns true if this page carries no hits.
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Returns true if this page is exactly the requested page size.
    ///
    /// A short page signals the end of the result set in the bounded
    /// expansion variant.
    pub fn is_full(&self, page_size: usize) -> bool {
        self.hits.len() == page_size
    }
}
