//! Bulk request and response types.
//!
//! This module defines the wire body submitted to the bulk endpoint, the
//! per-request options merged into every bulk call, and the response
//! structures returned by the engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The flat, ordered body of one bulk request.
///
/// Entries alternate between a metadata object keyed by the action name and,
/// for payload-carrying intents, the raw payload value. Entry order matches
/// the arrival order of the originating intents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireBulkBody {
    entries: Vec<Value>,
}

impl WireBulkBody {
    /// Create an empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a body with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append one wire entry.
    pub fn push(&mut self, entry: Value) {
        self.entries.push(entry);
    }

    /// Returns the number of wire entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the body carries no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The wire entries, in order.
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    /// Consume the body, yielding its entries.
    pub fn into_entries(self) -> Vec<Value> {
        self.entries
    }
}

/// Caller-supplied options merged into every bulk call.
///
/// All fields are optional; absent fields fall back to the engine's
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOptions {
    /// Refresh behavior: "true", "false", or "wait_for".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,

    /// Per-request timeout, e.g. "1m".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Ingest pipeline to route documents through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<String>,

    /// Number of shard copies that must be active before proceeding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_active_shards: Option<String>,
}

impl BulkOptions {
    /// Set the refresh behavior.
    pub fn with_refresh(mut self, refresh: impl Into<String>) -> Self {
        self.refresh = Some(refresh.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    /// Set the ingest pipeline.
    pub fn with_pipeline(mut self, pipeline: impl Into<String>) -> Self {
        self.pipeline = Some(pipeline.into());
        self
    }

    /// Set the active-shard requirement.
    pub fn with_wait_for_active_shards(mut self, shards: impl Into<String>) -> Self {
        self.wait_for_active_shards = Some(shards.into());
        self
    }
}

/// Response to one bulk call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkResponse {
    /// Time the engine spent on the request, in milliseconds.
    pub took: u64,

    /// True if any item in the batch failed.
    pub errors: bool,

    /// Per-item results, in request order.
    #[serde(default)]
    pub items: Vec<BulkItem>,
}

impl BulkResponse {
    /// Item results that failed, in request order.
    pub fn failed_items(&self) -> impl Iterator<Item = &BulkItemStatus> {
        self.items
            .iter()
            .map(BulkItem::status)
            .filter(|status| status.error.is_some())
    }
}

/// Result of one item within a bulk response, keyed by its action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BulkItem {
    /// Result of an index operation.
    Index(BulkItemStatus),
    /// Result of a create operation.
    Create(BulkItemStatus),
    /// Result of an update operation.
    Update(BulkItemStatus),
    /// Result of a delete operation.
    Delete(BulkItemStatus),
}

impl BulkItem {
    /// The status carried by this item, regardless of action.
    pub fn status(&self) -> &BulkItemStatus {
        match self {
            Self::Index(status)
            | Self::Create(status)
            | Self::Update(status)
            | Self::Delete(status) => status,
        }
    }
}

/// Status of one bulk item operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkItemStatus {
    /// Index the operation targeted.
    #[serde(rename = "_index", skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    /// Document id the operation targeted.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// HTTP status for this item.
    pub status: u16,

    /// Outcome label, e.g. "created" or "deleted".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Error details when the item failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_body_preserves_order() {
        let mut body = WireBulkBody::with_capacity(2);
        body.push(json!({ "index": { "_id": "1" } }));
        body.push(json!({ "title": "first" }));

        assert_eq!(body.len(), 2);
        assert!(!body.is_empty());
        assert_eq!(body.entries()[0], json!({ "index": { "_id": "1" } }));
        assert_eq!(body.into_entries()[1], json!({ "title": "first" }));
    }

    #[test]
    fn test_bulk_options_builder() {
        let options = BulkOptions::default()
            .with_refresh("wait_for")
            .with_timeout("30s");

        assert_eq!(options.refresh.as_deref(), Some("wait_for"));
        assert_eq!(options.timeout.as_deref(), Some("30s"));
        assert!(options.pipeline.is_none());
    }

    #[test]
    fn test_bulk_response_deserialization() {
        let raw = json!({
            "took": 12,
            "errors": true,
            "items": [
                { "index": { "_index": "articles", "_id": "1", "status": 201, "result": "created" } },
                { "delete": { "_index": "articles", "_id": "2", "status": 404,
                              "error": { "type": "document_missing_exception" } } }
            ]
        });

        let response: BulkResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.took, 12);
        assert!(response.errors);
        assert_eq!(response.items.len(), 2);

        match &response.items[0] {
            BulkItem::Index(status) => {
                assert_eq!(status.id.as_deref(), Some("1"));
                assert_eq!(status.status, 201);
            }
            other => panic!("expected index item, got {:?}", other),
        }

        let failed: Vec<_> = response.failed_items().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].id.as_deref(), Some("2"));
    }

    #[test]
    fn test_bulk_response_without_items() {
        let raw = json!({ "took": 1, "errors": false });
        let response: BulkResponse = serde_json::from_value(raw).unwrap();
        assert!(response.items.is_empty());
        assert_eq!(response.failed_items().count(), 0);
    }
}
