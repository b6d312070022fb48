//! OpenSearch engine implementation.
//!
//! This module provides the concrete implementation of `RemoteSearchEngine`
//! using the OpenSearch Rust crate.

use std::time::Duration;

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    params::Refresh,
    BulkParts, OpenSearch, ScrollParts, SearchParts,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use url::Url;

use search_stream_shared::{BulkOptions, BulkResponse, Hit, ResultPage, ScrollQuery, WireBulkBody};

use crate::errors::EngineError;
use crate::interfaces::RemoteSearchEngine;

/// OpenSearch engine implementation.
///
/// Backs the stream operators with a real OpenSearch cluster. The
/// connection is owned here but never mutated between calls; every
/// operation is a standalone request.
///
/// # Example
///
/// ```ignore
/// use search_stream_repository::OpenSearchEngine;
///
/// let engine = OpenSearchEngine::new("http://localhost:9200")?;
/// ```
pub struct OpenSearchEngine {
    client: OpenSearch,
}

impl OpenSearchEngine {
    /// Create a new engine connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchEngine)` - A new engine instance
    /// * `Err(EngineError)` - If connection setup fails
    pub fn new(url: &str) -> Result<Self, EngineError> {
        let parsed_url = Url::parse(url).map_err(|e| EngineError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| EngineError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch engine");

        Ok(Self { client })
    }

    /// Format a scroll window as the engine's duration literal.
    fn format_window(window: Duration) -> String {
        format!("{}s", window.as_secs())
    }
}

#[async_trait]
impl RemoteSearchEngine for OpenSearchEngine {
    async fn search(
        &self,
        query: &ScrollQuery,
        page_size: usize,
        scroll_window: Duration,
    ) -> Result<ResultPage, EngineError> {
        let indices: Vec<&str> = query.indices.iter().map(String::as_str).collect();
        let parts = if indices.is_empty() {
            SearchParts::None
        } else {
            SearchParts::Index(&indices)
        };
        let window = Self::format_window(scroll_window);

        let response = self
            .client
            .search(parts)
            .scroll(&window)
            .size(page_size as i64)
            .body(query.body.clone())
            .send()
            .await
            .map_err(|e| EngineError::search(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Search request failed");
            return Err(EngineError::search(format!(
                "Search failed with status {}: {}",
                status, error_body
            )));
        }

        let raw: RawScrollResponse = response
            .json()
            .await
            .map_err(|e| EngineError::parse(e.to_string()))?;

        let page = raw.into_page();
        debug!(
            hits = page.len(),
            total = page.total,
            has_cursor = page.scroll_id.is_some(),
            "Search page received"
        );
        Ok(page)
    }

    async fn scroll_continue(
        &self,
        scroll_id: &str,
        scroll_window: Duration,
    ) -> Result<ResultPage, EngineError> {
        let window = Self::format_window(scroll_window);

        let response = self
            .client
            .scroll(ScrollParts::None)
            .body(json!({
                "scroll": window,
                "scroll_id": scroll_id,
            }))
            .send()
            .await
            .map_err(|e| EngineError::scroll(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Scroll request failed");
            return Err(EngineError::scroll(format!(
                "Scroll failed with status {}: {}",
                status, error_body
            )));
        }

        let raw: RawScrollResponse = response
            .json()
            .await
            .map_err(|e| EngineError::parse(e.to_string()))?;

        let page = raw.into_page();
        debug!(
            hits = page.len(),
            has_cursor = page.scroll_id.is_some(),
            "Scroll page received"
        );
        Ok(page)
    }

    async fn bulk_write(
        &self,
        body: WireBulkBody,
        options: &BulkOptions,
    ) -> Result<BulkResponse, EngineError> {
        let entry_count = body.len();
        let lines: Vec<JsonBody<Value>> =
            body.into_entries().into_iter().map(JsonBody::new).collect();

        let mut request = self.client.bulk(BulkParts::None).body(lines);

        if let Some(refresh) = options.refresh.as_deref() {
            match parse_refresh(refresh) {
                Some(refresh) => request = request.refresh(refresh),
                None => warn!(refresh = %refresh, "Ignoring unknown refresh value"),
            }
        }
        if let Some(timeout) = options.timeout.as_deref() {
            request = request.timeout(timeout);
        }
        if let Some(pipeline) = options.pipeline.as_deref() {
            request = request.pipeline(pipeline);
        }
        if let Some(shards) = options.wait_for_active_shards.as_deref() {
            request = request.wait_for_active_shards(shards);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EngineError::bulk(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(EngineError::bulk(format!(
                "Bulk failed with status {}: {}",
                status, error_body
            )));
        }

        let bulk_response: BulkResponse = response
            .json()
            .await
            .map_err(|e| EngineError::parse(e.to_string()))?;

        debug!(
            entries = entry_count,
            items = bulk_response.items.len(),
            errors = bulk_response.errors,
            "Bulk response received"
        );
        Ok(bulk_response)
    }
}

/// Map a refresh option string onto the crate's refresh parameter.
fn parse_refresh(value: &str) -> Option<Refresh> {
    match value.to_lowercase().as_str() {
        "true" => Some(Refresh::True),
        "false" => Some(Refresh::False),
        "wait_for" | "waitfor" => Some(Refresh::WaitFor),
        _ => None,
    }
}

/// Raw scroll/search response shape, limited to the fields the expansion
/// step needs: the cursor token, the hits, and the total count.
#[derive(Debug, Deserialize)]
struct RawScrollResponse {
    #[serde(rename = "_scroll_id")]
    scroll_id: Option<String>,
    #[serde(default)]
    hits: RawHits,
}

#[derive(Debug, Default, Deserialize)]
struct RawHits {
    #[serde(default, deserialize_with = "deserialize_total")]
    total: u64,
    #[serde(default)]
    hits: Vec<Hit>,
}

impl RawScrollResponse {
    fn into_page(self) -> ResultPage {
        ResultPage::new(self.scroll_id, self.hits.hits, self.hits.total)
    }
}

/// Accept both total formats the engine may report: a bare number (older
/// servers) or a `{value, relation}` object.
fn deserialize_total<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Total {
        Bare(u64),
        Tracked { value: u64 },
    }

    Ok(match Total::deserialize(deserializer)? {
        Total::Bare(value) => value,
        Total::Tracked { value } => value,
    })
}
