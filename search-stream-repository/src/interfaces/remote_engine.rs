//! Remote search engine trait definition.
//!
//! This module defines the abstract interface for the cursor-paginated
//! search and bulk write operations the stream operators are built on,
//! allowing for different backend implementations (OpenSearch,
//! Elasticsearch, etc.).

use std::time::Duration;

use async_trait::async_trait;

use search_stream_shared::{BulkOptions, BulkResponse, ResultPage, ScrollQuery, WireBulkBody};

use crate::errors::EngineError;

/// Abstracts the underlying search engine implementation.
///
/// Implementations are injected into the stream operators to enable
/// dependency injection and easy testing with mock implementations. Every
/// call is stateless from the caller's perspective aside from the cursor
/// token passed back into `scroll_continue`; implementations must not
/// require any other shared mutable state between calls.
///
/// All methods return `Result<T, EngineError>` for consistent error
/// handling across backends.
#[async_trait]
pub trait RemoteSearchEngine: Send + Sync {
    /// Issue the initial search call, opening a scroll context.
    ///
    /// # Arguments
    ///
    /// * `query` - The query to execute
    /// * `page_size` - Number of hits per page
    /// * `scroll_window` - Server-side validity window for the cursor
    ///
    /// # Returns
    ///
    /// * `Ok(ResultPage)` - The first page, with a cursor token if more
    ///   pages may exist
    /// * `Err(EngineError)` - If the call fails
    async fn search(
        &self,
        query: &ScrollQuery,
        page_size: usize,
        scroll_window: Duration,
    ) -> Result<ResultPage, EngineError>;

    /// Fetch the next page of an open scroll context.
    ///
    /// A continuation issued after the cursor's validity window expired
    /// fails with an `EngineError`, not a local defect.
    ///
    /// # Arguments
    ///
    /// * `scroll_id` - Cursor token from the previous page
    /// * `scroll_window` - Renewed validity window for the cursor
    ///
    /// # Returns
    ///
    /// * `Ok(ResultPage)` - The next page
    /// * `Err(EngineError)` - If the call fails
    async fn scroll_continue(
        &self,
        scroll_id: &str,
        scroll_window: Duration,
    ) -> Result<ResultPage, EngineError>;

    /// Submit one serialized bulk body.
    ///
    /// # Arguments
    ///
    /// * `body` - The flat metadata/payload entry sequence
    /// * `options` - Caller-supplied options merged into the request
    ///
    /// # Returns
    ///
    /// * `Ok(BulkResponse)` - The engine's per-item results
    /// * `Err(EngineError)` - If the call fails as a whole
    async fn bulk_write(
        &self,
        body: WireBulkBody,
        options: &BulkOptions,
    ) -> Result<BulkResponse, EngineError>;
}
