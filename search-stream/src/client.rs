//! Client facade wiring both stream operators to one engine.
//!
//! Application code uses this to stream scroll searches and bulk-write
//! intent streams without constructing the operators individually.

use std::sync::Arc;

use futures::stream::Stream;

use search_stream_repository::RemoteSearchEngine;
use search_stream_shared::{BulkResponse, Hit, ScrollQuery, WriteIntent};

use crate::bulk::{BulkBatcher, BulkConfig};
use crate::errors::StreamError;
use crate::scroll::{ScrollConfig, ScrollStreamer};

/// The main entry point for streaming against a remote search engine.
///
/// Owns both operators over one shared engine handle. The engine is an
/// externally-owned collaborator; the client never mutates its connection
/// state.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use futures::StreamExt;
/// use search_stream::{OpenSearchEngine, ScrollQuery, SearchStreamClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = Arc::new(OpenSearchEngine::new("http://localhost:9200")?);
/// let client = SearchStreamClient::new(engine);
///
/// let mut hits = Box::pin(client.stream_search(
///     ScrollQuery::match_all().with_index("articles").with_limit(25),
/// ));
/// while let Some(hit) = hits.next().await {
///     println!("{}", hit?.id);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SearchStreamClient {
    scroll: ScrollStreamer,
    bulk: BulkBatcher,
}

impl SearchStreamClient {
    /// Create a client with default scroll and bulk configuration.
    pub fn new(engine: Arc<dyn RemoteSearchEngine>) -> Self {
        Self {
            scroll: ScrollStreamer::new(Arc::clone(&engine)),
            bulk: BulkBatcher::new(engine),
        }
    }

    /// Create a client with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `engine` - The remote engine both operators run against
    /// * `scroll_config` - Scroll expansion configuration
    /// * `bulk_config` - Bulk batching configuration
    ///
    /// # Returns
    ///
    /// * `Ok(SearchStreamClient)` - A configured client
    /// * `Err(StreamError)` - If the configuration is invalid
    pub fn with_config(
        engine: Arc<dyn RemoteSearchEngine>,
        scroll_config: ScrollConfig,
        bulk_config: BulkConfig,
    ) -> Result<Self, StreamError> {
        if bulk_config.batch_size == 0 {
            return Err(StreamError::invalid_config(
                "batch_size must be greater than zero",
            ));
        }
        if bulk_config.dispatch_concurrency == 0 {
            return Err(StreamError::invalid_config(
                "dispatch_concurrency must be greater than zero",
            ));
        }
        if scroll_config.default_page_size == 0 {
            return Err(StreamError::invalid_config(
                "default_page_size must be greater than zero",
            ));
        }

        Ok(Self {
            scroll: ScrollStreamer::with_config(Arc::clone(&engine), scroll_config),
            bulk: BulkBatcher::with_config(engine, bulk_config),
        })
    }

    /// Stream all hits matching the query.
    ///
    /// See [`ScrollStreamer::stream`] for termination and truncation
    /// semantics.
    pub fn stream_search(
        &self,
        query: ScrollQuery,
    ) -> impl Stream<Item = Result<Hit, StreamError>> + Send + 'static {
        self.scroll.stream(query)
    }

    /// Batch a stream of write intents into bulk calls.
    ///
    /// See [`BulkBatcher::apply`] for batching and ordering semantics.
    pub fn bulk_stream<S>(
        &self,
        intents: S,
    ) -> impl Stream<Item = Result<BulkResponse, StreamError>> + Send + 'static
    where
        S: Stream<Item = WriteIntent> + Send + 'static,
    {
        self.bulk.apply(intents)
    }
}
