//! Scroll expansion operator.
//!
//! Turns a cursor-paginated search API into a single flat stream of hits.
//! The expansion is a self-feeding loop: each page's response decides
//! whether the next continuation call is issued. Suspension happens only
//! at remote-call boundaries, and dropping the stream stops all further
//! calls.

use std::mem;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use tracing::debug;

use search_stream_repository::RemoteSearchEngine;
use search_stream_shared::{Hit, ResultPage, ScrollQuery, DEFAULT_PAGE_SIZE};

use crate::errors::StreamError;

/// Default server-side validity window for scroll cursors, in seconds.
const DEFAULT_SCROLL_WINDOW_SECS: u64 = 10;

/// Configuration for the scroll streamer.
#[derive(Debug, Clone)]
pub struct ScrollConfig {
    /// Server-side validity window requested for each cursor.
    pub scroll_window: Duration,
    /// Page size for queries that set neither a size nor a cap.
    pub default_page_size: usize,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            scroll_window: Duration::from_secs(DEFAULT_SCROLL_WINDOW_SECS),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Streamer that expands a scroll search into a flat sequence of hits.
///
/// The streamer is responsible for:
/// - Resolving the effective page size and round-trip budget
/// - Issuing the initial search and each continuation strictly in
///   dependency order
/// - Flattening pages into individual hits, intra-page order preserved
/// - Truncating capped queries to exactly the requested number of hits
pub struct ScrollStreamer {
    engine: Arc<dyn RemoteSearchEngine>,
    config: ScrollConfig,
}

impl ScrollStreamer {
    /// Create a new streamer with the default configuration.
    pub fn new(engine: Arc<dyn RemoteSearchEngine>) -> Self {
        Self {
            engine,
            config: ScrollConfig::default(),
        }
    }

    /// Create a new streamer with custom configuration.
    pub fn with_config(engine: Arc<dyn RemoteSearchEngine>, config: ScrollConfig) -> Self {
        Self { engine, config }
    }

    /// Expand the query into a lazy stream of hits.
    ///
    /// The stream terminates when the engine stops returning full pages,
    /// when the cursor disappears, or (for capped queries) once the page
    /// budget is spent; capped queries are truncated to exactly `limit`
    /// hits. A failed round trip ends the stream with that error; hits
    /// already emitted remain valid.
    ///
    /// A query capped at zero yields an empty stream without touching the
    /// engine.
    pub fn stream(
        &self,
        query: ScrollQuery,
    ) -> impl Stream<Item = Result<Hit, StreamError>> + Send + 'static {
        let page_size = query.resolved_page_size(self.config.default_page_size);
        let budget = query.page_budget(page_size);
        let limit = query.limit;

        debug!(
            page_size = page_size,
            page_budget = ?budget,
            limit = ?limit,
            "Starting scroll expansion"
        );

        let phase = if budget == Some(0) {
            Phase::Drained
        } else {
            Phase::Initial(query)
        };

        let state = ExpansionState {
            engine: Arc::clone(&self.engine),
            phase,
            page_size,
            pages_left: budget,
            pages_fetched: 0,
            window: self.config.scroll_window,
        };

        stream::try_unfold(state, fetch_next_page)
            .map_ok(|page| stream::iter(page.hits.into_iter().map(Ok)))
            .try_flatten()
            .take(limit.unwrap_or(usize::MAX))
    }
}

/// Where the expansion currently stands.
enum Phase {
    /// The initial search has not been issued yet.
    Initial(ScrollQuery),
    /// A continuation cursor is waiting to be followed.
    Cursor(String),
    /// No further requests will be issued.
    Drained,
}

/// State threaded through the self-feeding expansion loop.
struct ExpansionState {
    engine: Arc<dyn RemoteSearchEngine>,
    phase: Phase,
    page_size: usize,
    /// Remaining round trips for capped queries; `None` means unbounded.
    pages_left: Option<usize>,
    pages_fetched: usize,
    window: Duration,
}

/// Fetch one page and decide whether the loop continues.
///
/// A continuation is issued only while the cursor is present, the page
/// came back full-sized and non-empty, and the page budget is unspent. A
/// short page signals exhaustion regardless of cursor presence.
async fn fetch_next_page(
    mut state: ExpansionState,
) -> Result<Option<(ResultPage, ExpansionState)>, StreamError> {
    let page = match mem::replace(&mut state.phase, Phase::Drained) {
        Phase::Drained => return Ok(None),
        Phase::Initial(query) => {
            debug!(page_size = state.page_size, "Issuing initial search");
            state
                .engine
                .search(&query, state.page_size, state.window)
                .await?
        }
        Phase::Cursor(cursor) => {
            debug!(page = state.pages_fetched, "Issuing scroll continuation");
            state.engine.scroll_continue(&cursor, state.window).await?
        }
    };

    state.pages_fetched += 1;
    if let Some(left) = state.pages_left.as_mut() {
        *left = left.saturating_sub(1);
    }

    state.phase = match &page.scroll_id {
        Some(cursor) => {
            let wants_more = state.pages_left != Some(0)
                && !page.is_empty()
                && page.is_full(state.page_size);
            if wants_more {
                Phase::Cursor(cursor.clone())
            } else {
                Phase::Drained
            }
        }
        None => Phase::Drained,
    };

    debug!(
        page = state.pages_fetched,
        hits = page.len(),
        continuing = !matches!(state.phase, Phase::Drained),
        "Page expanded"
    );

    Ok(Some((page, state)))
}
