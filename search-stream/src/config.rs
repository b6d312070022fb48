//! Environment-driven configuration for the stream operators.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::bulk::{BulkConfig, BulkErrorPolicy};
use crate::scroll::ScrollConfig;

/// Scroll cursor validity window, in seconds.
const ENV_SCROLL_WINDOW_SECS: &str = "SEARCH_STREAM_SCROLL_WINDOW_SECS";

/// Default page size for uncapped queries.
const ENV_PAGE_SIZE: &str = "SEARCH_STREAM_PAGE_SIZE";

/// Number of intents per bulk batch.
const ENV_BULK_BATCH_SIZE: &str = "SEARCH_STREAM_BULK_BATCH_SIZE";

/// Number of bulk batches in flight at once.
const ENV_BULK_CONCURRENCY: &str = "SEARCH_STREAM_BULK_CONCURRENCY";

/// Bulk failure policy: "abort" or "isolate".
const ENV_BULK_ERROR_POLICY: &str = "SEARCH_STREAM_BULK_ERROR_POLICY";

/// Combined configuration for both stream operators.
#[derive(Debug, Clone, Default)]
pub struct StreamConfig {
    /// Scroll expansion configuration.
    pub scroll: ScrollConfig,
    /// Bulk batching configuration.
    pub bulk: BulkConfig,
}

impl StreamConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset or unparsable.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_STREAM_SCROLL_WINDOW_SECS`: cursor validity window (default: 10)
    /// - `SEARCH_STREAM_PAGE_SIZE`: page size for uncapped queries (default: 1000)
    /// - `SEARCH_STREAM_BULK_BATCH_SIZE`: intents per batch (default: 100)
    /// - `SEARCH_STREAM_BULK_CONCURRENCY`: batches in flight (default: 1)
    /// - `SEARCH_STREAM_BULK_ERROR_POLICY`: "abort" or "isolate" (default: abort)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = parse_env::<u64>(ENV_SCROLL_WINDOW_SECS) {
            config.scroll.scroll_window = Duration::from_secs(secs);
        }
        if let Some(size) = parse_env::<usize>(ENV_PAGE_SIZE) {
            config.scroll.default_page_size = size;
        }
        if let Some(size) = parse_env::<usize>(ENV_BULK_BATCH_SIZE) {
            config.bulk.batch_size = size;
        }
        if let Some(count) = parse_env::<usize>(ENV_BULK_CONCURRENCY) {
            config.bulk.dispatch_concurrency = count;
        }
        if let Ok(policy) = env::var(ENV_BULK_ERROR_POLICY) {
            config.bulk.error_policy = parse_error_policy(&policy);
        }

        info!(
            scroll_window_secs = config.scroll.scroll_window.as_secs(),
            page_size = config.scroll.default_page_size,
            batch_size = config.bulk.batch_size,
            dispatch_concurrency = config.bulk.dispatch_concurrency,
            error_policy = ?config.bulk.error_policy,
            "Loaded stream configuration"
        );

        config
    }
}

/// Read and parse one env var, ignoring unset or unparsable values.
fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}

/// Parse a bulk error policy name.
///
/// Valid values: "abort" or "isolate" (case-insensitive).
/// Defaults to abort if invalid.
fn parse_error_policy(value: &str) -> BulkErrorPolicy {
    match value.to_lowercase().as_str() {
        "abort" => BulkErrorPolicy::Abort,
        "isolate" => BulkErrorPolicy::Isolate,
        _ => {
            warn!(policy = %value, "Invalid bulk error policy, defaulting to 'abort'");
            BulkErrorPolicy::Abort
        }
    }
}
