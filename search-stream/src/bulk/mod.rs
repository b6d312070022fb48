//! Bulk batching operator.
//!
//! Buffers discrete write intents into fixed-size batches, serializes each
//! batch into the bulk wire format, and dispatches one bulk call per
//! batch. Batches form strictly in arrival order; dispatch may overlap,
//! but the response stream preserves formation order.

pub mod wire;

use std::sync::Arc;

use futures::future::{self, Either};
use futures::stream::{Stream, StreamExt};
use tracing::debug;

use search_stream_repository::RemoteSearchEngine;
use search_stream_shared::{BulkOptions, BulkResponse, WriteIntent};

use crate::errors::StreamError;

/// Default number of intents per batch.
const DEFAULT_BATCH_SIZE: usize = 100;

/// What happens to the response stream when a batch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkErrorPolicy {
    /// Surface the failure, then end the response stream.
    /// This is the default.
    #[default]
    Abort,

    /// Surface the failure in place and keep dispatching later batches.
    Isolate,
}

/// Configuration for the bulk batcher.
#[derive(Debug, Clone)]
pub struct BulkConfig {
    /// Number of intents per batch. Values below 1 are clamped to 1.
    pub batch_size: usize,
    /// How many formed batches may be in flight at once.
    /// Values below 1 are clamped to 1.
    pub dispatch_concurrency: usize,
    /// Options merged into every bulk call.
    pub options: BulkOptions,
    /// Failure handling for the response stream.
    pub error_policy: BulkErrorPolicy,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            dispatch_concurrency: 1,
            options: BulkOptions::default(),
            error_policy: BulkErrorPolicy::default(),
        }
    }
}

impl BulkConfig {
    /// Create a config with the default batch size and serial dispatch.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Operator that converts an intent stream into a bulk response stream.
///
/// The batcher is responsible for:
/// - Accumulating intents until `batch_size` arrive, flushing the final
///   partial batch when the source ends
/// - Serializing each batch into the wire body, failing fast on malformed
///   intents before any remote call
/// - Emitting one response per batch, in batch formation order
pub struct BulkBatcher {
    engine: Arc<dyn RemoteSearchEngine>,
    config: BulkConfig,
}

impl BulkBatcher {
    /// Create a new batcher with the default configuration.
    pub fn new(engine: Arc<dyn RemoteSearchEngine>) -> Self {
        Self {
            engine,
            config: BulkConfig::new(),
        }
    }

    /// Create a new batcher with custom configuration.
    pub fn with_config(engine: Arc<dyn RemoteSearchEngine>, config: BulkConfig) -> Self {
        Self { engine, config }
    }

    /// Apply the operator to a stream of intents.
    ///
    /// Returns a stream of bulk responses, one per batch. A failing batch
    /// emits its error according to the configured [`BulkErrorPolicy`];
    /// responses already emitted remain valid either way.
    pub fn apply<S>(
        &self,
        intents: S,
    ) -> impl Stream<Item = Result<BulkResponse, StreamError>> + Send + 'static
    where
        S: Stream<Item = WriteIntent> + Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        let options = self.config.options.clone();
        let batch_size = self.config.batch_size.max(1);
        let concurrency = self.config.dispatch_concurrency.max(1);

        let responses = intents
            .chunks(batch_size)
            .enumerate()
            .map(move |(batch_index, batch)| {
                let engine = Arc::clone(&engine);
                let options = options.clone();
                async move {
                    let body = wire::encode_batch(&batch)?;
                    debug!(
                        batch = batch_index,
                        intents = batch.len(),
                        entries = body.len(),
                        "Dispatching bulk batch"
                    );
                    let response = engine.bulk_write(body, &options).await?;
                    Ok(response)
                }
            })
            .buffered(concurrency);

        match self.config.error_policy {
            BulkErrorPolicy::Isolate => Either::Left(responses),
            BulkErrorPolicy::Abort => Either::Right(halt_after_error(responses)),
        }
    }
}

/// Pass items through until the first error, emit it, then end the stream.
fn halt_after_error<S, T>(responses: S) -> impl Stream<Item = Result<T, StreamError>>
where
    S: Stream<Item = Result<T, StreamError>>,
{
    responses.scan(false, |errored, item| {
        if *errored {
            return future::ready(None);
        }
        *errored = item.is_err();
        future::ready(Some(item))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use search_stream_repository::EngineError;
    use search_stream_shared::{ResultPage, ScrollQuery, WireBulkBody};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock engine recording every bulk body it receives.
    ///
    /// Responds with `took` equal to the call index so tests can check
    /// output ordering, and records completion order separately.
    struct RecordingEngine {
        bodies: Mutex<Vec<WireBulkBody>>,
        completion_order: Mutex<Vec<u64>>,
        delays_ms: Vec<u64>,
        fail_on_call: Option<usize>,
        calls: AtomicUsize,
    }

    impl RecordingEngine {
        fn new() -> Self {
            Self {
                bodies: Mutex::new(Vec::new()),
                completion_order: Mutex::new(Vec::new()),
                delays_ms: Vec::new(),
                fail_on_call: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn with_delays(delays_ms: Vec<u64>) -> Self {
            Self {
                delays_ms,
                ..Self::new()
            }
        }

        fn failing_on_call(call: usize) -> Self {
            Self {
                fail_on_call: Some(call),
                ..Self::new()
            }
        }

        fn body_lens(&self) -> Vec<usize> {
            self.bodies.lock().unwrap().iter().map(|b| b.len()).collect()
        }
    }

    #[async_trait]
    impl RemoteSearchEngine for RecordingEngine {
        async fn search(
            &self,
            _query: &ScrollQuery,
            _page_size: usize,
            _scroll_window: Duration,
        ) -> Result<ResultPage, EngineError> {
            unreachable!("bulk tests never search")
        }

        async fn scroll_continue(
            &self,
            _scroll_id: &str,
            _scroll_window: Duration,
        ) -> Result<ResultPage, EngineError> {
            unreachable!("bulk tests never scroll")
        }

        async fn bulk_write(
            &self,
            body: WireBulkBody,
            _options: &BulkOptions,
        ) -> Result<BulkResponse, EngineError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.bodies.lock().unwrap().push(body);

            if let Some(delay) = self.delays_ms.get(call) {
                tokio::time::sleep(Duration::from_millis(*delay)).await;
            }
            if self.fail_on_call == Some(call) {
                return Err(EngineError::bulk("rejected"));
            }

            self.completion_order.lock().unwrap().push(call as u64);
            Ok(BulkResponse {
                took: call as u64,
                errors: false,
                items: Vec::new(),
            })
        }
    }

    fn batcher(engine: &Arc<RecordingEngine>, config: BulkConfig) -> BulkBatcher {
        BulkBatcher::with_config(Arc::clone(engine) as Arc<dyn RemoteSearchEngine>, config)
    }

    fn index_intents(count: usize) -> Vec<WriteIntent> {
        (0..count)
            .map(|i| WriteIntent::index(json!({ "n": i })).with_id(format!("doc-{}", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_batch_count_and_sizes() {
        // 7 intents with batch size 3: batches of [3, 3, 1].
        let engine = Arc::new(RecordingEngine::new());
        let config = BulkConfig {
            batch_size: 3,
            ..BulkConfig::new()
        };

        let responses: Vec<_> = batcher(&engine, config)
            .apply(futures::stream::iter(index_intents(7)))
            .collect()
            .await;

        assert_eq!(responses.len(), 3);
        assert!(responses.iter().all(Result::is_ok));
        // Index intents serialize to two entries each.
        assert_eq!(engine.body_lens(), vec![6, 6, 2]);
    }

    #[tokio::test]
    async fn test_mixed_intents_form_single_batch() {
        // 3 index intents plus 1 delete, batch size 100: one batch whose
        // body holds 3 * 2 + 1 = 7 entries.
        let engine = Arc::new(RecordingEngine::new());
        let mut intents = index_intents(3);
        intents.push(WriteIntent::delete().with_id("doc-gone"));

        let responses: Vec<_> = batcher(&engine, BulkConfig::new())
            .apply(futures::stream::iter(intents))
            .collect()
            .await;

        assert_eq!(responses.len(), 1);
        assert_eq!(engine.body_lens(), vec![7]);
    }

    #[tokio::test]
    async fn test_empty_source_emits_no_batches() {
        let engine = Arc::new(RecordingEngine::new());

        let responses: Vec<_> = batcher(&engine, BulkConfig::new())
            .apply(futures::stream::iter(Vec::<WriteIntent>::new()))
            .collect()
            .await;

        assert!(responses.is_empty());
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_output_order_matches_formation_order() {
        // The first batch's call is slower than the second's, so the
        // second completes first; the output must still lead with the
        // first batch's response.
        let engine = Arc::new(RecordingEngine::with_delays(vec![50, 0]));
        let config = BulkConfig {
            batch_size: 2,
            dispatch_concurrency: 2,
            ..BulkConfig::new()
        };

        let responses: Vec<_> = batcher(&engine, config)
            .apply(futures::stream::iter(index_intents(4)))
            .collect()
            .await;

        let took: Vec<_> = responses
            .into_iter()
            .map(|r| r.unwrap().took)
            .collect();
        assert_eq!(took, vec![0, 1]);
        assert_eq!(*engine.completion_order.lock().unwrap(), vec![1, 0]);
    }

    #[tokio::test]
    async fn test_abort_policy_ends_stream_after_failure() {
        // Batches of one; the second call fails. Abort surfaces the error
        // and stops pulling, so the remaining intents are never dispatched.
        let engine = Arc::new(RecordingEngine::failing_on_call(1));
        let config = BulkConfig {
            batch_size: 1,
            ..BulkConfig::new()
        };

        let responses: Vec<_> = batcher(&engine, config)
            .apply(futures::stream::iter(index_intents(5)))
            .collect()
            .await;

        assert_eq!(responses.len(), 2);
        assert!(responses[0].is_ok());
        assert!(matches!(
            responses[1],
            Err(StreamError::RemoteError(EngineError::BulkError(_)))
        ));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_isolate_policy_keeps_later_batches() {
        let engine = Arc::new(RecordingEngine::failing_on_call(1));
        let config = BulkConfig {
            batch_size: 1,
            error_policy: BulkErrorPolicy::Isolate,
            ..BulkConfig::new()
        };

        let responses: Vec<_> = batcher(&engine, config)
            .apply(futures::stream::iter(index_intents(5)))
            .collect()
            .await;

        assert_eq!(responses.len(), 5);
        assert!(responses[1].is_err());
        let ok_count = responses.iter().filter(|r| r.is_ok()).count();
        assert_eq!(ok_count, 4);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_malformed_intent_fails_before_any_remote_call() {
        let engine = Arc::new(RecordingEngine::new());
        let intents = vec![WriteIntent::index(serde_json::Value::Null)];

        let responses: Vec<_> = batcher(&engine, BulkConfig::new())
            .apply(futures::stream::iter(intents))
            .collect()
            .await;

        assert_eq!(responses.len(), 1);
        assert!(matches!(
            responses[0],
            Err(StreamError::MalformedIntent { action: "index", .. })
        ));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }
}
