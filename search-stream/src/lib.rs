//! # Search Stream
//!
//! Reactive streaming over a document search engine: cursor-paginated
//! scroll searches are flattened into one lazy sequence of hits, and
//! discrete write intents are grouped into fixed-size bulk requests.
//!
//! ## Architecture
//!
//! Two independent, composable stream operators over one abstract engine:
//!
//! 1. **ScrollStreamer**: expands a paged search API into a flat,
//!    optionally bounded hit stream
//! 2. **BulkBatcher**: buffers write intents into fixed-size batches and
//!    dispatches them as bulk requests
//! 3. **SearchStreamClient**: facade wiring both operators to one engine
//!
//! ## Modules
//!
//! - [`scroll`]: the scroll expansion operator
//! - [`bulk`]: the bulk batching operator and wire serialization
//! - [`client`]: the client facade
//! - [`config`]: environment-driven configuration
//! - [`errors`]: error types for the stream operators

pub mod bulk;
pub mod client;
pub mod config;
pub mod errors;
pub mod scroll;

pub use bulk::{BulkBatcher, BulkConfig, BulkErrorPolicy};
pub use client::SearchStreamClient;
pub use config::StreamConfig;
pub use errors::StreamError;
pub use scroll::{ScrollConfig, ScrollStreamer};

pub use search_stream_repository::{EngineError, OpenSearchEngine, RemoteSearchEngine};
pub use search_stream_shared::{
    BulkOptions, BulkResponse, Hit, IntentMeta, ResultPage, ScrollQuery, SequenceGuard,
    WireBulkBody, WriteIntent,
};
