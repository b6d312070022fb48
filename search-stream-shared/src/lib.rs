//! # Search Stream Shared
//!
//! This crate defines shared data structures and types used across the
//! search-stream ecosystem. It includes the query, result-page, and write
//! intent types exchanged between the stream operators and the remote
//! engine implementations.

pub mod types;

pub use types::bulk::{BulkItem, BulkItemStatus, BulkOptions, BulkResponse, WireBulkBody};
pub use types::hit::{Hit, ResultPage};
pub use types::scroll_query::{ScrollQuery, DEFAULT_PAGE_SIZE, MAX_CAPPED_PAGE_SIZE};
pub use types::write_intent::{IntentMeta, SequenceGuard, WriteIntent};
