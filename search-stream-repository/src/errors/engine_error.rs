//! Remote engine error types.
//!
//! This module defines the unified error type for all remote engine calls.
//! Errors are surfaced to stream consumers unmodified; no retry or backoff
//! happens at this layer.

use thiserror::Error;

/// Unified errors from remote engine operations.
///
/// Used by the `RemoteSearchEngine` trait for all search, scroll, and bulk
/// calls. Each variant wraps the backend's message so consumers see the
/// failure exactly as the engine reported it.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Failed to establish a connection to the engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An initial search call failed.
    #[error("Search error: {0}")]
    SearchError(String),

    /// A scroll continuation call failed.
    ///
    /// Also raised when a continuation is issued after the server-side
    /// cursor context expired.
    #[error("Scroll error: {0}")]
    ScrollError(String),

    /// A bulk write call failed.
    #[error("Bulk error: {0}")]
    BulkError(String),

    /// Failed to parse a response from the engine.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl EngineError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a search error.
    pub fn search(msg: impl Into<String>) -> Self {
        Self::SearchError(msg.into())
    }

    /// Create a scroll error.
    pub fn scroll(msg: impl Into<String>) -> Self {
        Self::ScrollError(msg.into())
    }

    /// Create a bulk error.
    pub fn bulk(msg: impl Into<String>) -> Self {
        Self::BulkError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
