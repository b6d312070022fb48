//! Error types for remote engine operations.

mod engine_error;

pub use engine_error::EngineError;
