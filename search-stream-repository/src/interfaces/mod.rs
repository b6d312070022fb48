//! Abstract interfaces for remote engine implementations.

mod remote_engine;

pub use remote_engine::RemoteSearchEngine;
