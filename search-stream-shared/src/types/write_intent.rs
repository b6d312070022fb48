//! Write intent types.
//!
//! A write intent is one discrete caller-requested mutation, not yet
//! submitted to the remote engine. Intents are modeled as an explicit sum
//! type discriminated by action, so a variant without a payload cannot be
//! serialized with a payload line.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Addressing metadata common to all write intents.
///
/// All fields are optional; the engine falls back to request-level or
/// index-level defaults for absent fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentMeta {
    /// The document's unique identifier.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Legacy mapping type.
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,

    /// Target index.
    #[serde(rename = "_index", skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

/// Optimistic-concurrency guard for index and delete intents.
///
/// The engine rejects the operation unless the document's current sequence
/// number and primary term match. Both fields always travel together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceGuard {
    /// Expected sequence number.
    pub if_seq_no: u64,
    /// Expected primary term.
    pub if_primary_term: u64,
}

/// One discrete write operation destined for a bulk request.
///
/// `Index`, `Create`, and `Update` carry a mandatory payload and serialize
/// to exactly two wire lines (metadata + payload). `Delete` carries no
/// payload and serializes to exactly one line.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteIntent {
    /// Index a document, replacing any existing document with the same id.
    Index {
        meta: IntentMeta,
        /// Optional optimistic-concurrency guard.
        sequence: Option<SequenceGuard>,
        /// The full document body.
        payload: Value,
    },
    /// Create a document, failing if one already exists with the same id.
    Create {
        meta: IntentMeta,
        /// The full document body.
        payload: Value,
    },
    /// Partially update an existing document.
    Update {
        meta: IntentMeta,
        /// How many times to retry on a version conflict.
        retry_on_conflict: Option<u32>,
        /// The partial-update body.
        payload: Value,
    },
    /// Delete a document.
    Delete {
        meta: IntentMeta,
        /// Optional optimistic-concurrency guard.
        sequence: Option<SequenceGuard>,
    },
}

impl WriteIntent {
    /// Create an index intent for the given document body.
    pub fn index(payload: Value) -> Self {
        Self::Index {
            meta: IntentMeta::default(),
            sequence: None,
            payload,
        }
    }

    /// Create a create intent for the given document body.
    pub fn create(payload: Value) -> Self {
        Self::Create {
            meta: IntentMeta::default(),
            payload,
        }
    }

    /// Create an update intent for the given partial-update body.
    pub fn update(payload: Value) -> Self {
        Self::Update {
            meta: IntentMeta::default(),
            retry_on_conflict: None,
            payload,
        }
    }

    /// Create a delete intent.
    pub fn delete() -> Self {
        Self::Delete {
            meta: IntentMeta::default(),
            sequence: None,
        }
    }

    /// Set the document id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.meta_mut().id = Some(id.into());
        self
    }

    /// Set the target index.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.meta_mut().index = Some(index.into());
        self
    }

    /// Set the legacy mapping type.
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.meta_mut().doc_type = Some(doc_type.into());
        self
    }

    /// Attach an optimistic-concurrency guard.
    ///
    /// Applies to index and delete intents; other variants do not carry
    /// sequence guards and are left unchanged.
    pub fn with_sequence_guard(mut self, guard: SequenceGuard) -> Self {
        match &mut self {
            Self::Index { sequence, .. } | Self::Delete { sequence, .. } => {
                *sequence = Some(guard);
            }
            Self::Create { .. } | Self::Update { .. } => {}
        }
        self
    }

    /// Set the conflict-retry count.
    ///
    /// Applies to update intents only; other variants are left unchanged.
    pub fn with_retry_on_conflict(mut self, retries: u32) -> Self {
        if let Self::Update {
            retry_on_conflict, ..
        } = &mut self
        {
            *retry_on_conflict = Some(retries);
        }
        self
    }

    /// The action name this intent serializes under.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Index { .. } => "index",
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    /// The payload this intent carries, if its variant declares one.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Index { payload, .. }
            | Self::Create { payload, .. }
            | Self::Update { payload, .. } => Some(payload),
            Self::Delete { .. } => None,
        }
    }

    /// The addressing metadata of this intent.
    pub fn meta(&self) -> &IntentMeta {
        match self {
            Self::Index { meta, .. }
            | Self::Create { meta, .. }
            | Self::Update { meta, .. }
            | Self::Delete { meta, .. } => meta,
        }
    }

    fn meta_mut(&mut self) -> &mut IntentMeta {
        match self {
            Self::Index { meta, .. }
            | Self::Create { meta, .. }
            | Self::Update { meta, .. }
            | Self::Delete { meta, .. } => meta,
        }
    }
}
