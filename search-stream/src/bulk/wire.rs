//! Wire serialization for bulk bodies.
//!
//! Each intent serializes to a metadata entry keyed by its action name,
//! immediately followed by the raw payload value iff the variant carries a
//! payload. Entry order matches intent arrival order.

use serde_json::{Map, Value};

use search_stream_shared::{WireBulkBody, WriteIntent};

use crate::errors::StreamError;

/// Serialize one batch of intents into a bulk wire body.
///
/// Fails fast on the first malformed intent, before any remote call is
/// issued for the batch.
pub fn encode_batch(intents: &[WriteIntent]) -> Result<WireBulkBody, StreamError> {
    let mut body = WireBulkBody::with_capacity(intents.len() * 2);
    for intent in intents {
        encode_intent(intent, &mut body)?;
    }
    Ok(body)
}

/// Append one intent's wire entries to the body.
pub fn encode_intent(intent: &WriteIntent, body: &mut WireBulkBody) -> Result<(), StreamError> {
    body.push(metadata_entry(intent));
    if let Some(payload) = intent.payload() {
        if payload.is_null() {
            return Err(StreamError::malformed_intent(
                intent.action(),
                "payload must not be null",
            ));
        }
        body.push(payload.clone());
    }
    Ok(())
}

/// Build the metadata entry: `{ <action>: { _id?, _type?, _index?,
/// if_seq_no?, if_primary_term?, retry_on_conflict? } }`.
fn metadata_entry(intent: &WriteIntent) -> Value {
    let meta = intent.meta();
    let mut fields = Map::new();

    if let Some(id) = &meta.id {
        fields.insert("_id".to_string(), Value::String(id.clone()));
    }
    if let Some(doc_type) = &meta.doc_type {
        fields.insert("_type".to_string(), Value::String(doc_type.clone()));
    }
    if let Some(index) = &meta.index {
        fields.insert("_index".to_string(), Value::String(index.clone()));
    }

    match intent {
        WriteIntent::Index { sequence, .. } | WriteIntent::Delete { sequence, .. } => {
            if let Some(guard) = sequence {
                fields.insert("if_seq_no".to_string(), guard.if_seq_no.into());
                fields.insert("if_primary_term".to_string(), guard.if_primary_term.into());
            }
        }
        WriteIntent::Update {
            retry_on_conflict, ..
        } => {
            if let Some(retries) = retry_on_conflict {
                fields.insert("retry_on_conflict".to_string(), (*retries).into());
            }
        }
        WriteIntent::Create { .. } => {}
    }

    let mut entry = Map::new();
    entry.insert(intent.action().to_string(), Value::Object(fields));
    Value::Object(entry)
}
