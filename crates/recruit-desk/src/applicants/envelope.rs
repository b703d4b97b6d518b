//! Response envelopes used by the remote store around its collection payloads.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Every collection shape the store is known to return.
///
/// Variants are tried in declaration order and the first match wins:
///
/// 1. a bare array: `[...]`
/// 2. a paginated page: `{"docs": [...]}`
/// 3. a wrapped page: `{"data": {"docs": [...]}}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    List(Vec<T>),
    Docs { docs: Vec<T> },
    Data { data: DocsPage<T> },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocsPage<T> {
    pub docs: Vec<T>,
}

impl<T> Envelope<T> {
    pub fn into_records(self) -> Vec<T> {
        match self {
            Envelope::List(records) => records,
            Envelope::Docs { docs } => docs,
            Envelope::Data { data } => data.docs,
        }
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Flattens a successful response body. Unknown shapes yield an empty list; inside a
    /// known shape each record decodes on its own and only malformed ones are skipped.
    pub fn flatten(body: Value) -> Vec<T> {
        let raw = match serde_json::from_value::<Envelope<Value>>(body) {
            Ok(envelope) => envelope.into_records(),
            Err(err) => {
                warn!(error = %err, "unrecognized collection envelope, treating as empty");
                return Vec::new();
            }
        };

        let total = raw.len();
        let records: Vec<T> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value::<T>(record) {
                Ok(record) => Some(record),
                Err(err) => {
                    warn!(index, error = %err, "skipping malformed record");
                    None
                }
            })
            .collect();

        if records.len() < total {
            warn!(
                kept = records.len(),
                skipped = total - records.len(),
                "collection contained malformed records"
            );
        }
        records
    }
}

/// Single-record responses, either bare or wrapped as `{"data": {...}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RecordEnvelope<T> {
    Bare(T),
    Data { data: T },
}

impl<T> RecordEnvelope<T> {
    pub fn into_record(self) -> T {
        match self {
            RecordEnvelope::Bare(record) => record,
            RecordEnvelope::Data { data } => data,
        }
    }
}
