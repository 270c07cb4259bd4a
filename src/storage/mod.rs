//! Storage is organized through [slot_store::JsonFileStore].
//! The basic idea is:
//!  - There is a directory holding two slot files, one for meals and one for payments.
//!  - Each slot is a single JSON object keyed by ISO date.
//!  - Slots are read once at startup and overwritten wholesale after every change.

pub mod slot_store;

use thiserror::Error;

pub use slot_store::{JsonFileStore, RecordStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access slot {slot}: {source}")]
    Io {
        slot: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("slot {slot} holds invalid JSON: {source}")]
    Json {
        slot: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
