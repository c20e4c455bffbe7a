use mongodb::bson;
use mongodb::error::{Error as DriverError, ErrorKind, WriteFailure};
use std::time::Duration;

use crate::common::ContextError;

/// Server error code for a unique index violation
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Error type for MongoDB connection and repository operations
///
/// Driver errors are carried unmodified as the source; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("Connection failed: {0}")]
    Connection(#[source] DriverError),

    #[error("Connection attempt did not complete within {0:?}")]
    ConnectTimeout(Duration),

    #[error("Liveness probe failed: {0}")]
    Probe(#[source] DriverError),

    #[error("Liveness probe got no reply within {0:?}")]
    ProbeTimeout(Duration),

    #[error("Disconnect did not complete within {0:?}")]
    Disconnection(Duration),

    #[error("Write to collection '{collection}' failed: {source}")]
    Write {
        collection: String,
        #[source]
        source: DriverError,
    },

    #[error("Query on collection '{collection}' failed: {source}")]
    Query {
        collection: String,
        #[source]
        source: DriverError,
    },

    #[error("Document '{id}' not found in collection '{collection}'")]
    NotFound { collection: String, id: String },

    #[error("Failed to decode document from collection '{collection}': {source}")]
    Decode {
        collection: String,
        #[source]
        source: DriverError,
    },

    #[error("Failed to encode value for collection '{collection}': {source}")]
    Encode {
        collection: String,
        #[source]
        source: bson::ser::Error,
    },

    #[error("Invalid identifier for collection '{collection}': {reason}")]
    Identifier { collection: String, reason: String },

    #[error(transparent)]
    Interrupted(#[from] ContextError),
}

impl MongoError {
    /// Classify a failed read: undecodable documents become [`MongoError::Decode`],
    /// everything else [`MongoError::Query`].
    pub(crate) fn read(collection: &str, source: DriverError) -> Self {
        if is_decode_failure(&source) {
            MongoError::Decode {
                collection: collection.to_string(),
                source,
            }
        } else {
            MongoError::Query {
                collection: collection.to_string(),
                source,
            }
        }
    }

    pub(crate) fn write(collection: &str, source: DriverError) -> Self {
        MongoError::Write {
            collection: collection.to_string(),
            source,
        }
    }

    pub(crate) fn encode(collection: &str, source: bson::ser::Error) -> Self {
        MongoError::Encode {
            collection: collection.to_string(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MongoError::NotFound { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, MongoError::Decode { .. })
    }

    /// True when a write hit a unique index, in a single insert or any
    /// document of a batch
    pub fn is_duplicate_key(&self) -> bool {
        let MongoError::Write { source, .. } = self else {
            return false;
        };
        match source.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
            ErrorKind::InsertMany(e) => e
                .write_errors
                .iter()
                .flatten()
                .any(|w| w.code == DUPLICATE_KEY_CODE),
            _ => false,
        }
    }

    /// Whether the database failed to answer a liveness probe
    pub fn is_probe_failure(&self) -> bool {
        matches!(self, MongoError::Probe(_) | MongoError::ProbeTimeout(_))
    }

    /// Whether the caller's context, not the store, ended the call
    pub fn is_interrupted(&self) -> bool {
        matches!(self, MongoError::Interrupted(_))
    }
}

fn is_decode_failure(error: &DriverError) -> bool {
    matches!(error.kind.as_ref(), ErrorKind::BsonDeserialization(_))
}
