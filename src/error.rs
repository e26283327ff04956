//! Error types for detection, persistence and the batch runtime.

use thiserror::Error;

use crate::types::{SeqIndex, Timestamp};

/// Errors raised by the detector for a single station.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectError {
    /// A record's timestamp is earlier than its predecessor's.
    #[error("records out of order at index {index}: {current} precedes {previous}")]
    OutOfOrder {
        /// Index of the offending record.
        index: SeqIndex,
        /// Timestamp of the record before it.
        previous: Timestamp,
        /// Timestamp of the offending record.
        current: Timestamp,
    },

    /// Detector thresholds cannot produce meaningful periods.
    #[error("invalid detector config: {0}")]
    InvalidConfig(String),
}

/// Errors raised by the log source and period sink.
#[derive(Error, Debug)]
pub enum PersistError {
    /// SQLite failure.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON encode/decode failure.
    #[error("json: {0}")]
    Serde(#[from] serde_json::Error),

    /// Filesystem failure.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// A `datetime` value that does not match the log format.
    #[error("bad timestamp {value:?}: {source}")]
    Timestamp {
        /// Raw column text.
        value: String,
        /// Parser error.
        source: chrono::ParseError,
    },

    /// Anything else.
    #[error("{0}")]
    Message(String),
}

/// Result alias for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Errors surfaced by the batch runtime handle.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Detector construction failed.
    #[error(transparent)]
    Detect(#[from] DetectError),

    /// Loading or storing failed.
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// The coordinator task is gone.
    #[error("batch runtime channel closed")]
    ChannelClosed,

    /// A detection task panicked or was cancelled.
    #[error("detection task failed: {0}")]
    Join(String),
}
