//! Error types for store operations.

use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred while inspecting, writing, flushing or syncing the file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Fewer bytes were available than the read required.
    ///
    /// For [`crate::Store::read_at`], `available` is the number of bytes
    /// that were actually copied into the caller's buffer.
    #[error("short read at offset {offset}: expected {expected} bytes, only {available} available")]
    ShortRead {
        /// The offset the read started at.
        offset: u64,
        /// The number of bytes the read required.
        expected: u64,
        /// The number of bytes that could be read.
        available: u64,
    },

    /// The store has been closed.
    #[error("store is closed")]
    Closed,
}

impl StoreError {
    /// Returns `true` if this is a short read.
    #[must_use]
    pub fn is_short_read(&self) -> bool {
        matches!(self, Self::ShortRead { .. })
    }
}
