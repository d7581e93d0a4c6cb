//! # proglog store
//!
//! The record store underneath the proglog commit log.
//!
//! A store is a single append-only file holding **opaque byte records**.
//! It does not interpret, validate or deduplicate what it stores; the index
//! and segment layers above it own that.
//!
//! ## File Format
//!
//! ```text
//! record := length (8 bytes, big-endian u64) || payload (length bytes)
//! file   := record*
//! ```
//!
//! There is no magic number, checksum or trailer.
//!
//! ## Design Principles
//!
//! - One [`Store`] per file, explicit construction and [`Store::close`]
//! - Appends are buffered; every read path flushes before touching the file
//! - A single lock serializes every operation, so positions are unique
//! - Must be `Send + Sync` for concurrent access
//!
//! ## Example
//!
//! ```rust
//! use proglog_store::{Store, StoreConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("00000.store");
//! let store = Store::open(&path, &StoreConfig::default()).unwrap();
//!
//! let (written, position) = store.append(b"hello").unwrap();
//! assert_eq!((written, position), (13, 0));
//! assert_eq!(store.read(position).unwrap(), b"hello");
//!
//! store.close().unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod store;

pub use config::{StoreConfig, DEFAULT_BUFFER_CAPACITY};
pub use error::{StoreError, StoreResult};
pub use store::{Store, LEN_WIDTH};
