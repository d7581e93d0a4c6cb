//! CLI command implementations.

pub mod append;
pub mod inspect;
pub mod read;

use proglog_store::{Store, StoreConfig};
use std::path::Path;

/// Opens an existing store file, refusing to create a new one.
pub(crate) fn open_existing(path: &Path) -> Result<Store, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No store found at {:?}", path).into());
    }
    Ok(Store::open(path, &StoreConfig::default())?)
}

pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
