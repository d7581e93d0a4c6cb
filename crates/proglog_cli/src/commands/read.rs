//! Read and read-at command implementations.

use super::{hex_encode, open_existing};
use proglog_store::{Store, StoreError};
use std::path::Path;

/// Runs the read command.
pub fn run(path: &Path, position: u64, hex: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_existing(path)?;
    let payload = store.read(position)?;
    store.close()?;

    println!("{}", render(&payload, hex));
    Ok(())
}

/// Runs the read-at command.
pub fn run_raw(path: &Path, offset: u64, len: usize) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_existing(path)?;
    let bytes = read_raw(&store, offset, len)?;
    store.close()?;

    println!("{}", hex_encode(&bytes));
    Ok(())
}

/// Reads up to `len` raw bytes at `offset`, clamped to the end of the store.
fn read_raw(store: &Store, offset: u64, len: usize) -> Result<Vec<u8>, StoreError> {
    let available = store.size()?.saturating_sub(offset);
    let len = usize::try_from(available).map_or(len, |available| len.min(available));

    let mut buf = vec![0u8; len];
    let read = store.read_at(&mut buf, offset)?;
    buf.truncate(read);
    Ok(buf)
}

fn render(payload: &[u8], hex: bool) -> String {
    if hex {
        hex_encode(payload)
    } else {
        String::from_utf8_lossy(payload).into_owned()
    }
}
