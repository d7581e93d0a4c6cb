//! Append command implementation.

use proglog_store::{Store, StoreConfig};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Runs the append command.
///
/// Creates the store file (and its parent directories) if needed.
pub fn run(path: &Path, payloads: &[String], stdin: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = StoreConfig::new().create_dirs(true).sync_on_close(true);
    let store = Store::open(path, &config)?;

    let records: Vec<Vec<u8>> = if stdin {
        let mut data = Vec::new();
        std::io::stdin().read_to_end(&mut data)?;
        vec![data]
    } else {
        payloads.iter().map(|p| p.as_bytes().to_vec()).collect()
    };

    for (position, written) in append_all(&store, &records)? {
        println!("position={} bytes_written={}", position, written);
    }

    let size = store.size()?;
    store.close()?;
    info!("Appended {} record(s), store size {} bytes", records.len(), size);

    Ok(())
}

/// Appends every record in order, returning `(position, bytes_written)` pairs.
fn append_all(
    store: &Store,
    records: &[Vec<u8>],
) -> Result<Vec<(u64, u64)>, Box<dyn std::error::Error>> {
    let mut results = Vec::with_capacity(records.len());
    for record in records {
        let (written, position) = store.append(record)?;
        results.push((position, written));
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn append_all_returns_positions_in_order() {
        let dir = tempdir().unwrap();
        let store = Store::open(&dir.path().join("cli.store"), &StoreConfig::default()).unwrap();

        let records = vec![b"hello".to_vec(), b"world!".to_vec()];
        let results = append_all(&store, &records).unwrap();

        assert_eq!(results, vec![(0, 13), (13, 14)]);
        assert_eq!(store.read(13).unwrap(), b"world!");
    }

    #[test]
    fn run_creates_store_with_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("cli.store");

        run(&path, &["a".to_string(), "bc".to_string()], false).unwrap();

        let store = Store::open(&path, &StoreConfig::default()).unwrap();
        assert_eq!(store.size().unwrap(), 19);
        assert_eq!(store.read(9).unwrap(), b"bc");
    }
}
