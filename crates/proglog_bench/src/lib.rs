//! Benchmark utilities for the proglog record store.

use proglog_store::{Store, StoreConfig};
use rand::Rng;
use tempfile::TempDir;

/// Generate random record data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Open a fresh store in a temporary directory.
///
/// The directory must outlive the store.
pub fn temp_store(config: &StoreConfig) -> (TempDir, Store) {
    let dir = TempDir::new().expect("create temp dir");
    let store = Store::open(&dir.path().join("bench.store"), config).expect("open store");
    (dir, store)
}

/// Fill a store with `count` records of `size` bytes, returning their positions.
pub fn populate(store: &Store, count: usize, size: usize) -> Vec<u64> {
    let data = random_data(size);
    (0..count)
        .map(|_| store.append(&data).expect("append").1)
        .collect()
}
