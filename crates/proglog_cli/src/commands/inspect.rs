//! Inspect command implementation.

use super::open_existing;
use proglog_store::{Store, StoreError, LEN_WIDTH};
use serde::Serialize;
use std::path::Path;

/// Store inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Store file path.
    pub path: String,
    /// Store size in bytes.
    pub size: u64,
    /// Number of complete records.
    pub record_count: usize,
    /// Total payload bytes across complete records.
    pub payload_bytes: u64,
    /// Position of a trailing incomplete record, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_tail: Option<u64>,
    /// Listed records (bounded by `--limit`).
    pub records: Vec<RecordInfo>,
}

/// A single record's location.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct RecordInfo {
    /// Position of the length prefix.
    pub position: u64,
    /// Payload length in bytes.
    pub length: u64,
}

/// Runs the inspect command.
pub fn run(path: &Path, limit: Option<usize>, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_existing(path)?;
    let result = inspect_store(&store, path, limit)?;
    store.close()?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn inspect_store(
    store: &Store,
    path: &Path,
    limit: Option<usize>,
) -> Result<InspectResult, StoreError> {
    let size = store.size()?;
    let max_records = limit.unwrap_or(usize::MAX);

    let mut result = InspectResult {
        path: path.display().to_string(),
        size,
        record_count: 0,
        payload_bytes: 0,
        partial_tail: None,
        records: Vec::new(),
    };

    let mut position = 0;
    while position < size {
        let mut prefix = [0u8; LEN_WIDTH];
        match store.read_at(&mut prefix, position) {
            Ok(_) => {}
            Err(StoreError::ShortRead { .. }) => {
                result.partial_tail = Some(position);
                break;
            }
            Err(e) => return Err(e),
        }

        let length = u64::from_be_bytes(prefix);
        let remaining = size - position - LEN_WIDTH as u64;
        if length > remaining {
            result.partial_tail = Some(position);
            break;
        }

        if result.records.len() < max_records {
            result.records.push(RecordInfo { position, length });
        }
        result.record_count += 1;
        result.payload_bytes += length;
        position += LEN_WIDTH as u64 + length;
    }

    Ok(result)
}

fn print_text_output(result: &InspectResult) {
    println!("Store: {}", result.path);
    println!("================");
    println!("Size:          {} bytes", result.size);
    println!("Records:       {}", result.record_count);
    println!("Payload bytes: {}", result.payload_bytes);
    if let Some(tail) = result.partial_tail {
        println!("Partial record at position {}", tail);
    }

    if !result.records.is_empty() {
        println!();
        for record in &result.records {
            println!("[{:08}] len={}", record.position, record.length);
        }
        if result.records.len() < result.record_count {
            println!("... {} more", result.record_count - result.records.len());
        }
    }
}
