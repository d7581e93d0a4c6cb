//! File-backed record store.

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Width in bytes of the big-endian length prefix in front of every record.
pub const LEN_WIDTH: usize = 8;

/// An append-only store of length-prefixed records in a single file.
///
/// Every record is written as `[8-byte big-endian length][payload]`.
/// [`append`](Self::append) returns the byte position of the record's
/// length prefix; that position is the only handle a caller needs to read
/// the record back with [`read`](Self::read).
///
/// # Buffering and visibility
///
/// Appends go into an in-memory write buffer and the logical size is
/// advanced immediately. [`read`](Self::read) and [`read_at`](Self::read_at)
/// flush the buffer before touching the file, so every record appended
/// before a read started is visible to it. Bytes are only handed to the OS
/// on a flush, and only guaranteed on media after [`sync`](Self::sync) or a
/// close with `sync_on_close` set in [`StoreConfig`].
///
/// # Thread Safety
///
/// A single mutex serializes every operation, reads included. Appends are
/// totally ordered by lock acquisition and no two appends can observe the
/// same position. Share a store between threads with `Arc<Store>`.
///
/// # Caller Contract
///
/// Positions passed to [`read`](Self::read) are trusted. A position that
/// was not returned by `append` is decoded as if it were a record boundary;
/// the store only guarantees that it never reads past its logical end.
#[derive(Debug)]
pub struct Store {
    path: Option<PathBuf>,
    sync_on_close: bool,
    inner: Mutex<Option<StoreInner>>,
}

/// Open-state resources. `None` in the mutex means the store was closed.
#[derive(Debug)]
struct StoreInner {
    writer: BufWriter<File>,
    size: u64,
}

impl Store {
    /// Creates a store over an already-open file with the default configuration.
    ///
    /// The file must be readable and writable. Its current length becomes
    /// the store's size, so a store can resume appending to an existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file's metadata cannot be read or its cursor
    /// cannot be moved to the end.
    pub fn new(file: File) -> StoreResult<Self> {
        Self::with_config(file, &StoreConfig::default())
    }

    /// Creates a store over an already-open file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file's metadata cannot be read or its cursor
    /// cannot be moved to the end.
    pub fn with_config(file: File, config: &StoreConfig) -> StoreResult<Self> {
        Self::build(None, file, config)
    }

    /// Opens or creates the store file at `path`.
    ///
    /// An existing file is opened for reading and appending, never truncated.
    ///
    /// # Errors
    ///
    /// Returns an error if parent directories cannot be created (when
    /// `create_dirs` is set in the [`StoreConfig`]) or the file cannot be opened.
    pub fn open(path: &Path, config: &StoreConfig) -> StoreResult<Self> {
        if config.create_dirs {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        Self::build(Some(path.to_path_buf()), file, config)
    }

    fn build(path: Option<PathBuf>, mut file: File, config: &StoreConfig) -> StoreResult<Self> {
        let size = file.metadata()?.len();
        file.seek(SeekFrom::Start(size))?;

        debug!(path = ?path, size, "opened store");

        Ok(Self {
            path,
            sync_on_close: config.sync_on_close,
            inner: Mutex::new(Some(StoreInner {
                writer: BufWriter::with_capacity(config.effective_buffer_capacity(), file),
                size,
            })),
        })
    }

    /// Returns the path of the store file, if it was opened by path.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Appends `payload` as one record at the end of the store.
    ///
    /// Returns `(bytes_written, position)`: the framed size of the record
    /// (`LEN_WIDTH + payload.len()`) and the position of its length prefix.
    ///
    /// On error the size is unchanged and no bytes of the record remain
    /// past the logical end of the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is closed or the record cannot be
    /// written.
    pub fn append(&self, payload: &[u8]) -> StoreResult<(u64, u64)> {
        let mut guard = self.inner.lock();
        let inner = guard.as_mut().ok_or(StoreError::Closed)?;
        inner.append(payload)
    }

    /// Reads the payload of the record starting at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShortRead`] if the length prefix or the payload
    /// it declares extends past the end of the store, [`StoreError::Closed`]
    /// if the store is closed, or an I/O error if the flush or read fails.
    pub fn read(&self, position: u64) -> StoreResult<Vec<u8>> {
        let mut guard = self.inner.lock();
        let inner = guard.as_mut().ok_or(StoreError::Closed)?;
        inner.read(position)
    }

    /// Reads raw bytes at `offset` into `buf`, ignoring record framing.
    ///
    /// Returns the number of bytes read, which is always `buf.len()` on
    /// success.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShortRead`] if the file ends before `buf` is
    /// full; the bytes that were available are left at the front of `buf`
    /// and their count is reported as `available`.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> StoreResult<usize> {
        let mut guard = self.inner.lock();
        let inner = guard.as_mut().ok_or(StoreError::Closed)?;
        inner.writer.flush()?;
        inner.read_at(buf, offset)
    }

    /// Pushes buffered records to the file without reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is closed or the flush fails.
    pub fn flush(&self) -> StoreResult<()> {
        let mut guard = self.inner.lock();
        let inner = guard.as_mut().ok_or(StoreError::Closed)?;
        inner.writer.flush()?;
        Ok(())
    }

    /// Flushes buffered records and syncs the file to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is closed or the flush or sync fails.
    pub fn sync(&self) -> StoreResult<()> {
        let mut guard = self.inner.lock();
        let inner = guard.as_mut().ok_or(StoreError::Closed)?;
        inner.writer.flush()?;
        inner.writer.get_ref().sync_all()?;
        Ok(())
    }

    /// Returns the logical size of the store, including buffered bytes.
    ///
    /// This is the position the next append will return.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] if the store is closed.
    pub fn size(&self) -> StoreResult<u64> {
        self.inner
            .lock()
            .as_ref()
            .map(|inner| inner.size)
            .ok_or(StoreError::Closed)
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.lock().is_none()
    }

    /// Flushes buffered records and closes the file.
    ///
    /// The store is closed even if the flush fails; the error is returned
    /// and buffered records must be treated as not persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] if already closed, or an I/O error if
    /// the flush or (with `sync_on_close`) the sync fails.
    pub fn close(&self) -> StoreResult<()> {
        let mut guard = self.inner.lock();
        let inner = guard.take().ok_or(StoreError::Closed)?;
        let size = inner.size;

        let file = match inner.writer.into_inner() {
            Ok(file) => file,
            Err(err) => {
                // Drop the unflushed bytes without letting BufWriter retry.
                let (err, writer) = err.into_parts();
                let (_file, unflushed) = writer.into_parts();
                warn!(
                    path = ?self.path,
                    size,
                    unflushed = unflushed.map_or(0, |buf| buf.len()),
                    "closed store with unflushed records"
                );
                return Err(err.into());
            }
        };
        if self.sync_on_close {
            file.sync_all()?;
        }
        drop(file);

        debug!(path = ?self.path, size, "closed store");
        Ok(())
    }
}

impl StoreInner {
    fn append(&mut self, payload: &[u8]) -> StoreResult<(u64, u64)> {
        let position = self.size;
        let prefix = (payload.len() as u64).to_be_bytes();
        let frame_len = LEN_WIDTH + payload.len();

        // A frame strictly smaller than the spare capacity is copied into
        // the buffer, which cannot fail.
        let spare = self.writer.capacity() - self.writer.buffer().len();
        if frame_len >= spare {
            self.writer.flush()?;
        }

        if frame_len >= self.writer.capacity() {
            self.write_direct(&prefix, payload)?;
        } else {
            self.writer.write_all(&prefix)?;
            self.writer.write_all(payload)?;
        }

        let written = frame_len as u64;
        self.size += written;

        trace!(position, written, "appended record");
        Ok((written, position))
    }

    /// Writes a frame that does not fit the buffer straight to the file.
    ///
    /// The buffer must be empty. A failed write is rolled back by truncating
    /// the file to the logical size.
    fn write_direct(&mut self, prefix: &[u8], payload: &[u8]) -> StoreResult<()> {
        let size = self.size;
        let file = self.writer.get_mut();

        let result = file.write_all(prefix).and_then(|()| file.write_all(payload));
        if let Err(err) = result {
            rollback_tail(file, size);
            return Err(err.into());
        }

        Ok(())
    }

    fn read(&mut self, position: u64) -> StoreResult<Vec<u8>> {
        self.writer.flush()?;

        let mut prefix = [0u8; LEN_WIDTH];
        self.read_at(&mut prefix, position)?;
        let len = u64::from_be_bytes(prefix);

        let start = position + LEN_WIDTH as u64;
        let available = self.size.saturating_sub(start);
        if len > available {
            return Err(StoreError::ShortRead {
                offset: start,
                expected: len,
                available,
            });
        }

        let len = usize::try_from(len).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("record of {len} bytes does not fit in memory"),
            )
        })?;
        let mut payload = vec![0u8; len];
        self.read_at(&mut payload, start)?;

        trace!(position, len, "read record");
        Ok(payload)
    }

    /// Positional read. The caller must have flushed the buffer.
    ///
    /// Leaves the file cursor at the logical end so later flushes append.
    fn read_at(&mut self, buf: &mut [u8], offset: u64) -> StoreResult<usize> {
        let size = self.size;
        let file = self.writer.get_mut();

        file.seek(SeekFrom::Start(offset))?;
        let filled = fill(file, buf);
        file.seek(SeekFrom::Start(size))?;
        let filled = filled?;

        if filled < buf.len() {
            return Err(StoreError::ShortRead {
                offset,
                expected: buf.len() as u64,
                available: filled as u64,
            });
        }

        Ok(filled)
    }
}

/// Drops bytes past `size` and moves the cursor back to `size`.
///
/// The cursor is repositioned even if the truncation fails, so later
/// flushes still land at the logical end.
fn rollback_tail(file: &mut File, size: u64) {
    if let Err(err) = file.set_len(size) {
        warn!(size, error = %err, "failed to truncate torn append");
    }
    if let Err(err) = file.seek(SeekFrom::Start(size)) {
        warn!(size, error = %err, "failed to reposition cursor after torn append");
    }
}

/// Reads until `buf` is full or the file ends, returning the bytes read.
fn fill(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
