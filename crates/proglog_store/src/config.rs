//! Store configuration.

/// Size of the in-memory write buffer used when none is configured.
pub const DEFAULT_BUFFER_CAPACITY: usize = 4096;

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Capacity of the write buffer in bytes.
    ///
    /// Records whose framed size reaches this capacity bypass the buffer
    /// and are written to the file directly.
    pub buffer_capacity: usize,

    /// Whether `close` calls `sync_all` after flushing.
    pub sync_on_close: bool,

    /// Whether `Store::open` creates missing parent directories.
    pub create_dirs: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            sync_on_close: false,
            create_dirs: false,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the write buffer capacity. Zero is treated as one byte.
    #[must_use]
    pub const fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Sets whether to sync the file to disk on close.
    #[must_use]
    pub const fn sync_on_close(mut self, value: bool) -> Self {
        self.sync_on_close = value;
        self
    }

    /// Sets whether to create missing parent directories on open.
    #[must_use]
    pub const fn create_dirs(mut self, value: bool) -> Self {
        self.create_dirs = value;
        self
    }

    pub(crate) fn effective_buffer_capacity(&self) -> usize {
        self.buffer_capacity.max(1)
    }
}
