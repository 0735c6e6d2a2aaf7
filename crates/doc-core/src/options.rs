/// Files at least this large are memory-mapped under [`LoadStrategy::Auto`].
///
/// [`LoadStrategy::Auto`]: crate::enums::LoadStrategy::Auto
pub const DEFAULT_MMAP_THRESHOLD: u64 = 1024 * 1024; // 1MB

/// Capacity of one edit-buffer chunk.
pub const DEFAULT_CHUNK_CAPACITY: usize = 64 * 1024; // 64KB

/// Knobs for opening a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub load: crate::enums::LoadStrategy,
    pub mmap_threshold: u64,
    /// Edit-buffer chunk capacity in bytes. Clamped to at least 1.
    pub chunk_capacity: usize,
    /// Open as a segment that rejects `write`.
    pub read_only: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            load: crate::enums::LoadStrategy::Auto,
            mmap_threshold: DEFAULT_MMAP_THRESHOLD,
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
            read_only: false,
        }
    }
}

impl Options {
    #[must_use]
    pub fn with_load(mut self, load: crate::enums::LoadStrategy) -> Self {
        self.load = load;
        self
    }

    #[must_use]
    pub fn with_chunk_capacity(mut self, chunk_capacity: usize) -> Self {
        self.chunk_capacity = chunk_capacity;
        self
    }

    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}
