/// Which kind of backing buffer a piece reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// The file's bytes as loaded by `open`. Read-only.
    Original,
    /// Bytes introduced by `write`. Append-only.
    Edit,
}

/// How `open` brings a file's bytes into memory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Map large files, read small ones.
    #[default]
    Auto,
    /// Always memory-map.
    Mmap,
    /// Always read into the heap.
    Read,
}

impl LoadStrategy {
    /// Collapses `Auto` into a concrete strategy for a file of `file_len` bytes.
    #[must_use]
    pub fn resolve(self, file_len: u64, mmap_threshold: u64) -> Self {
        match self {
            LoadStrategy::Auto if file_len >= mmap_threshold => LoadStrategy::Mmap,
            LoadStrategy::Auto => LoadStrategy::Read,
            other => other,
        }
    }
}
