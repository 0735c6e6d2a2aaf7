use std::sync::Arc;

/// The bytes a document was opened with.
pub enum Original {
    Mapped(io::mmap::MmapFile),
    Heap(Box<[u8]>),
}

impl Original {
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Original::Mapped(mmap) => mmap.as_slice(),
            Original::Heap(bytes) => bytes,
        }
    }
}

impl std::fmt::Debug for Original {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Original::Mapped(mmap) => f
                .debug_struct("Mapped")
                .field("path", &mmap.path())
                .field("len", &mmap.len())
                .finish(),
            Original::Heap(bytes) => f.debug_struct("Heap").field("len", &bytes.len()).finish(),
        }
    }
}

/// An immutable, shareable run of bytes a piece can point into.
///
/// Pieces hold a `Block` rather than an id so that slices handed out by an
/// iterator live exactly as long as the segment being iterated. An edit
/// block is the frozen region of one append; its bytes never move.
#[derive(Clone, Debug)]
pub enum Block {
    Original(Arc<Original>),
    Chunk(bytes::Bytes),
}

impl Block {
    #[inline]
    pub fn kind(&self) -> crate::enums::BufferKind {
        match self {
            Block::Original(_) => crate::enums::BufferKind::Original,
            Block::Chunk(_) => crate::enums::BufferKind::Edit,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Block::Original(original) => original.as_slice().len(),
            Block::Chunk(region) => region.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, range: std::ops::Range<usize>) -> Option<&[u8]> {
        match self {
            Block::Original(original) => original.as_slice().get(range),
            Block::Chunk(region) => region.get(range),
        }
    }

    /// Whether both blocks view the same bytes in memory.
    #[inline]
    pub fn same(&self, other: &Block) -> bool {
        match (self, other) {
            (Block::Original(a), Block::Original(b)) => Arc::ptr_eq(a, b),
            (Block::Chunk(a), Block::Chunk(b)) => a.as_ptr() == b.as_ptr() && a.len() == b.len(),
            _ => false,
        }
    }
}

#[derive(Debug)]
struct EditState {
    /// Unwritten capacity of the current chunk. Everything before it has
    /// already been split off and frozen.
    tail: bytes::BytesMut,
    total: u64,
}

/// Append-only store of written bytes, shared by a document lineage.
#[derive(Debug)]
pub struct EditLog {
    chunk_capacity: usize,
    state: std::sync::Mutex<EditState>,
}

impl EditLog {
    fn new(chunk_capacity: usize) -> Self {
        Self {
            chunk_capacity: chunk_capacity.max(1),
            state: std::sync::Mutex::new(EditState {
                tail: bytes::BytesMut::new(),
                total: 0,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EditState> {
        // Appends publish nothing until they split, so the state behind a
        // poisoned lock is still consistent.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn append(&self, bytes: &[u8]) -> crate::errors::DocResult<crate::piece_table::piece::Piece> {
        let mut state = self.lock();
        let added = <usize as TryInto<u64>>::try_into(bytes.len())?;
        let total = state
            .total
            .checked_add(added)
            .ok_or(crate::errors::DocError::Overflow)?;

        let region = if bytes.len() > self.chunk_capacity {
            bytes::Bytes::copy_from_slice(bytes)
        } else {
            // Extending within capacity never reallocates, so regions frozen
            // out of this chunk earlier stay where they are.
            if state.tail.capacity() < bytes.len() {
                state.tail = bytes::BytesMut::with_capacity(self.chunk_capacity);
            }

            state.tail.extend_from_slice(bytes);
            state.tail.split().freeze()
        };

        state.total = total;

        crate::piece_table::piece::Piece::new(Block::Chunk(region), 0..added)
    }
}

/// A backing buffer: either the read-only original or an append-only edit
/// buffer. Cloning shares the same storage.
#[derive(Clone, Debug)]
pub enum Buffer {
    Original(Arc<Original>),
    Edit(Arc<EditLog>),
}

impl Buffer {
    /// Reads or maps the file at `path` into a read-only buffer.
    ///
    /// # Errors
    ///
    /// - `DocError::IoError` on a missing file, a permission error, or a
    ///   truncated read.
    pub fn load(
        path: impl AsRef<std::path::Path>,
        options: &crate::options::Options,
    ) -> crate::errors::DocResult<Self> {
        let path = path.as_ref();
        let file_len = std::fs::metadata(path)?.len();
        let strategy = options.load.resolve(file_len, options.mmap_threshold);
        let original = match strategy {
            crate::enums::LoadStrategy::Mmap => Original::Mapped(io::mmap::MmapFile::open(path)?),
            crate::enums::LoadStrategy::Read | crate::enums::LoadStrategy::Auto => {
                Original::Heap(io::read::read_file(path)?.into_boxed_slice())
            }
        };

        tracing::debug!(
            path = %path.display(),
            bytes = original.as_slice().len(),
            ?strategy,
            "loaded original buffer"
        );

        Ok(Buffer::Original(Arc::new(original)))
    }

    /// A read-only buffer over bytes already in memory.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Buffer::Original(Arc::new(Original::Heap(bytes.into().into_boxed_slice())))
    }

    /// An empty append-only buffer that grows in chunks of `chunk_capacity`.
    pub fn new_edit_buffer(chunk_capacity: usize) -> Self {
        Buffer::Edit(Arc::new(EditLog::new(chunk_capacity)))
    }

    #[inline]
    pub fn kind(&self) -> crate::enums::BufferKind {
        match self {
            Buffer::Original(_) => crate::enums::BufferKind::Original,
            Buffer::Edit(_) => crate::enums::BufferKind::Edit,
        }
    }

    /// Total bytes held (original) or appended so far (edit).
    pub fn len(&self) -> u64 {
        match self {
            Buffer::Original(original) => {
                <usize as TryInto<u64>>::try_into(original.as_slice().len()).unwrap_or(u64::MAX)
            }
            Buffer::Edit(log) => log.lock().total,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends `bytes` and returns a piece covering exactly the written
    /// region. The region never crosses a chunk boundary, and nothing
    /// appended earlier moves.
    ///
    /// # Errors
    ///
    /// - `DocError::NotAppendable` if this is an original buffer.
    /// - `DocError::Overflow` if the buffer's total length would overflow.
    pub fn append(&self, bytes: &[u8]) -> crate::errors::DocResult<crate::piece_table::piece::Piece> {
        match self {
            Buffer::Original(_) => Err(crate::errors::DocError::NotAppendable),
            Buffer::Edit(log) => log.append(bytes),
        }
    }

    /// A piece spanning the whole original buffer, or `None` for an empty
    /// original or an edit buffer.
    pub fn whole(&self) -> Option<crate::piece_table::piece::Piece> {
        match self {
            Buffer::Original(original) if !original.as_slice().is_empty() => {
                let len = <usize as TryInto<u64>>::try_into(original.as_slice().len()).ok()?;

                crate::piece_table::piece::Piece::new(Block::Original(Arc::clone(original)), 0..len)
                    .ok()
            }
            _ => None,
        }
    }

    #[inline]
    pub fn same(&self, other: &Buffer) -> bool {
        match (self, other) {
            (Buffer::Original(a), Buffer::Original(b)) => Arc::ptr_eq(a, b),
            (Buffer::Edit(a), Buffer::Edit(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
