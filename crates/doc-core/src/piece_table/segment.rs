static NEXT_SEGMENT_ID: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

fn next_segment_id() -> u64 {
    NEXT_SEGMENT_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
}

/// An ordered list of pieces whose concatenation is a document's content.
///
/// - A segment owns its piece list and shares the buffers behind it with
///   every segment derived from the same document.
/// - `ends[i]` is the logical offset one past piece `i`, so offset lookups
///   are a binary search and the length is `ends.last()`.
/// - `version` is bumped by every mutation; points and cursors carry the
///   version they were taken at.
#[derive(Debug)]
pub struct Segment {
    pub(crate) id: u64,
    pub(crate) version: u64,
    pub(crate) writable: bool,
    pub(crate) pieces: Vec<crate::piece_table::piece::Piece>,
    pub(crate) ends: Vec<u64>,
    /// Append-only buffer `write` draws from; shared across the lineage.
    pub(crate) edits: crate::storage::buffer::Buffer,
    pub(crate) path: Option<std::path::PathBuf>,
}

/*

====================================
========= CREATION METHOD ==========
====================================

*/

impl Segment {
    /// A segment over a whole buffer.
    ///
    /// An original buffer becomes a single piece (no pieces when empty) with
    /// a fresh edit buffer. An edit buffer gives an empty segment whose writes
    /// land in that same edit buffer.
    pub fn from_buffer(
        buffer: &crate::storage::buffer::Buffer,
        options: &crate::options::Options,
    ) -> Self {
        let (pieces, edits) = match buffer {
            crate::storage::buffer::Buffer::Original(_) => (
                buffer.whole().into_iter().collect::<Vec<_>>(),
                crate::storage::buffer::Buffer::new_edit_buffer(options.chunk_capacity),
            ),
            crate::storage::buffer::Buffer::Edit(_) => (Vec::new(), buffer.clone()),
        };
        let ends = pieces.iter().map(crate::piece_table::piece::Piece::len).collect();

        Self {
            id: next_segment_id(),
            version: 0,
            writable: !options.read_only,
            pieces,
            ends,
            edits,
            path: None,
        }
    }

    /// An in-memory document with no file behind it. Save it with
    /// [`Segment::save_as`].
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::from_buffer(
            &crate::storage::buffer::Buffer::from_bytes(bytes),
            &crate::options::Options::default(),
        )
    }

    /// Opens a file with default [`Options`](crate::options::Options).
    ///
    /// # Errors
    ///
    /// - `DocError::IoError` if the file is missing, unreadable, or comes
    ///   back truncated.
    pub fn open(path: impl AsRef<std::path::Path>) -> crate::errors::DocResult<Self> {
        Self::open_with(path, &crate::options::Options::default())
    }

    /// # Errors
    ///
    /// - `DocError::IoError` if the file is missing, unreadable, or comes
    ///   back truncated.
    pub fn open_with(
        path: impl AsRef<std::path::Path>,
        options: &crate::options::Options,
    ) -> crate::errors::DocResult<Self> {
        let path = path.as_ref();
        let original = crate::storage::buffer::Buffer::load(path, options)?;
        let mut segment = Self::from_buffer(&original, options);

        segment.path = Some(path.to_path_buf());

        tracing::debug!(
            segment = segment.id,
            path = %path.display(),
            len = segment.len(),
            read_only = options.read_only,
            "opened segment"
        );

        Ok(segment)
    }

    /// A new segment sharing `edits`, with its own identity and index.
    pub(crate) fn with_pieces(
        pieces: Vec<crate::piece_table::piece::Piece>,
        edits: crate::storage::buffer::Buffer,
        path: Option<std::path::PathBuf>,
        writable: bool,
    ) -> crate::errors::DocResult<Self> {
        let mut segment = Self {
            id: next_segment_id(),
            version: 0,
            writable,
            pieces: Vec::new(),
            ends: Vec::new(),
            edits,
            path,
        };

        segment.replace_pieces(pieces)?;

        Ok(segment)
    }
}

/*

====================================
========= INLINE METHODS  ==========
====================================

*/

impl Segment {
    /// Total document length in bytes.
    #[inline]
    pub fn len(&self) -> u64 {
        self.ends.last().copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn pieces(&self) -> &[crate::piece_table::piece::Piece] {
        &self.pieces
    }

    /// Process-unique identity of this segment.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Bumped by every mutation of the piece list.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[inline]
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    #[inline]
    pub fn set_read_only(&mut self, read_only: bool) {
        self.writable = !read_only;
    }

    #[inline]
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    /// The edit buffer `write` appends to.
    #[inline]
    pub fn edit_buffer(&self) -> &crate::storage::buffer::Buffer {
        &self.edits
    }

    #[inline]
    fn piece_start(&self, idx: usize) -> u64 {
        idx.checked_sub(1).map_or(0, |prev| self.ends[prev])
    }
}

/*

====================================
=========== PIECE INDEX ============
====================================

*/

impl Segment {
    /// Locates the piece holding logical `offset`.
    ///
    /// Offsets on a piece boundary resolve to the start of the following
    /// piece. `offset == len()` resolves to `(piece_count(), 0)`, the
    /// end-of-document position.
    ///
    /// # Errors
    ///
    /// - `DocError::OffsetOutOfRange` if `offset > len()`.
    pub fn piece_at_offset(&self, offset: u64) -> crate::errors::DocResult<(usize, u64)> {
        let len = self.len();

        if offset > len {
            return Err(crate::errors::DocError::OffsetOutOfRange { offset, len });
        }

        let idx = self.ends.partition_point(|&end| end <= offset);

        if idx == self.pieces.len() {
            return Ok((idx, 0));
        }

        Ok((idx, offset - self.piece_start(idx)))
    }

    /// Swaps in a new piece list and rebuilds the running-length index.
    /// Empty pieces are dropped. Leaves the segment untouched on overflow.
    pub(crate) fn replace_pieces(
        &mut self,
        pieces: Vec<crate::piece_table::piece::Piece>,
    ) -> crate::errors::DocResult<()> {
        let pieces: Vec<_> = pieces.into_iter().filter(|piece| !piece.is_empty()).collect();
        let mut ends = Vec::with_capacity(pieces.len());
        let mut total = 0u64;

        for piece in &pieces {
            total = total
                .checked_add(piece.len())
                .ok_or(crate::errors::DocError::Overflow)?;
            ends.push(total);
        }

        self.pieces = pieces;
        self.ends = ends;

        Ok(())
    }

    /// Appends one piece to the end. `new_len` is the precomputed length
    /// after the push.
    pub(crate) fn push_piece(&mut self, piece: crate::piece_table::piece::Piece, new_len: u64) {
        self.pieces.push(piece);
        self.ends.push(new_len);
    }

    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
    }

    pub(crate) fn ensure_writable(&self) -> crate::errors::DocResult<()> {
        if self.writable {
            return Ok(());
        }

        tracing::warn!(segment = self.id, "rejected mutation of read-only segment");

        Err(crate::errors::DocError::NotWritable)
    }

    /// Checks that a handle stamped with `(segment, version)` still
    /// describes this segment.
    pub(crate) fn check_handle(&self, segment: u64, version: u64) -> crate::errors::DocResult<()> {
        if segment != self.id {
            tracing::warn!(
                segment = self.id,
                handle_segment = segment,
                "handle used against a foreign segment"
            );

            return Err(crate::errors::DocError::InvalidPoint {
                handle_segment: segment,
                segment: self.id,
            });
        }

        if version != self.version {
            tracing::warn!(
                segment = self.id,
                handle_version = version,
                current = self.version,
                "stale handle"
            );

            return Err(crate::errors::DocError::StaleHandle {
                handle_version: version,
                current: self.version,
            });
        }

        Ok(())
    }
}

/*

====================================
========== SAVE AND CLOSE ==========
====================================

*/

impl Segment {
    /// Writes the content back to the file this segment was opened from.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// - `DocError::NoPath` if the segment has no file path.
    /// - `DocError::IoError` if the atomic save fails; the file on disk is
    ///   left as it was.
    pub fn save(&self) -> crate::errors::DocResult<u64> {
        let path = self.path.as_deref().ok_or(crate::errors::DocError::NoPath)?;

        self.save_to(path)
    }

    /// Writes the content to `path` without changing this segment's own path.
    ///
    /// # Errors
    ///
    /// - `DocError::IoError` if the atomic save fails; the file on disk is
    ///   left as it was.
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) -> crate::errors::DocResult<u64> {
        let path = path.as_ref();
        let written = io::atomic::replace_with(path, self.iter())?;

        tracing::info!(
            segment = self.id,
            path = %path.display(),
            bytes = written,
            pieces = self.pieces.len(),
            "saved segment"
        );

        Ok(written)
    }

    /// Saves to `path` and, once that succeeded, points the segment at it.
    ///
    /// # Errors
    ///
    /// - `DocError::IoError` if the atomic save fails. The segment keeps its
    ///   old path.
    pub fn save_as(&mut self, path: impl AsRef<std::path::Path>) -> crate::errors::DocResult<u64> {
        let path = path.as_ref();
        let written = self.save_to(path)?;

        self.path = Some(path.to_path_buf());

        Ok(written)
    }

    /// Releases the piece list. Buffers are freed once no piece in any
    /// segment refers to them.
    pub fn close(self) {
        tracing::debug!(segment = self.id, pieces = self.pieces.len(), "closed segment");
    }
}

/*

====================================
========== MISCELLANEOUS ===========
====================================

*/

impl Segment {
    /// Copies the whole content into one contiguous vector.
    pub fn to_vec(&self) -> Vec<u8> {
        let mut res =
            Vec::with_capacity(<u64 as TryInto<usize>>::try_into(self.len()).unwrap_or_default());

        for slice in self.iter() {
            res.extend_from_slice(slice);
        }

        res
    }

    /// Copies `begin..end` into one contiguous vector.
    ///
    /// # Errors
    ///
    /// - `DocError::OffsetOutOfRange` if either offset is past the end.
    /// - `DocError::RangeInverted` if `begin > end`.
    pub fn copy_range(&self, begin: u64, end: u64) -> crate::errors::DocResult<Vec<u8>> {
        let begin = self.get_point(begin)?;
        let end = self.get_point(end)?;

        Ok(self.subseg(&begin, &end)?.to_vec())
    }
}
