/// Forward-only walk over a segment's pieces, one zero-copy slice per piece.
///
/// The iterator borrows its segment, so the segment cannot be written to
/// while the iterator is alive. An exhausted iterator keeps returning
/// `None`; call [`Segment::iter`] again to restart. Use [`Iter::checkpoint`]
/// to keep a position across a point where the borrow must end.
///
/// [`Segment::iter`]: crate::piece_table::segment::Segment::iter
#[derive(Clone, Debug)]
pub struct Iter<'seg> {
    segment: &'seg crate::piece_table::segment::Segment,
    index: usize,
    consumed: u64,
}

/// A detached iterator position. Unlike [`Iter`] it does not borrow the
/// segment, so it carries the segment's identity and version instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    segment: u64,
    version: u64,
    index: usize,
    consumed: u64,
}

impl Cursor {
    /// Bytes already yielded before this position.
    #[inline]
    pub fn consumed(&self) -> u64 {
        self.consumed
    }
}

impl<'seg> Iter<'seg> {
    #[inline]
    pub fn segment(&self) -> &'seg crate::piece_table::segment::Segment {
        self.segment
    }

    /// Bytes yielded so far.
    #[inline]
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Bytes not yet yielded.
    #[inline]
    pub fn remaining_len(&self) -> u64 {
        self.segment.len() - self.consumed
    }

    /// Resolves a point `offset` bytes past the current position, within the
    /// content not yet yielded.
    ///
    /// # Errors
    ///
    /// - `DocError::OffsetOutOfRange` if `offset > remaining_len()`.
    pub fn get_point(&self, offset: u64) -> crate::errors::DocResult<crate::point::Point> {
        let remaining = self.remaining_len();

        if offset > remaining {
            return Err(crate::errors::DocError::OffsetOutOfRange {
                offset,
                len: remaining,
            });
        }

        self.segment.get_point(self.consumed + offset)
    }

    #[inline]
    pub fn checkpoint(&self) -> Cursor {
        Cursor {
            segment: self.segment.id,
            version: self.segment.version,
            index: self.index,
            consumed: self.consumed,
        }
    }
}

impl<'seg> Iterator for Iter<'seg> {
    type Item = &'seg [u8];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let piece = self.segment.pieces.get(self.index)?;

        self.index += 1;
        self.consumed += piece.len();

        Some(piece.bytes())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.segment.pieces.len().saturating_sub(self.index);

        (left, Some(left))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl std::iter::FusedIterator for Iter<'_> {}

impl crate::piece_table::segment::Segment {
    /// Starts a walk before the first piece. O(1).
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            segment: self,
            index: 0,
            consumed: 0,
        }
    }

    /// Restarts iteration from a saved [`Cursor`].
    ///
    /// # Errors
    ///
    /// - `DocError::InvalidPoint` if the cursor came from another segment.
    /// - `DocError::StaleHandle` if this segment was written to since.
    pub fn resume(&self, cursor: &Cursor) -> crate::errors::DocResult<Iter<'_>> {
        self.check_handle(cursor.segment, cursor.version)?;

        Ok(Iter {
            segment: self,
            index: cursor.index,
            consumed: cursor.consumed,
        })
    }
}

impl<'seg> IntoIterator for &'seg crate::piece_table::segment::Segment {
    type Item = &'seg [u8];
    type IntoIter = Iter<'seg>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
