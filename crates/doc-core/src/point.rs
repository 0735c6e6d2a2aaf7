/// A resolved position inside one specific segment.
///
/// A point remembers the piece it landed in and the offset within that
/// piece, so `subseg` never has to search again. It is stamped with the
/// segment's identity and version: using it against another segment, or
/// after the segment was mutated, is an error rather than a wrong answer.
///
/// Points order by logical offset.
#[derive(Clone, Copy, Debug)]
pub struct Point {
    pub(crate) segment: u64,
    pub(crate) version: u64,
    pub(crate) offset: u64,
    pub(crate) piece: usize,
    pub(crate) intra: u64,
}

impl Point {
    /// Logical byte offset from the start of the segment.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Index of the piece the point sits in; equals the piece count at the
    /// end of the document.
    #[inline]
    pub fn piece_index(&self) -> usize {
        self.piece
    }

    #[inline]
    pub fn intra_offset(&self) -> u64 {
        self.intra
    }

    #[inline]
    pub fn segment_id(&self) -> u64 {
        self.segment
    }

    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Point {}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.offset
            .cmp(&other.offset)
            .then(self.segment.cmp(&other.segment))
            .then(self.version.cmp(&other.version))
    }
}

impl crate::piece_table::segment::Segment {
    /// Resolves `offset` into a point. `offset == len()` is the
    /// end-of-document point.
    ///
    /// # Errors
    ///
    /// - `DocError::OffsetOutOfRange` if `offset > len()`.
    pub fn get_point(&self, offset: u64) -> crate::errors::DocResult<Point> {
        let (piece, intra) = self.piece_at_offset(offset)?;

        Ok(Point {
            segment: self.id,
            version: self.version,
            offset,
            piece,
            intra,
        })
    }

    /// Verifies `point` was resolved against this segment at its current
    /// version.
    ///
    /// # Errors
    ///
    /// - `DocError::InvalidPoint` for a point from another segment.
    /// - `DocError::StaleHandle` if this segment changed since.
    #[inline]
    pub fn check_point(&self, point: &Point) -> crate::errors::DocResult<()> {
        self.check_handle(point.segment, point.version)
    }

    /// A new segment covering `begin..end` of this one.
    ///
    /// Only piece descriptors are copied: the piece holding `begin` is cut on
    /// its left, the piece holding `end` on its right, and everything between
    /// is cloned as is. The result shares buffers with `self` but has its own
    /// piece list, identity and version, so later writes to either side do
    /// not affect the other. It inherits the path and writability of `self`.
    ///
    /// # Errors
    ///
    /// - `DocError::InvalidPoint` / `DocError::StaleHandle` if either point
    ///   does not belong to this segment as it is now.
    /// - `DocError::RangeInverted` if `begin` comes after `end`.
    pub fn subseg(&self, begin: &Point, end: &Point) -> crate::errors::DocResult<Self> {
        self.check_point(begin)?;
        self.check_point(end)?;

        if begin.offset > end.offset {
            return Err(crate::errors::DocError::RangeInverted {
                begin: begin.offset,
                end: end.offset,
            });
        }

        let last = end.piece.min(self.pieces.len().saturating_sub(1));
        let mut pieces = Vec::with_capacity(last.saturating_sub(begin.piece) + 1);

        for idx in begin.piece..=last {
            let Some(piece) = self.pieces.get(idx) else {
                break;
            };
            let from = if idx == begin.piece { begin.intra } else { 0 };
            let to = if idx == end.piece { end.intra } else { piece.len() };

            if from < to {
                pieces.push(piece.narrow(from, to));
            }
        }

        let sub = Self::with_pieces(pieces, self.edits.clone(), self.path.clone(), self.writable)?;

        tracing::debug!(
            segment = self.id,
            sub = sub.id,
            begin = begin.offset,
            end = end.offset,
            pieces = sub.pieces.len(),
            "took subsegment"
        );

        Ok(sub)
    }
}
