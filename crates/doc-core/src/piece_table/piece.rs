/// A reference to a contiguous run of bytes inside exactly one block.
///
/// `range` is always inside the block's published bytes; that is checked once
/// in [`Piece::new`] and preserved by every narrowing.
#[derive(Clone, Debug)]
pub struct Piece {
    block: crate::storage::buffer::Block,
    range: std::ops::Range<u64>,
}

impl Piece {
    /// # Errors
    ///
    /// - `DocError::OffsetOutOfRange` if `range` is inverted or reaches past
    ///   the bytes the block has published.
    pub fn new(
        block: crate::storage::buffer::Block,
        range: std::ops::Range<u64>,
    ) -> crate::errors::DocResult<Self> {
        let block_len = <usize as TryInto<u64>>::try_into(block.len())?;

        if range.start > range.end || range.end > block_len {
            return Err(crate::errors::DocError::OffsetOutOfRange {
                offset: range.end,
                len: block_len,
            });
        }

        Ok(Self { block, range })
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.range.end - self.range.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.start == self.range.end
    }

    #[inline]
    pub fn kind(&self) -> crate::enums::BufferKind {
        self.block.kind()
    }

    #[inline]
    pub fn range(&self) -> std::ops::Range<u64> {
        self.range.clone()
    }

    #[inline]
    pub fn block(&self) -> &crate::storage::buffer::Block {
        &self.block
    }

    /// The referenced bytes, borrowed straight from the block.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        let slice = self.slice_of();

        debug_assert!(slice.is_ok(), "piece range escaped its block");

        slice.unwrap_or_default()
    }

    /// The referenced bytes, or an error if `range` no longer fits the block.
    ///
    /// # Errors
    ///
    /// - `DocError::Overflow` if the range does not fit in `usize`.
    /// - `DocError::OffsetOutOfRange` if the range reaches past the block.
    pub fn slice_of(&self) -> crate::errors::DocResult<&[u8]> {
        let start = <u64 as TryInto<usize>>::try_into(self.range.start)?;
        let end = <u64 as TryInto<usize>>::try_into(self.range.end)?;

        self.block
            .get(start..end)
            .ok_or(crate::errors::DocError::OffsetOutOfRange {
                offset: self.range.end,
                len: <usize as TryInto<u64>>::try_into(self.block.len())?,
            })
    }

    /// The sub-piece covering `from..to`, relative to this piece's start.
    /// Callers guarantee `from <= to <= self.len()`.
    #[inline]
    pub(crate) fn narrow(&self, from: u64, to: u64) -> Self {
        debug_assert!(from <= to && to <= self.len());

        Self {
            block: self.block.clone(),
            range: self.range.start + from..self.range.start + to,
        }
    }
}
