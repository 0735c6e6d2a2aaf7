/*

=====================================
======== WRITE / CONCATENATE ========
=====================================

*/

impl crate::piece_table::segment::Segment {
    /// Appends `bytes` at the logical end of the document.
    ///
    /// The bytes are copied once into the lineage's edit buffer and a single
    /// new piece pointing at them is pushed; existing pieces are left alone.
    /// Outstanding points and cursors for this segment go stale. An empty
    /// write changes nothing.
    ///
    /// # Errors
    ///
    /// - `DocError::NotWritable` if the segment is read-only.
    /// - `DocError::Overflow` if the length would overflow.
    /// - `DocError::NotAppendable` from the storage pool.
    ///
    /// On error the piece list is unchanged.
    pub fn write(&mut self, bytes: &[u8]) -> crate::errors::DocResult<()> {
        self.ensure_writable()?;

        if bytes.is_empty() {
            return Ok(());
        }

        let new_len = self
            .len()
            .checked_add(<usize as TryInto<u64>>::try_into(bytes.len())?)
            .ok_or(crate::errors::DocError::Overflow)?;
        let piece = self.edits.append(bytes)?;

        self.push_piece(piece, new_len);
        self.bump_version();

        tracing::debug!(
            segment = self.id,
            bytes = bytes.len(),
            len = new_len,
            version = self.version,
            "wrote to segment"
        );

        Ok(())
    }

    /// A new segment holding `self`'s pieces followed by `other`'s.
    ///
    /// No bytes are copied. The result keeps `self`'s edit buffer, path and
    /// writability; buffers of both inputs stay shared.
    ///
    /// # Errors
    ///
    /// - `DocError::Overflow` if the combined length would overflow.
    pub fn concat(&self, other: &Self) -> crate::errors::DocResult<Self> {
        let mut pieces = Vec::with_capacity(self.pieces.len() + other.pieces.len());

        pieces.extend_from_slice(&self.pieces);
        pieces.extend_from_slice(&other.pieces);

        let joined = Self::with_pieces(pieces, self.edits.clone(), self.path.clone(), self.writable)?;

        tracing::debug!(
            left = self.id,
            right = other.id,
            joined = joined.id,
            len = joined.len(),
            "concatenated segments"
        );

        Ok(joined)
    }
}

/*

=====================================
========= INSERT / REMOVE ===========
=====================================

*/

impl crate::piece_table::segment::Segment {
    /// Inserts `bytes` at `at`.
    ///
    /// Splits the document into before/after views around `at`, writes
    /// `bytes` into the before view, concatenates the two, and adopts the
    /// resulting piece list. All existing handles for this segment go stale.
    ///
    /// # Errors
    ///
    /// - `DocError::NotWritable` if the segment is read-only.
    /// - `DocError::InvalidPoint` / `DocError::StaleHandle` for a point that
    ///   does not describe this segment as it is now.
    ///
    /// On error the segment is unchanged.
    pub fn insert(&mut self, at: &crate::point::Point, bytes: &[u8]) -> crate::errors::DocResult<()> {
        self.ensure_writable()?;
        self.check_point(at)?;

        if bytes.is_empty() {
            return Ok(());
        }

        let start = self.get_point(0)?;
        let end = self.get_point(self.len())?;
        let mut before = self.subseg(&start, at)?;
        let after = self.subseg(at, &end)?;

        before.write(bytes)?;

        let joined = before.concat(&after)?;

        self.adopt(joined)?;

        tracing::debug!(
            segment = self.id,
            at = at.offset(),
            bytes = bytes.len(),
            version = self.version,
            "inserted into segment"
        );

        Ok(())
    }

    /// Inserts `bytes` at logical `offset`.
    ///
    /// # Errors
    ///
    /// - `DocError::OffsetOutOfRange` if `offset > len()`.
    /// - Everything [`Segment::insert`](Self::insert) reports.
    pub fn insert_at(&mut self, offset: u64, bytes: &[u8]) -> crate::errors::DocResult<()> {
        let at = self.get_point(offset)?;

        self.insert(&at, bytes)
    }

    /// Removes the bytes between `begin` and `end`.
    ///
    /// # Errors
    ///
    /// - `DocError::NotWritable` if the segment is read-only.
    /// - `DocError::InvalidPoint` / `DocError::StaleHandle` for foreign or
    ///   outdated points.
    /// - `DocError::RangeInverted` if `begin` comes after `end`.
    ///
    /// On error the segment is unchanged.
    pub fn remove(
        &mut self,
        begin: &crate::point::Point,
        end: &crate::point::Point,
    ) -> crate::errors::DocResult<()> {
        self.ensure_writable()?;
        self.check_point(begin)?;
        self.check_point(end)?;

        if begin.offset() > end.offset() {
            return Err(crate::errors::DocError::RangeInverted {
                begin: begin.offset(),
                end: end.offset(),
            });
        }

        if begin.offset() == end.offset() {
            return Ok(());
        }

        let start = self.get_point(0)?;
        let doc_end = self.get_point(self.len())?;
        let before = self.subseg(&start, begin)?;
        let after = self.subseg(end, &doc_end)?;
        let joined = before.concat(&after)?;

        self.adopt(joined)?;

        tracing::debug!(
            segment = self.id,
            begin = begin.offset(),
            end = end.offset(),
            version = self.version,
            "removed range from segment"
        );

        Ok(())
    }

    /// Removes logical `begin..end`.
    ///
    /// # Errors
    ///
    /// - `DocError::OffsetOutOfRange` if either offset is past the end.
    /// - Everything [`Segment::remove`](Self::remove) reports.
    pub fn remove_range(&mut self, begin: u64, end: u64) -> crate::errors::DocResult<()> {
        let begin = self.get_point(begin)?;
        let end = self.get_point(end)?;

        self.remove(&begin, &end)
    }

    /// Takes over another segment's pieces while keeping this segment's
    /// identity, path and edit buffer.
    fn adopt(&mut self, other: Self) -> crate::errors::DocResult<()> {
        self.replace_pieces(other.pieces)?;
        self.bump_version();

        Ok(())
    }
}

#[cfg(test)]
mod edit_tests {
    use crate::piece_table::segment::Segment;

    #[test]
    fn write_appends_one_piece() {
        let mut seg = Segment::from_bytes(b"hello\nworld!".to_vec());

        seg.write(b"!!").unwrap();

        assert_eq!(seg.len(), 14);
        assert_eq!(seg.piece_count(), 2);
        assert_eq!(seg.pieces()[1].kind(), crate::enums::BufferKind::Edit);
        assert_eq!(seg.to_vec(), b"hello\nworld!!!");
        assert_eq!(seg.version(), 1);
    }

    #[test]
    fn consecutive_writes_do_not_merge_pieces() {
        let mut seg = Segment::from_bytes(Vec::new());

        seg.write(b"a").unwrap();
        seg.write(b"b").unwrap();
        seg.write(b"c").unwrap();

        assert_eq!(seg.piece_count(), 3);
        assert_eq!(seg.to_vec(), b"abc");
    }

    #[test]
    fn empty_write_is_a_no_op() {
        let mut seg = Segment::from_bytes(b"x".to_vec());
        let p = seg.get_point(0).unwrap();

        seg.write(b"").unwrap();

        assert_eq!(seg.piece_count(), 1);
        assert!(seg.check_point(&p).is_ok());
    }

    #[test]
    fn write_on_read_only_segment_changes_nothing() {
        let mut seg = Segment::from_bytes(b"frozen".to_vec()).read_only();

        assert!(matches!(seg.write(b"!"), Err(crate::errors::DocError::NotWritable)));
        assert_eq!(seg.len(), 6);
        assert_eq!(seg.version(), 0);
        assert!(seg.edit_buffer().is_empty());
    }

    #[test]
    fn writes_to_subsegment_and_source_are_independent() {
        let mut seg = Segment::from_bytes(b"hello\nworld!".to_vec());
        let mut tail = seg
            .subseg(&seg.get_point(6).unwrap(), &seg.get_point(12).unwrap())
            .unwrap();

        seg.write(b"?").unwrap();
        tail.write(b"!").unwrap();

        assert_eq!(seg.to_vec(), b"hello\nworld!?");
        assert_eq!(tail.to_vec(), b"world!!");
        // Both appended into the lineage's one edit buffer.
        assert!(seg.edit_buffer().same(tail.edit_buffer()));
        assert_eq!(seg.edit_buffer().len(), 2);
    }

    #[test]
    fn write_to_source_keeps_subsegment_points_valid() {
        let mut seg = Segment::from_bytes(b"abcdef".to_vec());
        let sub = seg
            .subseg(&seg.get_point(1).unwrap(), &seg.get_point(4).unwrap())
            .unwrap();
        let p = sub.get_point(1).unwrap();

        seg.write(b"g").unwrap();

        assert!(sub.check_point(&p).is_ok());
    }

    #[test]
    fn concat_joins_pieces_without_copying() {
        let left = Segment::from_bytes(b"hello ".to_vec());
        let mut right = Segment::from_bytes(b"world".to_vec());

        right.write(b"!").unwrap();

        let joined = left.concat(&right).unwrap();

        assert_eq!(joined.to_vec(), b"hello world!");
        assert_eq!(joined.piece_count(), 3);
        assert!(joined.pieces()[1].block().same(right.pieces()[0].block()));
        assert!(joined.edit_buffer().same(left.edit_buffer()));
    }

    #[test]
    fn insert_in_the_middle() {
        let mut seg = Segment::from_bytes(b"helo".to_vec());

        seg.insert_at(3, b"l").unwrap();

        assert_eq!(seg.to_vec(), b"hello");
        assert_eq!(seg.piece_count(), 3);
    }

    #[test]
    fn insert_at_start_and_end() {
        let mut seg = Segment::from_bytes(b"world".to_vec());

        seg.insert_at(0, b"hello ").unwrap();
        seg.insert_at(seg.len(), b"!").unwrap();

        assert_eq!(seg.to_vec(), b"hello world!");
    }

    #[test]
    fn insert_keeps_identity_but_invalidates_points() {
        let mut seg = Segment::from_bytes(b"abc".to_vec());
        let id = seg.id();
        let at = seg.get_point(1).unwrap();

        seg.insert(&at, b"X").unwrap();

        assert_eq!(seg.id(), id);
        assert_eq!(seg.to_vec(), b"aXbc");
        assert!(matches!(
            seg.insert(&at, b"Y"),
            Err(crate::errors::DocError::StaleHandle { .. })
        ));
        assert_eq!(seg.to_vec(), b"aXbc");
    }

    #[test]
    fn insert_on_read_only_segment_fails() {
        let mut seg = Segment::from_bytes(b"abc".to_vec()).read_only();

        assert!(matches!(
            seg.insert_at(1, b"X"),
            Err(crate::errors::DocError::NotWritable)
        ));
    }

    #[test]
    fn remove_middle() {
        let mut seg = Segment::from_bytes(b"hello cruel world".to_vec());

        seg.remove_range(5, 11).unwrap();

        assert_eq!(seg.to_vec(), b"hello world");
        assert_eq!(seg.len(), 11);
    }

    #[test]
    fn remove_across_written_pieces() {
        let mut seg = Segment::from_bytes(b"abc".to_vec());

        seg.write(b"def").unwrap();
        seg.write(b"ghi").unwrap();
        seg.remove_range(2, 7).unwrap();

        assert_eq!(seg.to_vec(), b"abhi");
    }

    #[test]
    fn remove_everything() {
        let mut seg = Segment::from_bytes(b"gone".to_vec());

        seg.remove_range(0, 4).unwrap();

        assert!(seg.is_empty());
        assert_eq!(seg.piece_count(), 0);
    }

    #[test]
    fn remove_rejects_inverted_range() {
        let mut seg = Segment::from_bytes(b"abcdef".to_vec());

        assert!(matches!(
            seg.remove_range(4, 2),
            Err(crate::errors::DocError::RangeInverted { begin: 4, end: 2 })
        ));
        assert_eq!(seg.to_vec(), b"abcdef");
    }
}
