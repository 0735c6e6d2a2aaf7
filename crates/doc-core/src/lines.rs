use std::borrow::Cow;

/// Splits a segment's slices into lines on `\n`.
///
/// Lines come back without their newline. A line that sits inside one
/// slice is borrowed; a line spanning slice boundaries is stitched into an
/// owned buffer. A trailing newline does not produce an extra empty line.
#[derive(Clone, Debug)]
pub struct Lines<'seg> {
    slices: crate::iter::Iter<'seg>,
    current: &'seg [u8],
}

impl<'seg> Lines<'seg> {
    pub fn new(slices: crate::iter::Iter<'seg>) -> Self {
        Self {
            slices,
            current: &[],
        }
    }
}

impl<'seg> Iterator for Lines<'seg> {
    type Item = Cow<'seg, [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut carry: Option<Vec<u8>> = None;

        loop {
            if self.current.is_empty() {
                match self.slices.next() {
                    Some(slice) => self.current = slice,
                    None => return carry.map(Cow::Owned),
                }

                continue;
            }

            if let Some(pos) = memchr::memchr(b'\n', self.current) {
                let line = &self.current[..pos];

                self.current = &self.current[pos + 1..];

                return Some(match carry {
                    Some(mut buf) => {
                        buf.extend_from_slice(line);
                        Cow::Owned(buf)
                    }
                    None => Cow::Borrowed(line),
                });
            }

            let tail = std::mem::take(&mut self.current);

            match self.slices.next() {
                Some(slice) => {
                    carry.get_or_insert_with(Vec::new).extend_from_slice(tail);
                    self.current = slice;
                }
                None => {
                    return Some(match carry {
                        Some(mut buf) => {
                            buf.extend_from_slice(tail);
                            Cow::Owned(buf)
                        }
                        None => Cow::Borrowed(tail),
                    });
                }
            }
        }
    }
}

impl std::iter::FusedIterator for Lines<'_> {}

impl crate::piece_table::segment::Segment {
    #[inline]
    pub fn lines(&self) -> Lines<'_> {
        Lines::new(self.iter())
    }
}

#[cfg(test)]
mod lines_tests {
    use crate::piece_table::segment::Segment;

    fn collect(seg: &Segment) -> Vec<Vec<u8>> {
        seg.lines().map(std::borrow::Cow::into_owned).collect()
    }

    #[test]
    fn splits_single_piece() {
        let seg = Segment::from_bytes(b"one\ntwo\nthree".to_vec());

        assert_eq!(collect(&seg), vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]);
        assert!(seg.lines().all(|line| matches!(line, std::borrow::Cow::Borrowed(_))));
    }

    #[test]
    fn trailing_newline_adds_no_line() {
        let seg = Segment::from_bytes(b"a\nb\n".to_vec());

        assert_eq!(collect(&seg), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn empty_lines_are_kept() {
        let seg = Segment::from_bytes(b"a\n\n\nb".to_vec());

        assert_eq!(
            collect(&seg),
            vec![b"a".to_vec(), Vec::new(), Vec::new(), b"b".to_vec()]
        );
    }

    #[test]
    fn empty_document_has_no_lines() {
        assert_eq!(Segment::from_bytes(Vec::new()).lines().count(), 0);
    }

    #[test]
    fn lines_spanning_pieces_are_stitched() {
        let mut seg = Segment::from_bytes(b"hel".to_vec());

        seg.write(b"lo\nwor").unwrap();
        seg.write(b"ld").unwrap();
        seg.write(b"!\n").unwrap();

        let lines: Vec<_> = seg.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(&*lines[0], b"hello");
        assert!(matches!(lines[0], std::borrow::Cow::Owned(_)));
        assert_eq!(&*lines[1], b"world!");
    }

    #[test]
    fn newline_at_piece_boundary() {
        let mut seg = Segment::from_bytes(b"first\n".to_vec());

        seg.write(b"second").unwrap();

        let lines: Vec<_> = seg.lines().collect();

        assert_eq!(&*lines[0], b"first");
        assert_eq!(&*lines[1], b"second");
        assert!(matches!(lines[1], std::borrow::Cow::Borrowed(_)));
    }
}
