/// A read-only memory map over a file on disk.
///
/// The file handle is kept next to the map so the mapping stays tied to the
/// inode that was opened, even if the path is later replaced by an atomic save.
#[derive(Debug)]
pub struct MmapFile {
    _file: std::fs::File,
    mmap: memmap2::Mmap,
    path: std::path::PathBuf,
}

impl MmapFile {
    /// # Errors
    ///
    /// - `std::io::Error` if the file cannot be opened or mapped, or if the
    ///   mapping came back shorter than the file's reported length.
    pub fn open(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let file = std::fs::File::open(&path_buf)?;
        let expected = file.metadata()?.len();

        // SAFETY: the map is read-only and only ever lent out as `&[u8]`.
        // Saves replace the path with a new inode instead of writing through
        // it, so this mapping's pages are never modified in place.
        let mmap = unsafe { memmap2::Mmap::map(&file)? };

        if <usize as TryInto<u64>>::try_into(mmap.len()).ok() != Some(expected) {
            return Err(crate::truncated(&path_buf, expected, mmap.len()));
        }

        Ok(Self {
            _file: file,
            mmap,
            path: path_buf,
        })
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }

    /// File length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Path the map was opened from.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(test)]
mod mmap_tests {
    use std::io::Write;

    fn fixture(content: &[u8]) -> tempfile::NamedTempFile {
        let mut temp = tempfile::NamedTempFile::new().unwrap();

        temp.write_all(content).unwrap();
        temp.as_file().sync_all().unwrap();

        temp
    }

    #[test]
    fn maps_whole_file() {
        let temp = fixture(b"hello\nworld!");
        let mmap = super::MmapFile::open(temp.path()).unwrap();

        assert_eq!(mmap.len(), 12);
        assert_eq!(mmap.as_slice(), b"hello\nworld!");
        assert_eq!(mmap.path(), temp.path());
    }

    #[test]
    fn empty_file_maps_to_empty_slice() {
        let temp = fixture(b"");
        let mmap = super::MmapFile::open(temp.path()).unwrap();

        assert!(mmap.is_empty());
        assert_eq!(mmap.as_slice(), b"");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = super::MmapFile::open(dir.path().join("nope.txt")).unwrap_err();

        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
