use std::io::Read;

/// Reads a whole file into memory.
///
/// # Errors
///
/// - `std::io::Error` if the file cannot be opened or read.
/// - `std::io::ErrorKind::UnexpectedEof` if fewer bytes arrive than the
///   file's metadata reported when it was opened.
pub fn read_file(path: impl AsRef<std::path::Path>) -> std::io::Result<Vec<u8>> {
    let path = path.as_ref();
    let mut file = std::fs::File::open(path)?;
    let expected = file.metadata()?.len();
    let mut bytes =
        Vec::with_capacity(<u64 as TryInto<usize>>::try_into(expected).unwrap_or_default());

    file.read_to_end(&mut bytes)?;

    if <usize as TryInto<u64>>::try_into(bytes.len()).ok() < Some(expected) {
        return Err(crate::truncated(path, expected, bytes.len()));
    }

    Ok(bytes)
}
