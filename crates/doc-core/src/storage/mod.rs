/// # Storage Pool.
///
/// Owns the bytes pieces point into: the read-only original buffer and the
/// append-only, chunked edit buffer. Knows nothing about pieces' order or
/// documents.
pub mod buffer;
