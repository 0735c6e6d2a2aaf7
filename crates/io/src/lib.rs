//! File-system primitives for the document store: read-only memory maps,
//! whole-file reads, and atomic replace-on-success writes.

pub mod atomic;
pub mod mmap;
pub mod read;

fn truncated(path: &std::path::Path, expected: u64, got: usize) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        format!(
            "truncated read of {}: expected {expected} bytes, got {got}",
            path.display()
        ),
    )
}
