/// # Piece Table Module.
///
/// A segment is an ordered list of pieces over shared buffers, plus a
/// running-length index for offset lookups.
pub mod piece;
pub mod segment;
