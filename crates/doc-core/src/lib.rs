//! Piece-table backing store for a text editor.
//!
//! - [`storage`] owns the bytes: the read-only original buffer and the
//!   append-only, chunked edit buffer.
//! - [`piece_table`] orders pieces over those buffers into a [`Segment`].
//! - [`point`] resolves offsets into [`Point`]s and cuts zero-copy views
//!   with [`Segment::subseg`].
//! - [`iter`] walks a segment slice by slice; [`edit`] writes, inserts,
//!   removes and concatenates.
//!
//! Everything works on raw bytes; no encoding is assumed.

pub mod edit;
pub mod enums;
pub mod errors;
pub mod iter;
pub mod lines;
pub mod options;
pub mod piece_table;
pub mod point;
pub mod storage;

pub use errors::{DocError, DocResult};
pub use iter::{Cursor, Iter};
pub use lines::Lines;
pub use options::Options;
pub use piece_table::segment::Segment;
pub use point::Point;
