pub type DocResult<T> = Result<T, DocError>;

/// Every failure the document store reports. None of these are fatal: a
/// failed operation leaves the segment exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// File open, read or write failure. Never retried here.
    #[error("i/o failure: {0}")]
    IoError(#[from] std::io::Error),

    #[error("offset {offset} is past the end of the addressable range (len={len})")]
    OffsetOutOfRange { offset: u64, len: u64 },

    /// The handle was resolved against a different segment.
    #[error("handle belongs to segment #{handle_segment}, not segment #{segment}")]
    InvalidPoint { handle_segment: u64, segment: u64 },

    #[error("range is inverted: begin {begin} is after end {end}")]
    RangeInverted { begin: u64, end: u64 },

    #[error("segment is read-only")]
    NotWritable,

    #[error("buffer is read-only and cannot be appended to")]
    NotAppendable,

    /// The handle's segment was mutated after the handle was taken.
    #[error("stale handle: taken at version {handle_version}, segment is at version {current}")]
    StaleHandle { handle_version: u64, current: u64 },

    #[error("segment has no file path; use save_as")]
    NoPath,

    #[error("arithmetic overflow")]
    Overflow,
}

impl From<std::num::TryFromIntError> for DocError {
    fn from(_: std::num::TryFromIntError) -> Self {
        DocError::Overflow
    }
}

#[cfg(test)]
mod errors_tests {
    #[test]
    fn io_errors_convert() {
        let err: super::DocError = std::io::Error::from(std::io::ErrorKind::NotFound).into();

        assert!(matches!(err, super::DocError::IoError(_)));
    }

    #[test]
    fn messages_carry_context() {
        let err = super::DocError::OffsetOutOfRange { offset: 13, len: 12 };

        assert_eq!(
            err.to_string(),
            "offset 13 is past the end of the addressable range (len=12)"
        );
    }

    #[test]
    fn int_conversion_failure_is_overflow() {
        let err: super::DocError = <u64 as TryInto<u8>>::try_into(300u64).unwrap_err().into();

        assert!(matches!(err, super::DocError::Overflow));
    }
}
