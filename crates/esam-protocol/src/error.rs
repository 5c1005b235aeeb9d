//! Error types for frame validation

use thiserror::Error;

use crate::decoder::DecodeOutcome;

/// Reasons a frame is rejected before any field is decoded
///
/// Each variant belongs to exactly one of the three validation stages; see
/// [`FrameError::outcome`] for the mapping onto the caller-facing tag.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Nothing left after whitespace was stripped
    #[error("frame is empty")]
    Empty,

    /// Hex digit count is odd, so the last byte is cut in half
    #[error("frame has an odd number of hex digits: {digits}")]
    OddLength { digits: usize },

    /// A character that is not a hex digit
    #[error("invalid hex character {ch:?} at offset {offset}")]
    InvalidHex { ch: char, offset: usize },

    /// Fewer bytes than the smallest frame of this kind
    #[error("frame too short: {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },

    /// First byte is not the start marker
    #[error("invalid start marker: 0x{0:02X}")]
    StartMarker(u8),

    /// Last byte is not the end marker
    #[error("invalid end marker: 0x{0:02X}")]
    EndMarker(u8),

    /// Length field disagrees with the bytes actually present
    #[error("length field mismatch: declared {declared}, expected {expected}")]
    LengthMismatch { declared: usize, expected: usize },

    /// Main-function byte outside the defined set
    #[error("unknown main function: 0x{0:02X}")]
    UnknownMainFunction(u8),

    /// Command/ack byte whose low 7 bits exceed the defined range
    #[error("invalid command code: 0x{0:02X}")]
    InvalidCommandCode(u8),

    /// Checksum mismatch
    #[error("checksum mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },
}

impl FrameError {
    /// Tag reported to callers for this failure
    pub fn outcome(&self) -> DecodeOutcome {
        match self {
            FrameError::Empty | FrameError::OddLength { .. } => DecodeOutcome::ByteIncomplete,
            FrameError::ChecksumMismatch { .. } => DecodeOutcome::ChecksumFailed,
            FrameError::InvalidHex { .. }
            | FrameError::TooShort { .. }
            | FrameError::StartMarker(_)
            | FrameError::EndMarker(_)
            | FrameError::LengthMismatch { .. }
            | FrameError::UnknownMainFunction(_)
            | FrameError::InvalidCommandCode(_) => DecodeOutcome::FormatIncomplete,
        }
    }
}

impl From<FrameError> for DecodeOutcome {
    fn from(err: FrameError) -> Self {
        err.outcome()
    }
}

/// Reasons a frame cannot be assembled
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Main-function byte outside the defined set
    #[error("unknown main function: 0x{0:02X}")]
    UnknownMainFunction(u8),

    /// Command code above the defined range
    #[error("invalid command code: 0x{0:02X}")]
    InvalidCommandCode(u8),

    /// Header plus data do not fit the 2-byte length field
    #[error("data domain too long: {0} bytes")]
    DataTooLong(usize),

    /// Upgrade-end ack whose first data byte reads as an upgrade command code
    #[error("upgrade-end data may not start with 0x{0:02X}")]
    AmbiguousUpgradeEnd(u8),
}

#[cfg(test)]
mod tests {
    use super::FrameError;
    use crate::DecodeOutcome;

    #[test]
    fn test_outcome_mapping() {
        assert_eq!(FrameError::Empty.outcome(), DecodeOutcome::ByteIncomplete);
        assert_eq!(
            FrameError::OddLength { digits: 3 }.outcome(),
            DecodeOutcome::ByteIncomplete
        );
        assert_eq!(
            FrameError::LengthMismatch {
                declared: 10,
                expected: 5
            }
            .outcome(),
            DecodeOutcome::FormatIncomplete
        );
        assert_eq!(
            FrameError::UnknownMainFunction(0x07).outcome(),
            DecodeOutcome::FormatIncomplete
        );
        assert_eq!(
            FrameError::ChecksumMismatch {
                expected: 0x06,
                actual: 0xFB
            }
            .outcome(),
            DecodeOutcome::ChecksumFailed
        );
    }

    #[test]
    fn test_error_messages() {
        let err = FrameError::ChecksumMismatch {
            expected: 0x06,
            actual: 0xFB,
        };
        assert_eq!(err.to_string(), "checksum mismatch: expected 0x06, got 0xFB");
        assert_eq!(
            FrameError::InvalidHex { ch: 'G', offset: 4 }.to_string(),
            "invalid hex character 'G' at offset 4"
        );
    }
}
