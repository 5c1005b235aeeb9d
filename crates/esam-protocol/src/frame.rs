//! Frame normalisation, validation and header context
//!
//! # Frame Format
//! ```text
//! Command frame:          E9 LH LL F C    DATA... CS E6
//! Acknowledgement frame:  E9 LH LL F A S  DATA... CS E6
//! Upgrade-end ack (FE03): E9 LH LL F      DATA... CS E6
//! ```
//!
//! - `E9` / `E6`: start and end markers
//! - `LH LL`: length field, `(LH << 8) ^ LL`, counting the bytes from `F`
//!   through the last data byte
//! - `F`: main function, one of `00..=06` or `FE`
//! - `C` / `A`: command code, bit 7 set on acknowledgements, low 7 bits `00..=0E`
//! - `S`: status, acknowledgements only
//! - `CS`: sum of every byte from `E9` through the last data byte, mod 256
//!
//! The upgrade-end acknowledgement carries no command byte at all; it is
//! recognised by `F == FE` followed by a byte that is not one of the upgrade
//! command/ack codes.

use crate::error::FrameError;
use crate::hex;

/// Start marker byte
pub const START_MARKER: u8 = 0xE9;
/// End marker byte
pub const END_MARKER: u8 = 0xE6;
/// Main function used by firmware upgrade frames
pub const UPGRADE_FUNCTION: u8 = 0xFE;
/// Command/ack codes that may follow `F == FE`
pub const UPGRADE_CODES: [u8; 5] = [0x01, 0x02, 0x03, 0x81, 0x82];
/// Command/ack byte implied by the upgrade-end acknowledgement
pub const UPGRADE_END_ACK: u8 = 0x83;
/// Highest command code (low 7 bits of the command/ack byte)
pub const MAX_COMMAND_CODE: u8 = 0x0E;
/// Bit that marks an acknowledgement frame
pub const ACK_FLAG: u8 = 0x80;

/// Start marker, length field, checksum and end marker
const ENVELOPE_BYTES: usize = 5;
const MIN_SPECIAL_BYTES: usize = 6;
const MIN_COMMAND_BYTES: usize = 7;
const MIN_ACK_BYTES: usize = 8;

/// Whether `f` is a defined main-function byte
pub fn is_main_function(f: u8) -> bool {
    f <= 0x06 || f == UPGRADE_FUNCTION
}

/// Strip all whitespace and uppercase the rest
pub fn preprocess(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Running-sum checksum, mod 256
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// A frame that passed all three validation stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFrame {
    hex: String,
    bytes: Vec<u8>,
    is_fe03_special: bool,
}

impl ValidatedFrame {
    /// Normalised hex text of the whole frame
    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Raw frame bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether this is the upgrade-end acknowledgement without a command byte
    pub fn is_fe03_special(&self) -> bool {
        self.is_fe03_special
    }
}

/// Stage 1: every byte must be exactly two hex digits
pub fn check_bytes(frame: &str) -> Result<(), FrameError> {
    if frame.is_empty() {
        return Err(FrameError::Empty);
    }
    let digits = frame.chars().count();
    if digits % 2 != 0 {
        return Err(FrameError::OddLength { digits });
    }
    Ok(())
}

/// Stage 2: character set, size, markers, length field, header code ranges
///
/// Returns the decoded bytes and whether the frame is the FE03 special variant.
pub fn check_format(frame: &str) -> Result<(Vec<u8>, bool), FrameError> {
    if let Some((offset, ch)) = frame.chars().enumerate().find(|(_, c)| !c.is_ascii_hexdigit()) {
        return Err(FrameError::InvalidHex { ch, offset });
    }
    let bytes = hex::decode_bytes(frame).ok_or(FrameError::InvalidHex { ch: '?', offset: 0 })?;
    let len = bytes.len();

    if len < MIN_SPECIAL_BYTES {
        return Err(FrameError::TooShort {
            len,
            min: MIN_SPECIAL_BYTES,
        });
    }
    let is_fe03_special = bytes[3] == UPGRADE_FUNCTION && !UPGRADE_CODES.contains(&bytes[4]);
    if !is_fe03_special {
        let min = if bytes[4] & ACK_FLAG != 0 {
            MIN_ACK_BYTES
        } else {
            MIN_COMMAND_BYTES
        };
        if len < min {
            return Err(FrameError::TooShort { len, min });
        }
    }

    if bytes[0] != START_MARKER {
        return Err(FrameError::StartMarker(bytes[0]));
    }
    if bytes[len - 1] != END_MARKER {
        return Err(FrameError::EndMarker(bytes[len - 1]));
    }

    let declared = declared_length(&bytes);
    let expected = len - ENVELOPE_BYTES;
    if declared != expected {
        return Err(FrameError::LengthMismatch { declared, expected });
    }

    if !is_main_function(bytes[3]) {
        return Err(FrameError::UnknownMainFunction(bytes[3]));
    }
    if !is_fe03_special && bytes[4] & !ACK_FLAG > MAX_COMMAND_CODE {
        return Err(FrameError::InvalidCommandCode(bytes[4]));
    }

    Ok((bytes, is_fe03_special))
}

/// Stage 3: trailing checksum must match the running sum
pub fn check_checksum(bytes: &[u8]) -> Result<(), FrameError> {
    let cs_index = bytes.len().saturating_sub(2);
    let expected = bytes.get(cs_index).copied().unwrap_or(0);
    let actual = checksum(&bytes[..cs_index]);
    if expected != actual {
        return Err(FrameError::ChecksumMismatch { expected, actual });
    }
    Ok(())
}

/// Run the three stages in order on a normalised frame
pub fn validate(frame: &str) -> Result<ValidatedFrame, FrameError> {
    check_bytes(frame)?;
    let (bytes, is_fe03_special) = check_format(frame)?;
    check_checksum(&bytes)?;
    Ok(ValidatedFrame {
        hex: frame.to_string(),
        bytes,
        is_fe03_special,
    })
}

/// Length field as the wire combines it: `(LH << 8) ^ LL`
fn declared_length(bytes: &[u8]) -> usize {
    (usize::from(bytes[1]) << 8) ^ usize::from(bytes[2])
}

/// Header values of one validated frame, plus data-domain bounds
///
/// Built once per decode call and handed by reference to the field layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    /// Trailing checksum byte
    pub checksum: u8,
    /// Value of the length field
    pub frame_byte_length: usize,
    /// Number of bytes actually in the frame
    pub byte_count: usize,
    /// Main-function byte
    pub main_function: u8,
    /// Command/ack byte (`0x83` for the FE03 special variant)
    pub command_or_ack: u8,
    /// Bit 7 of the command/ack byte
    pub is_ack: bool,
    /// Status byte, present on acknowledgement frames that carry one
    pub status: Option<u8>,
    /// Upgrade-end acknowledgement without a command byte
    pub is_fe03_special: bool,
    /// Bytes in the data domain
    pub data_domain_byte_length: usize,
    /// Hex-char offset where the data domain starts
    pub data_domain_char_start: usize,
    /// Hex-char offset one past the data domain
    pub data_domain_char_end: usize,
}

impl FrameContext {
    /// Extract the header of a validated frame
    pub fn from_frame(frame: &ValidatedFrame) -> Self {
        let bytes = frame.bytes();
        let byte_count = bytes.len();
        let frame_byte_length = declared_length(bytes);
        let main_function = bytes[3];
        let checksum = bytes[byte_count - 2];

        // (command/ack, status, bytes between the length field and the data domain)
        let (command_or_ack, status, header_after_length) = if frame.is_fe03_special() {
            (UPGRADE_END_ACK, None, 1)
        } else if bytes[4] & ACK_FLAG != 0 {
            (bytes[4], Some(bytes[5]), 3)
        } else {
            (bytes[4], None, 2)
        };

        let data_domain_byte_length = frame_byte_length.saturating_sub(header_after_length);
        let data_domain_char_start = (3 + header_after_length) * 2;

        Self {
            checksum,
            frame_byte_length,
            byte_count,
            main_function,
            command_or_ack,
            is_ack: command_or_ack & ACK_FLAG != 0,
            status,
            is_fe03_special: frame.is_fe03_special(),
            data_domain_byte_length,
            data_domain_char_start,
            data_domain_char_end: data_domain_char_start + data_domain_byte_length * 2,
        }
    }

    /// Registry key: `(main_function << 8) | command_or_ack`
    pub fn dispatch_key(&self) -> u16 {
        (u16::from(self.main_function) << 8) | u16::from(self.command_or_ack)
    }

    /// Slice the data domain out of the frame hex
    pub fn data_domain<'a>(&self, frame_hex: &'a str) -> &'a str {
        frame_hex
            .get(self.data_domain_char_start..self.data_domain_char_end)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a frame from header/data bytes, filling in length and checksum
    fn frame(body: &[u8]) -> String {
        let len = body.len() as u16;
        let mut bytes = vec![START_MARKER, (len >> 8) as u8, len as u8];
        bytes.extend_from_slice(body);
        bytes.push(checksum(&bytes));
        bytes.push(END_MARKER);
        hex::encode_bytes(&bytes)
    }

    #[test]
    fn test_preprocess() {
        assert_eq!(preprocess(" e9 00\n0a\r\n\tff "), "E9000AFF");
        assert_eq!(preprocess(""), "");
    }

    #[test]
    fn test_checksum_wraps() {
        assert_eq!(checksum(&[0xE9, 0x00, 0x05, 0x00, 0x01, 0x03, 0x04, 0x05]), 0xFB);
        assert_eq!(checksum(&[0xFF, 0x02]), 0x01);
        assert_eq!(checksum(&[]), 0x00);
    }

    #[test]
    fn test_byte_check() {
        assert_eq!(check_bytes(""), Err(FrameError::Empty));
        assert_eq!(check_bytes("E90"), Err(FrameError::OddLength { digits: 3 }));
        assert_eq!(check_bytes("E900"), Ok(()));
    }

    #[test]
    fn test_format_rejects_non_hex() {
        assert_eq!(
            check_format("E9000G"),
            Err(FrameError::InvalidHex { ch: 'G', offset: 5 })
        );
    }

    #[test]
    fn test_format_minimum_lengths() {
        // Command frame needs 7 bytes
        assert!(matches!(
            check_format("E9000100E6"),
            Err(FrameError::TooShort { min: 6, .. })
        ));
        assert!(matches!(
            check_format("E900020001E6"),
            Err(FrameError::TooShort { min: 7, .. })
        ));
        // Ack frame needs 8 bytes
        assert!(matches!(
            check_format("E900020081ECE6"),
            Err(FrameError::TooShort { min: 8, .. })
        ));
    }

    #[test]
    fn test_format_markers() {
        let good = frame(&[0x00, 0x01]);
        let bad_start = format!("E8{}", &good[2..]);
        assert_eq!(check_format(&bad_start), Err(FrameError::StartMarker(0xE8)));
        let bad_end = format!("{}E7", &good[..good.len() - 2]);
        assert_eq!(check_format(&bad_end), Err(FrameError::EndMarker(0xE7)));
    }

    #[test]
    fn test_format_length_field() {
        // Declared 10 for a 10-byte frame: length counts F..DATA, so 5 expected
        assert_eq!(
            check_format("E9000A000103040506E6"),
            Err(FrameError::LengthMismatch {
                declared: 10,
                expected: 5
            })
        );
        assert!(check_format("E90005000103040506E6").is_ok());
    }

    #[test]
    fn test_length_field_uses_xor() {
        let mut bytes = vec![0u8; 0x0105 + 5];
        bytes[1] = 0x01;
        bytes[2] = 0x05;
        assert_eq!(declared_length(&bytes), 0x0105);
        bytes[1] = 0x00;
        bytes[2] = 0x0A;
        assert_eq!(declared_length(&bytes), 0x0A);
    }

    #[test]
    fn test_format_main_function() {
        let f07 = frame(&[0x07, 0x01]);
        assert_eq!(check_format(&f07), Err(FrameError::UnknownMainFunction(0x07)));
        for f in [0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06] {
            assert!(check_format(&frame(&[f, 0x01])).is_ok());
        }
    }

    #[test]
    fn test_format_command_code_range() {
        assert!(check_format(&frame(&[0x01, 0x0E])).is_ok());
        assert_eq!(
            check_format(&frame(&[0x01, 0x0F])),
            Err(FrameError::InvalidCommandCode(0x0F))
        );
        assert_eq!(
            check_format(&frame(&[0x01, 0x8F, 0x00])),
            Err(FrameError::InvalidCommandCode(0x8F))
        );
    }

    #[test]
    fn test_format_fe03_special() {
        // Six bytes, F = FE, byte 4 is the checksum: special
        let six = frame(&[0xFE]);
        let (bytes, special) = check_format(&six).unwrap();
        assert_eq!(bytes.len(), 6);
        assert!(special);

        // Byte 4 would be an out-of-range code but is data in the special variant
        let (_, special) = check_format(&frame(&[0xFE, 0x7F, 0x10])).unwrap();
        assert!(special);

        // Upgrade command codes are never special
        let (_, special) = check_format(&frame(&[0xFE, 0x03, 0x12])).unwrap();
        assert!(!special);
    }

    #[test]
    fn test_checksum_stage() {
        assert_eq!(
            check_checksum(&[0xE9, 0x00, 0x05, 0x00, 0x01, 0x03, 0x04, 0x05, 0x06, 0xE6]),
            Err(FrameError::ChecksumMismatch {
                expected: 0x06,
                actual: 0xFB
            })
        );
        assert_eq!(
            check_checksum(&[0xE9, 0x00, 0x05, 0x00, 0x01, 0x03, 0x04, 0x05, 0xFB, 0xE6]),
            Ok(())
        );
    }

    #[test]
    fn test_validate_short_circuits_on_bytes() {
        // Odd length and a bad checksum: byte integrity wins
        assert_eq!(
            validate("E9000500010304050"),
            Err(FrameError::OddLength { digits: 17 })
        );
    }

    #[test]
    fn test_context_command_frame() {
        let hex = frame(&[0x00, 0x02, 0x12, 0x34, 0x56]);
        let validated = validate(&hex).unwrap();
        let ctx = FrameContext::from_frame(&validated);
        assert_eq!(ctx.frame_byte_length, 5);
        assert_eq!(ctx.byte_count, 10);
        assert_eq!(ctx.main_function, 0x00);
        assert_eq!(ctx.command_or_ack, 0x02);
        assert!(!ctx.is_ack);
        assert_eq!(ctx.status, None);
        assert_eq!(ctx.data_domain_byte_length, 3);
        assert_eq!(ctx.data_domain_char_start, 10);
        assert_eq!(ctx.data_domain_char_end, 16);
        assert_eq!(ctx.data_domain(&hex), "123456");
        assert_eq!(ctx.dispatch_key(), 0x0002);
    }

    #[test]
    fn test_context_ack_frame() {
        let hex = frame(&[0x01, 0x81, 0x00, 0xAA, 0xBB]);
        let ctx = FrameContext::from_frame(&validate(&hex).unwrap());
        assert!(ctx.is_ack);
        assert_eq!(ctx.status, Some(0x00));
        assert_eq!(ctx.data_domain_byte_length, 2);
        assert_eq!(ctx.data_domain_char_start, 12);
        assert_eq!(ctx.data_domain(&hex), "AABB");
        assert_eq!(ctx.dispatch_key(), 0x0181);
    }

    #[test]
    fn test_context_special_frame() {
        let hex = frame(&[0xFE, 0x55, 0x66]);
        let ctx = FrameContext::from_frame(&validate(&hex).unwrap());
        assert!(ctx.is_fe03_special);
        assert!(ctx.is_ack);
        assert_eq!(ctx.command_or_ack, UPGRADE_END_ACK);
        assert_eq!(ctx.status, None);
        assert_eq!(ctx.data_domain_byte_length, 2);
        assert_eq!(ctx.data_domain_char_start, 8);
        assert_eq!(ctx.data_domain(&hex), "5566");
    }

    #[test]
    fn test_context_empty_data_domain() {
        let hex = frame(&[0x00, 0x01]);
        let ctx = FrameContext::from_frame(&validate(&hex).unwrap());
        assert_eq!(ctx.data_domain_byte_length, 0);
        assert_eq!(ctx.data_domain(&hex), "");
    }
}
