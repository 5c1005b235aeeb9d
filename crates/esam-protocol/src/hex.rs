//! Hex string helpers shared by the validator and the field layouts
//!
//! Frames travel through the decoder as normalised uppercase hex text, so most
//! helpers here take and return `&str`/`String` rather than byte slices.

/// Left-pad `hex` with zero bytes until it spans `byte_width` bytes
///
/// An odd digit count is first completed with a single `0` nibble. Input that
/// already spans `byte_width` bytes or more is returned unchanged.
pub fn to_zero_prefix_hex_string(hex: &str, byte_width: usize) -> String {
    let target = byte_width * 2;
    if hex.len() >= target {
        return hex.to_string();
    }

    let mut out = String::with_capacity(target);
    let mut digits = hex.len();
    if digits % 2 == 1 {
        out.push('0');
        digits += 1;
    }
    while digits < target {
        out.push_str("00");
        digits += 2;
    }
    out.push_str(hex);
    out
}

/// Render hex digits as an unsigned decimal string
///
/// Text that does not parse as hex (including the empty string) is returned
/// unchanged.
pub fn parse_hex_as_decimal(hex: &str) -> String {
    u128::from_str_radix(hex, 16)
        .map(|v| v.to_string())
        .unwrap_or_else(|_| hex.to_string())
}

/// Render a BCD date as `YYYY-MM-DD HH:MM:SS`
///
/// 14 digits carry a four-digit year (`yyyyMMddHHmmss`), 12 digits a two-digit
/// year (`yyMMddHHmmss`) which is placed in the 2000s. Any other length is
/// returned unchanged.
pub fn parse_hex_as_date(hex: &str) -> String {
    if !hex.is_ascii() {
        return hex.to_string();
    }
    let (year, rest) = match hex.len() {
        14 => (hex[0..4].to_string(), &hex[4..]),
        12 => (format!("20{}", &hex[0..2]), &hex[2..]),
        _ => return hex.to_string(),
    };

    format!(
        "{}-{}-{} {}:{}:{}",
        year,
        &rest[0..2],
        &rest[2..4],
        &rest[4..6],
        &rest[6..8],
        &rest[8..10]
    )
}

/// A "2+N" sub-field split into its length prefix and payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthPrefixed<'a> {
    /// Hex digits of the 2-byte length prefix (may be short if the input is)
    pub length_hex: &'a str,
    /// Byte count declared by the prefix
    pub declared: usize,
    /// Payload hex digits, `min(declared, available)` bytes long
    pub payload: &'a str,
}

impl LengthPrefixed<'_> {
    /// Number of payload bytes actually present
    pub fn payload_len(&self) -> usize {
        self.payload.len() / 2
    }

    /// Total hex digits consumed (prefix plus payload)
    pub fn consumed(&self) -> usize {
        self.length_hex.len() + self.payload.len()
    }

    /// Whether the declared length ran past the available data
    pub fn is_truncated(&self) -> bool {
        self.payload_len() < self.declared
    }
}

/// Split `hex` into a big-endian 2-byte length and the payload it announces
///
/// When the declared length exceeds what is available the payload is the
/// remaining bytes only.
pub fn split_length_prefixed(hex: &str) -> LengthPrefixed<'_> {
    let prefix_end = hex.len().min(4);
    let length_hex = &hex[..prefix_end];
    let declared = usize::from_str_radix(length_hex, 16).unwrap_or(0);

    let rest = &hex[prefix_end..];
    let available = rest.len() / 2;
    let take = declared.min(available);

    LengthPrefixed {
        length_hex,
        declared,
        payload: &rest[..take * 2],
    }
}

/// Encode bytes as uppercase hex without separators
pub fn encode_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Decode hex text into bytes
///
/// Returns `None` for odd-length text or non-hex characters.
pub fn decode_bytes(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

/// Parse one byte from exactly two hex digits
pub fn byte_at(hex: &str, byte_index: usize) -> Option<u8> {
    let start = byte_index * 2;
    hex.get(start..start + 2)
        .and_then(|s| u8::from_str_radix(s, 16).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_prefix_pads_whole_bytes() {
        assert_eq!(to_zero_prefix_hex_string("0A", 2), "000A");
        assert_eq!(to_zero_prefix_hex_string("1234", 4), "00001234");
        assert_eq!(to_zero_prefix_hex_string("", 1), "00");
    }

    #[test]
    fn test_zero_prefix_completes_odd_nibble() {
        assert_eq!(to_zero_prefix_hex_string("ABC", 2), "0ABC");
        assert_eq!(to_zero_prefix_hex_string("A", 3), "00000A");
    }

    #[test]
    fn test_zero_prefix_never_truncates() {
        assert_eq!(to_zero_prefix_hex_string("123456", 2), "123456");
        assert_eq!(to_zero_prefix_hex_string("1234", 2), "1234");
    }

    #[test]
    fn test_zero_prefix_idempotent() {
        for (hex, width) in [("A", 3), ("ABC", 2), ("", 4), ("1234", 1)] {
            let once = to_zero_prefix_hex_string(hex, width);
            assert_eq!(to_zero_prefix_hex_string(&once, width), once);
        }
    }

    #[test]
    fn test_parse_hex_as_decimal() {
        assert_eq!(parse_hex_as_decimal("000A"), "10");
        assert_eq!(parse_hex_as_decimal("FF"), "255");
        assert_eq!(parse_hex_as_decimal("00002710"), "10000");
        assert_eq!(parse_hex_as_decimal(""), "");
        assert_eq!(parse_hex_as_decimal("XY"), "XY");
    }

    #[test]
    fn test_parse_hex_as_date_four_digit_year() {
        assert_eq!(parse_hex_as_date("20240131235958"), "2024-01-31 23:59:58");
    }

    #[test]
    fn test_parse_hex_as_date_two_digit_year() {
        assert_eq!(parse_hex_as_date("240131235958"), "2024-01-31 23:59:58");
    }

    #[test]
    fn test_parse_hex_as_date_other_lengths_pass_through() {
        assert_eq!(parse_hex_as_date("2401"), "2401");
        assert_eq!(parse_hex_as_date(""), "");
    }

    #[test]
    fn test_split_length_prefixed_exact() {
        let split = split_length_prefixed("0003AABBCC");
        assert_eq!(split.length_hex, "0003");
        assert_eq!(split.declared, 3);
        assert_eq!(split.payload, "AABBCC");
        assert!(!split.is_truncated());
        assert_eq!(split.consumed(), 10);
    }

    #[test]
    fn test_split_length_prefixed_leaves_trailing_bytes() {
        let split = split_length_prefixed("0001AABBCC");
        assert_eq!(split.payload, "AA");
        assert_eq!(split.consumed(), 6);
    }

    #[test]
    fn test_split_length_prefixed_declared_too_long() {
        let split = split_length_prefixed("0010AABB");
        assert_eq!(split.declared, 16);
        assert_eq!(split.payload, "AABB");
        assert_eq!(split.payload_len(), 2);
        assert!(split.is_truncated());
    }

    #[test]
    fn test_split_length_prefixed_short_prefix() {
        let split = split_length_prefixed("00");
        assert_eq!(split.length_hex, "00");
        assert_eq!(split.declared, 0);
        assert_eq!(split.payload, "");
    }

    #[test]
    fn test_encode_decode_bytes() {
        assert_eq!(encode_bytes(&[0xE9, 0x00, 0x0A]), "E9000A");
        assert_eq!(decode_bytes("E9000A"), Some(vec![0xE9, 0x00, 0x0A]));
        assert_eq!(decode_bytes("E90"), None);
        assert_eq!(decode_bytes("ZZ"), None);
    }

    #[test]
    fn test_byte_at() {
        assert_eq!(byte_at("E9000A", 2), Some(0x0A));
        assert_eq!(byte_at("E9000A", 3), None);
    }
}
