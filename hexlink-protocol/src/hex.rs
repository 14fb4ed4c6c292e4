//! Uppercase ASCII hex encoding of single bytes
//!
//! Only `0-9` and `A-F` are accepted on decode. Lowercase digits are
//! rejected outright rather than folded, so a frame has exactly one valid
//! spelling.

/// Hex alphabet used on the wire
pub const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Encode a byte as two hex digits, high nibble first
pub fn encode_byte(value: u8) -> [u8; 2] {
    [
        HEX_DIGITS[(value >> 4) as usize],
        HEX_DIGITS[(value & 0x0F) as usize],
    ]
}

/// Decode a single uppercase hex digit into its nibble value
pub fn decode_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Check whether a character is a legal wire hex digit
pub fn is_hex_digit(c: u8) -> bool {
    decode_digit(c).is_some()
}

/// Decode two hex digits into a byte
///
/// Fails if either digit is invalid; no partial value is ever produced.
pub fn decode_byte(hi: u8, lo: u8) -> Option<u8> {
    let hi = decode_digit(hi)?;
    let lo = decode_digit(lo)?;
    Some((hi << 4) | lo)
}
