//! Frame checksum

/// Sum the given bytes modulo 256
///
/// `body` is the checksum-covered span of a frame: everything after the
/// sentinel up to, but not including, the checksum field.
pub fn checksum(body: &[u8]) -> u8 {
    body.iter().fold(0u8, |sum, &byte| sum.wrapping_add(byte))
}
