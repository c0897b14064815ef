//! Zero padding to the 64-byte boundary applied before MACing and signing.

use crate::PAD_BLOCK;

/// Append zero bytes until the length is a multiple of 64.
///
/// Inputs already on a boundary, including the empty input, are returned
/// unchanged.
pub fn pad64(message: &[u8]) -> Vec<u8> {
    let padded_len = message.len().next_multiple_of(PAD_BLOCK);
    let mut out = Vec::with_capacity(padded_len);
    out.extend_from_slice(message);
    out.resize(padded_len, 0);
    out
}
