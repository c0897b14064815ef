//! Big-endian integer width helpers shared by the DER codecs.

/// Force a big-endian integer to exactly `width` bytes.
///
/// Longer inputs keep their low `width` bytes, shorter inputs are
/// left-padded with zeros.
pub fn fixed_width(bytes: &[u8], width: usize) -> Vec<u8> {
    if bytes.len() >= width {
        return bytes[bytes.len() - width..].to_vec();
    }
    let mut out = vec![0u8; width];
    out[width - bytes.len()..].copy_from_slice(bytes);
    out
}

/// Drop leading zero bytes, always leaving at least one byte.
pub fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len().saturating_sub(1));
    &bytes[first..]
}

/// Minimal DER INTEGER body for an unsigned big-endian value.
pub fn sign_guard(bytes: &[u8]) -> Vec<u8> {
    let stripped = strip_leading_zeros(bytes);
    match stripped.first() {
        Some(&b) if b & 0x80 != 0 => {
            let mut out = Vec::with_capacity(stripped.len() + 1);
            out.push(0x00);
            out.extend_from_slice(stripped);
            out
        }
        Some(_) => stripped.to_vec(),
        None => vec![0x00],
    }
}
