//! Conversion between the 64-byte `r‖s` wire signature and ASN.1 DER.
//!
//! ```text
//! 30 len 02 len(r) r 02 len(s) s      len = 4 + len(r) + len(s)
//! ```
//!
//! Only this one shape is produced or accepted. Lengths are short-form: a
//! P-256 signature never exceeds 72 bytes.

use bytes::{BufMut, BytesMut};

use crate::normalize::{fixed_width, sign_guard};
use crate::{CryptoError, Result, SIGNATURE_LEN};

const TAG_SEQUENCE: u8 = 0x30;
const TAG_INTEGER: u8 = 0x02;
const SCALAR_LEN: usize = SIGNATURE_LEN / 2;

/// Encode a fixed-width signature as a minimal DER `SEQUENCE { r, s }`.
pub fn encode_signature(signature: &[u8]) -> Result<Vec<u8>> {
    if signature.len() != SIGNATURE_LEN {
        return Err(CryptoError::InvalidSignatureEncoding(format!(
            "fixed-width signature must be {SIGNATURE_LEN} bytes, got {}",
            signature.len()
        )));
    }

    let r = sign_guard(&signature[..SCALAR_LEN]);
    let s = sign_guard(&signature[SCALAR_LEN..]);
    let body_len = 4 + r.len() + s.len();

    let mut out = BytesMut::with_capacity(2 + body_len);
    out.put_u8(TAG_SEQUENCE);
    out.put_u8(body_len as u8);
    out.put_u8(TAG_INTEGER);
    out.put_u8(r.len() as u8);
    out.put_slice(&r);
    out.put_u8(TAG_INTEGER);
    out.put_u8(s.len() as u8);
    out.put_slice(&s);
    Ok(out.to_vec())
}

/// Decode a DER `SEQUENCE { r, s }` into the 64-byte `r‖s` form.
pub fn decode_signature(der: &[u8]) -> Result<[u8; SIGNATURE_LEN]> {
    let mut reader = DerReader::new(der);

    reader.expect_tag(TAG_SEQUENCE)?;
    let seq_len = reader.length()?;
    if seq_len != reader.remaining() {
        return Err(malformed(format!(
            "sequence length {seq_len} does not match {} remaining bytes",
            reader.remaining()
        )));
    }

    let r = reader.integer()?;
    let s = reader.integer()?;
    if reader.remaining() != 0 {
        return Err(malformed(format!(
            "{} trailing bytes after s",
            reader.remaining()
        )));
    }

    let mut out = [0u8; SIGNATURE_LEN];
    out[..SCALAR_LEN].copy_from_slice(&fixed_width(r, SCALAR_LEN));
    out[SCALAR_LEN..].copy_from_slice(&fixed_width(s, SCALAR_LEN));
    Ok(out)
}

fn malformed(msg: String) -> CryptoError {
    CryptoError::InvalidSignatureEncoding(msg)
}

/// Bounds-checked cursor over a DER buffer.
struct DerReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> DerReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn byte(&mut self) -> Result<u8> {
        let b = *self
            .buf
            .get(self.pos)
            .ok_or_else(|| malformed(format!("truncated at offset {}", self.pos)))?;
        self.pos += 1;
        Ok(b)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(malformed(format!(
                "field of {n} bytes overruns buffer at offset {}",
                self.pos
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn expect_tag(&mut self, tag: u8) -> Result<()> {
        let got = self.byte()?;
        if got != tag {
            return Err(malformed(format!(
                "expected tag 0x{tag:02x}, got 0x{got:02x}"
            )));
        }
        Ok(())
    }

    fn length(&mut self) -> Result<usize> {
        let len = self.byte()?;
        if len & 0x80 != 0 {
            return Err(malformed(format!("long-form length 0x{len:02x}")));
        }
        Ok(len as usize)
    }

    /// INTEGER body of at most 32 bytes, or 33 with a zero sign guard.
    fn integer(&mut self) -> Result<&'a [u8]> {
        self.expect_tag(TAG_INTEGER)?;
        let len = self.length()?;
        let body = self.take(len)?;
        match body {
            [] => Err(malformed("empty integer".into())),
            b if b.len() <= SCALAR_LEN => Ok(b),
            [0x00, ..] if body.len() == SCALAR_LEN + 1 => Ok(body),
            _ => Err(malformed(format!("integer of {len} bytes exceeds 256 bits"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    fn r_with_guard() -> [u8; 64] {
        let mut sig = [0u8; 64];
        sig[1] = 0x89;
        sig[2] = 0xAB;
        for (i, b) in sig[3..32].iter_mut().enumerate() {
            *b = i as u8 + 1;
        }
        sig[32..].fill(0x11);
        sig
    }

    #[test]
    fn leading_zero_high_bit_r() {
        let sig = r_with_guard();
        let der = encode_signature(&sig).unwrap();

        assert_eq!(der[0], 0x30);
        assert_eq!(der[2], 0x02);
        // 31 significant bytes with the high bit set need a guard byte.
        assert_eq!(der[3], 32);
        assert_eq!(der[4], 0x00);
        assert_eq!(der[5], 0x89);
        assert_eq!(der[1] as usize, der.len() - 2);

        assert_eq!(decode_signature(&der).unwrap(), sig);
    }

    #[test]
    fn full_width_high_bit_r() {
        let mut sig = [0x22u8; 64];
        sig[0] = 0x89;
        let der = encode_signature(&sig).unwrap();
        assert_eq!(der[3], 33);
        assert_eq!(der[4], 0x00);
        assert_eq!(der.len(), 2 + 2 + 33 + 2 + 32);
        assert_eq!(decode_signature(&der).unwrap(), sig);
    }

    #[test]
    fn small_values_roundtrip() {
        let mut sig = [0u8; 64];
        sig[31] = 0x01;
        sig[63] = 0x7F;
        let der = encode_signature(&sig).unwrap();
        assert_eq!(der, vec![0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x7F]);
        assert_eq!(decode_signature(&der).unwrap(), sig);
    }

    #[test]
    fn random_roundtrip() {
        let mut rng = rand::thread_rng();
        for i in 0..256 {
            let mut sig = [0u8; 64];
            rng.fill_bytes(&mut sig);
            // Exercise leading zeros and high bits on both halves.
            match i % 4 {
                0 => sig[0] = 0,
                1 => sig[32] |= 0x80,
                2 => {
                    sig[0] = 0;
                    sig[1] |= 0x80;
                }
                _ => sig[32..35].fill(0),
            }
            let der = encode_signature(&sig).unwrap();
            assert_eq!(decode_signature(&der).unwrap(), sig);
        }
    }

    #[test]
    fn decodes_p256_der() {
        use p256::ecdsa::{signature::Signer, Signature, SigningKey};

        let key = SigningKey::random(&mut rand::rngs::OsRng);
        let sig: Signature = key.sign(b"interop");
        let fixed = decode_signature(sig.to_der().as_bytes()).unwrap();
        assert_eq!(&fixed[..], sig.to_bytes().as_slice());

        let der = encode_signature(&fixed).unwrap();
        assert_eq!(Signature::from_der(&der).unwrap(), sig);
    }

    #[test]
    fn encode_rejects_wrong_length() {
        assert!(matches!(
            encode_signature(&[0u8; 63]),
            Err(CryptoError::InvalidSignatureEncoding(_))
        ));
    }

    #[test]
    fn decode_rejects_inconsistent_length() {
        let mut der = encode_signature(&r_with_guard()).unwrap();
        der[1] += 5;
        assert!(matches!(
            decode_signature(&der),
            Err(CryptoError::InvalidSignatureEncoding(_))
        ));
    }

    #[test]
    fn decode_rejects_overrunning_integer() {
        // Sequence length agrees with the buffer but r claims 0x40 bytes.
        let der = [0x30, 0x06, 0x02, 0x40, 0x01, 0x02, 0x01, 0x01];
        assert!(decode_signature(&der).is_err());
    }

    #[test]
    fn decode_rejects_truncated() {
        assert!(decode_signature(&[]).is_err());
        assert!(decode_signature(&[0x30]).is_err());
        assert!(decode_signature(&[0x30, 0x03, 0x02, 0x01, 0x01]).is_err());
    }

    #[test]
    fn decode_rejects_wrong_tags() {
        assert!(decode_signature(&[0x31, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01]).is_err());
        assert!(decode_signature(&[0x30, 0x06, 0x04, 0x01, 0x01, 0x02, 0x01, 0x01]).is_err());
    }

    #[test]
    fn decode_rejects_oversized_integer() {
        let mut der = vec![0x30, 0x27, 0x02, 0x22];
        der.extend_from_slice(&[0x01; 34]);
        der.extend_from_slice(&[0x02, 0x01, 0x01]);
        assert!(decode_signature(&der).is_err());

        let mut der = vec![0x30, 0x26, 0x02, 0x21];
        der.extend_from_slice(&[0x01; 33]);
        der.extend_from_slice(&[0x02, 0x01, 0x01]);
        assert!(decode_signature(&der).is_err());
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let der = [0x30, 0x07, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01, 0x00];
        assert!(decode_signature(&der).is_err());
    }
}
