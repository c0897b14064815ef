//! ECDSA-SHA256 signing and verification on P-256.
//!
//! - Sign: pad64(message) -> PKCS#8 PEM key -> DER signature -> raw r||s
//! - Verify: raw r||s -> DER signature, pad64(message) -> SPKI PEM key
//!
//! Signatures on the wire are the raw 64-byte r||s form, each half 32 bytes,
//! big-endian, zero-padded.

use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePrivateKey, DecodePublicKey};
use tracing::debug;

use crate::der::{decode_signature, encode_signature};
use crate::padding::pad64;
use crate::pem::{private_key_pem, public_key_pem};
use crate::{CryptoError, Result, SIGNATURE_LEN};

/// Sign `message` with a raw key pair, returning the 64-byte `r‖s` form.
pub fn sign(
    message: &[u8],
    private_key: &[u8],
    public_key: &[u8],
) -> Result<[u8; SIGNATURE_LEN]> {
    let pem = private_key_pem(private_key, public_key)?;
    let signing_key = SigningKey::from_pkcs8_pem(&pem)
        .map_err(|e| CryptoError::Primitive(format!("loading private key: {e}")))?;

    let signature: Signature = signing_key
        .try_sign(&pad64(message))
        .map_err(|e| CryptoError::Primitive(format!("signing: {e}")))?;

    debug!(len = message.len(), "signed message");
    decode_signature(signature.to_der().as_bytes())
}

/// Verify a 64-byte `r‖s` signature over `message`.
///
/// A mismatching signature is `Ok(false)`. So is an `r` or `s` that is zero
/// or not below the group order, since no valid signature has that shape.
pub fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool> {
    let der = encode_signature(signature)?;
    let pem = public_key_pem(public_key)?;
    let verifying_key = VerifyingKey::from_public_key_pem(&pem)
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

    let Ok(signature) = Signature::from_der(&der) else {
        debug!("signature scalars out of range");
        return Ok(false);
    };

    let valid = verifying_key.verify(&pad64(message), &signature).is_ok();
    debug!(valid, "verified signature");
    Ok(valid)
}
