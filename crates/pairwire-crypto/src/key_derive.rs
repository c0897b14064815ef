//! HMAC-SHA256 session key derivation from an ECDH shared secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::trace;

use crate::ecdh::compute_shared_secret;
use crate::padding::pad64;
use crate::{Result, SESSION_KEY_LEN};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 over the 64-byte zero-padded message.
///
/// ```text
/// mac = HMAC-SHA256(key, pad64(message))
/// ```
pub fn hmac(key: &[u8], message: &[u8]) -> [u8; SESSION_KEY_LEN] {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(&pad64(message));
    mac.finalize().into_bytes().into()
}

/// Derive the per-nonce session key shared by both ends of an exchange.
///
/// ```text
/// session_key = HMAC-SHA256(ECDH(private, peer_public), pad64(nonce))
/// ```
///
/// Only the first 16 bytes feed the keystream cipher; the full 32 bytes
/// are returned for wire compatibility.
pub fn derive_session_key(
    private_key: &[u8],
    public_key: &[u8],
    nonce: &[u8],
) -> Result<[u8; SESSION_KEY_LEN]> {
    let shared_secret = compute_shared_secret(private_key, public_key)?;
    trace!(nonce_len = nonce.len(), "deriving session key");
    Ok(hmac(&shared_secret, nonce))
}
