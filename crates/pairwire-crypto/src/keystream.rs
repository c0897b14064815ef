//! Repeating-block AES-128 keystream cipher.
//!
//! ```text
//! key   = session_key[0..16]
//! iv    = nonce[0..7] || nonce[0..9]
//! block = AES-128-ECB(key, iv)
//! out   = message XOR (block || block || ...)[0..len]
//! ```
//!
//! The same block is repeated rather than advanced per 16 bytes, so the
//! keystream is a function of (session key, nonce) alone. Encrypting two
//! messages under the same nonce and key pair leaks their XOR. This layout is
//! the wire format and must not change.
//!
//! Applying the cipher twice with the same inputs returns the original
//! message, so one function serves both directions.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes128;
use tracing::debug;

use crate::key_derive::derive_session_key;
use crate::{CryptoError, Result, MIN_NONCE_LEN, SESSION_KEY_LEN};

const BLOCK_LEN: usize = 16;
const IV_PREFIX_LEN: usize = 7;

/// Build the 16-byte IV from a nonce of at least 9 bytes.
pub fn build_iv(nonce: &[u8]) -> Result<[u8; BLOCK_LEN]> {
    if nonce.len() < MIN_NONCE_LEN {
        return Err(CryptoError::InvalidNonceLength {
            min: MIN_NONCE_LEN,
            got: nonce.len(),
        });
    }
    let mut iv = [0u8; BLOCK_LEN];
    iv[..IV_PREFIX_LEN].copy_from_slice(&nonce[..IV_PREFIX_LEN]);
    iv[IV_PREFIX_LEN..].copy_from_slice(&nonce[..MIN_NONCE_LEN]);
    Ok(iv)
}

/// XOR `message` with the keystream for an already derived session key.
pub fn apply_keystream(
    session_key: &[u8; SESSION_KEY_LEN],
    nonce: &[u8],
    message: &[u8],
) -> Result<Vec<u8>> {
    let iv = build_iv(nonce)?;

    let cipher = Aes128::new(GenericArray::from_slice(&session_key[..BLOCK_LEN]));
    let mut block = GenericArray::from(iv);
    cipher.encrypt_block(&mut block);

    Ok(message
        .iter()
        .zip(block.iter().cycle())
        .map(|(m, k)| m ^ k)
        .collect())
}

/// Encrypt or decrypt `message` for the exchange between `private_key` and
/// the peer's `public_key` under `nonce`.
pub fn encrypt_decrypt(
    message: &[u8],
    private_key: &[u8],
    public_key: &[u8],
    nonce: &[u8],
) -> Result<Vec<u8>> {
    // Validate the nonce before paying for ECDH.
    build_iv(nonce)?;
    let session_key = derive_session_key(private_key, public_key, nonce)?;
    debug!(len = message.len(), "applying session keystream");
    apply_keystream(&session_key, nonce, message)
}
