//! Cryptographic session layer for device pairing: P-256 key pairs, ECDH,
//! HMAC-SHA256 session keys, the AES-128 keystream cipher, and conversion
//! between 64-byte `r‖s` signatures and DER.
//!
//! Every function is stateless. Keys and signatures cross the API as raw
//! fixed-width byte strings; PEM and DER only exist on the way into `p256`.

pub mod der;
pub mod ecdh;
pub mod key_derive;
pub mod keystream;
pub mod normalize;
pub mod padding;
pub mod pem;
pub mod signing;

pub use der::{decode_signature, encode_signature};
pub use ecdh::{compute_shared_secret, generate_key_pair, KeyPair};
pub use key_derive::{derive_session_key, hmac};
pub use keystream::{apply_keystream, build_iv, encrypt_decrypt};
pub use padding::pad64;
pub use pem::{parse_public_key_pem, private_key_pem, public_key_pem};
pub use signing::{sign, verify};

use thiserror::Error;

/// Raw private scalar length.
pub const PRIVATE_KEY_LEN: usize = 32;
/// Uncompressed public point length, without the `0x04` SEC1 tag.
pub const PUBLIC_KEY_LEN: usize = 64;
/// ECDH output length.
pub const SHARED_SECRET_LEN: usize = 32;
/// HMAC-SHA256 output length.
pub const SESSION_KEY_LEN: usize = 32;
/// Fixed-width `r‖s` signature length.
pub const SIGNATURE_LEN: usize = 64;
/// Shortest nonce the IV construction accepts.
pub const MIN_NONCE_LEN: usize = 9;
/// Boundary that signed and MACed inputs are zero-padded to.
pub const PAD_BLOCK: usize = 64;

/// Cryptographic operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("invalid nonce length: need at least {min} bytes, got {got}")]
    InvalidNonceLength { min: usize, got: usize },

    #[error("invalid signature encoding: {0}")]
    InvalidSignatureEncoding(String),

    #[error("key agreement error: {0}")]
    KeyAgreement(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("crypto primitive failure: {0}")]
    Primitive(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;

/// Borrow `bytes` as a 32-byte private scalar.
pub(crate) fn private_key_array(bytes: &[u8]) -> Result<&[u8; PRIVATE_KEY_LEN]> {
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidKeyLength {
            expected: PRIVATE_KEY_LEN,
            got: bytes.len(),
        })
}

/// Borrow `bytes` as a 64-byte `x‖y` point.
pub(crate) fn public_key_array(bytes: &[u8]) -> Result<&[u8; PUBLIC_KEY_LEN]> {
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidKeyLength {
            expected: PUBLIC_KEY_LEN,
            got: bytes.len(),
        })
}

/// Prepend the SEC1 uncompressed-point tag.
pub(crate) fn tagged_point(public_key: &[u8; PUBLIC_KEY_LEN]) -> [u8; PUBLIC_KEY_LEN + 1] {
    let mut out = [0u8; PUBLIC_KEY_LEN + 1];
    out[0] = 0x04;
    out[1..].copy_from_slice(public_key);
    out
}
