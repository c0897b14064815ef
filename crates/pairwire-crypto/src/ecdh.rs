//! P-256 key pairs and ECDH key agreement.

use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::{PublicKey, SecretKey};
use rand::rngs::OsRng;
use tracing::debug;

use crate::normalize::fixed_width;
use crate::{private_key_array, public_key_array, tagged_point, CryptoError, Result};
use crate::{PRIVATE_KEY_LEN, PUBLIC_KEY_LEN, SHARED_SECRET_LEN};

/// Raw P-256 key pair: 32-byte scalar and 64-byte `x‖y` point.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    private_key: [u8; PRIVATE_KEY_LEN],
    public_key: [u8; PUBLIC_KEY_LEN],
}

impl KeyPair {
    /// Generate a new random P-256 key pair.
    pub fn generate() -> Self {
        let secret = SecretKey::random(&mut OsRng);
        let encoded = secret.public_key().to_encoded_point(false);

        let mut private_key = [0u8; PRIVATE_KEY_LEN];
        private_key.copy_from_slice(&fixed_width(&secret.to_bytes(), PRIVATE_KEY_LEN));

        let mut public_key = [0u8; PUBLIC_KEY_LEN];
        public_key.copy_from_slice(&encoded.as_bytes()[1..]);

        Self {
            private_key,
            public_key,
        }
    }

    pub fn private_key(&self) -> &[u8; PRIVATE_KEY_LEN] {
        &self.private_key
    }

    pub fn public_key(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.public_key
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// Generate a new random P-256 key pair.
pub fn generate_key_pair() -> KeyPair {
    KeyPair::generate()
}

/// Compute the raw ECDH shared secret between a local scalar and a peer point.
///
/// The point is re-tagged with `0x04` before parsing; a point that is not
/// on the curve is a key agreement failure.
pub fn compute_shared_secret(
    private_key: &[u8],
    public_key: &[u8],
) -> Result<[u8; SHARED_SECRET_LEN]> {
    let private_key = private_key_array(private_key)?;
    let public_key = public_key_array(public_key)?;

    let secret = SecretKey::from_slice(private_key)
        .map_err(|e| CryptoError::KeyAgreement(format!("invalid private scalar: {e}")))?;
    let peer = PublicKey::from_sec1_bytes(&tagged_point(public_key))
        .map_err(|e| CryptoError::KeyAgreement(format!("peer point not on curve: {e}")))?;

    let shared = p256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
    let mut result = [0u8; SHARED_SECRET_LEN];
    result.copy_from_slice(shared.raw_secret_bytes().as_slice());

    debug!("derived ECDH shared secret");
    Ok(result)
}
