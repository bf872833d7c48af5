//! Algorithm-tagged key material.
//!
//! The token library never inspects key internals. Keys are enums tagged by
//! [`KeyFamily`], and each signing method checks the tag before touching the
//! key, so handing an Ed25519 key to a secp256k1 method is a reported
//! `KeyTypeMismatch` rather than an opaque downcast failure.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::errors::SigningError;

/// Minimum HMAC secret length in bytes (the SHA-256 output size).
pub const MIN_HMAC_SECRET_LEN: usize = 32;

/// The family of key a signing method operates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyFamily {
    /// Shared HMAC secret.
    Hmac,
    /// Edwards-curve Ed25519 key.
    Ed25519,
    /// ECDSA key on the secp256k1 curve.
    Secp256k1,
}

impl fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hmac => "hmac",
            Self::Ed25519 => "ed25519",
            Self::Secp256k1 => "secp256k1",
        })
    }
}

/// Shared HMAC secret. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct HmacSecret(Vec<u8>);

impl HmacSecret {
    /// Wraps a secret, rejecting secrets shorter than [`MIN_HMAC_SECRET_LEN`].
    pub fn new(secret: &[u8]) -> Result<Self, SigningError> {
        if secret.len() < MIN_HMAC_SECRET_LEN {
            return Err(SigningError::InvalidKeyMaterial(format!(
                "HMAC secret must be at least {MIN_HMAC_SECRET_LEN} bytes, got {}",
                secret.len()
            )));
        }
        Ok(Self(secret.to_vec()))
    }

    /// Returns the raw secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for HmacSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HmacSecret([REDACTED])")
    }
}

/// Private key used to produce signatures.
#[derive(Clone)]
pub enum SigningKey {
    /// HMAC shared secret.
    Hmac(HmacSecret),
    /// Ed25519 signing key.
    Ed25519(ed25519_dalek::SigningKey),
    /// secp256k1 ECDSA signing key.
    Secp256k1(k256::ecdsa::SigningKey),
}

impl SigningKey {
    /// Returns the family this key belongs to.
    pub fn family(&self) -> KeyFamily {
        match self {
            Self::Hmac(_) => KeyFamily::Hmac,
            Self::Ed25519(_) => KeyFamily::Ed25519,
            Self::Secp256k1(_) => KeyFamily::Secp256k1,
        }
    }

    /// Parses raw private key bytes for the given family.
    ///
    /// - `Hmac`: the secret itself, at least 32 bytes.
    /// - `Ed25519`: the 32-byte seed.
    /// - `Secp256k1`: the 32-byte big-endian scalar.
    pub fn from_bytes(family: KeyFamily, bytes: &[u8]) -> Result<Self, SigningError> {
        match family {
            KeyFamily::Hmac => Ok(Self::Hmac(HmacSecret::new(bytes)?)),
            KeyFamily::Ed25519 => {
                let seed: &[u8; 32] = bytes.try_into().map_err(|_| {
                    SigningError::InvalidKeyMaterial(format!(
                        "Ed25519 secret key must be 32 bytes, got {}",
                        bytes.len()
                    ))
                })?;
                Ok(Self::Ed25519(ed25519_dalek::SigningKey::from_bytes(seed)))
            }
            KeyFamily::Secp256k1 => {
                if bytes.len() != 32 {
                    return Err(SigningError::InvalidKeyMaterial(format!(
                        "secp256k1 secret key must be 32 bytes, got {}",
                        bytes.len()
                    )));
                }
                let key = k256::ecdsa::SigningKey::from_slice(bytes).map_err(|e| {
                    SigningError::InvalidKeyMaterial(format!("invalid secp256k1 secret key: {e}"))
                })?;
                Ok(Self::Secp256k1(key))
            }
        }
    }

    /// Parses hex-encoded private key bytes for the given family.
    pub fn from_hex(family: KeyFamily, encoded: &str) -> Result<Self, SigningError> {
        let bytes = zeroize::Zeroizing::new(decode_hex(encoded)?);
        Self::from_bytes(family, &bytes)
    }

    /// Derives the matching verification key. For HMAC this is the same
    /// shared secret.
    pub fn verifying_key(&self) -> VerifyingKey {
        match self {
            Self::Hmac(secret) => VerifyingKey::Hmac(secret.clone()),
            Self::Ed25519(key) => VerifyingKey::Ed25519(key.verifying_key()),
            Self::Secp256k1(key) => VerifyingKey::Secp256k1(k256::ecdsa::VerifyingKey::from(key)),
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey::{}([REDACTED])", self.family())
    }
}

/// Public key (or shared secret, for HMAC) used to check signatures.
#[derive(Clone)]
pub enum VerifyingKey {
    /// HMAC shared secret.
    Hmac(HmacSecret),
    /// Ed25519 public key.
    Ed25519(ed25519_dalek::VerifyingKey),
    /// secp256k1 ECDSA public key.
    Secp256k1(k256::ecdsa::VerifyingKey),
}

impl VerifyingKey {
    /// Returns the family this key belongs to.
    pub fn family(&self) -> KeyFamily {
        match self {
            Self::Hmac(_) => KeyFamily::Hmac,
            Self::Ed25519(_) => KeyFamily::Ed25519,
            Self::Secp256k1(_) => KeyFamily::Secp256k1,
        }
    }

    /// Parses raw public key bytes for the given family.
    ///
    /// - `Hmac`: the shared secret, at least 32 bytes.
    /// - `Ed25519`: the 32-byte compressed point.
    /// - `Secp256k1`: a SEC1 encoded point (33 bytes compressed or 65
    ///   bytes uncompressed).
    pub fn from_bytes(family: KeyFamily, bytes: &[u8]) -> Result<Self, SigningError> {
        match family {
            KeyFamily::Hmac => Ok(Self::Hmac(HmacSecret::new(bytes)?)),
            KeyFamily::Ed25519 => {
                let raw: &[u8; 32] = bytes.try_into().map_err(|_| {
                    SigningError::InvalidKeyMaterial(format!(
                        "Ed25519 public key must be 32 bytes, got {}",
                        bytes.len()
                    ))
                })?;
                let key = ed25519_dalek::VerifyingKey::from_bytes(raw).map_err(|e| {
                    SigningError::InvalidKeyMaterial(format!("invalid Ed25519 public key: {e}"))
                })?;
                Ok(Self::Ed25519(key))
            }
            KeyFamily::Secp256k1 => {
                let key = k256::ecdsa::VerifyingKey::from_sec1_bytes(bytes).map_err(|e| {
                    SigningError::InvalidKeyMaterial(format!("invalid secp256k1 public key: {e}"))
                })?;
                Ok(Self::Secp256k1(key))
            }
        }
    }

    /// Parses hex-encoded public key bytes for the given family.
    pub fn from_hex(family: KeyFamily, encoded: &str) -> Result<Self, SigningError> {
        let bytes = zeroize::Zeroizing::new(decode_hex(encoded)?);
        Self::from_bytes(family, &bytes)
    }

    /// Returns the public encoding of this key: the raw point for Ed25519,
    /// the compressed SEC1 point for secp256k1, and `None` for HMAC (whose
    /// verification key is secret).
    pub fn to_public_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Self::Hmac(_) => None,
            Self::Ed25519(key) => Some(key.to_bytes().to_vec()),
            Self::Secp256k1(key) => Some(key.to_sec1_bytes().to_vec()),
        }
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_public_bytes() {
            Some(bytes) => write!(f, "VerifyingKey::{}({})", self.family(), hex::encode(bytes)),
            None => write!(f, "VerifyingKey::{}([REDACTED])", self.family()),
        }
    }
}

fn decode_hex(encoded: &str) -> Result<Vec<u8>, SigningError> {
    hex::decode(encoded.trim())
        .map_err(|e| SigningError::InvalidKeyMaterial(format!("key is not valid hex: {e}")))
}
