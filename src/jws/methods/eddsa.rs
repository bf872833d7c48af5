//! `EdDSA` signing method using `ed25519-dalek`.
//!
//! ## Security
//!
//! Verification uses `verify_strict()`, which rejects weak public keys and
//! non-canonical signatures.

use ed25519_dalek::{Signature, Signer};

use crate::jws::errors::SigningError;
use crate::jws::keys::{KeyFamily, SigningKey, VerifyingKey};
use crate::jws::SigningMethod;

/// Algorithm name registered for Ed25519 (RFC 8037).
pub const ALGORITHM: &str = "EdDSA";

/// Ed25519 signing method backed by `ed25519-dalek`.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdDsa;

impl SigningMethod for EdDsa {
    fn algorithm_name(&self) -> &'static str {
        ALGORITHM
    }

    fn key_family(&self) -> KeyFamily {
        KeyFamily::Ed25519
    }

    fn sign(&self, signing_input: &str, key: &SigningKey) -> Result<Vec<u8>, SigningError> {
        let SigningKey::Ed25519(sk) = key else {
            return Err(SigningError::key_type_mismatch(
                ALGORITHM,
                KeyFamily::Ed25519,
                key.family(),
            ));
        };
        Ok(sk.sign(signing_input.as_bytes()).to_bytes().to_vec())
    }

    fn verify(
        &self,
        signing_input: &str,
        signature: &[u8],
        key: &VerifyingKey,
    ) -> Result<(), SigningError> {
        let VerifyingKey::Ed25519(vk) = key else {
            return Err(SigningError::key_type_mismatch(
                ALGORITHM,
                KeyFamily::Ed25519,
                key.family(),
            ));
        };

        // 64 bytes: R || S
        let sig = Signature::from_slice(signature).map_err(|e| SigningError::SignatureEncoding {
            algorithm: ALGORITHM.into(),
            reason: e.to_string(),
        })?;

        vk.verify_strict(signing_input.as_bytes(), &sig)
            .map_err(|_| SigningError::VerificationMismatch {
                algorithm: ALGORITHM.into(),
            })
    }
}
