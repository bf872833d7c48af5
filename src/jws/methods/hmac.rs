//! `HS256` signing method (HMAC with SHA-256).

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::jws::errors::SigningError;
use crate::jws::keys::{HmacSecret, KeyFamily, SigningKey, VerifyingKey};
use crate::jws::SigningMethod;

type HmacSha256 = Hmac<Sha256>;

/// Algorithm name registered for HMAC-SHA-256 (RFC 7518 §3.2).
pub const ALGORITHM: &str = "HS256";

/// Length of an HMAC-SHA-256 tag in bytes.
pub const TAG_LEN: usize = 32;

/// HMAC-SHA-256 signing method.
#[derive(Clone, Copy, Debug, Default)]
pub struct Hs256;

impl Hs256 {
    fn mac(secret: &HmacSecret, signing_input: &str) -> Result<HmacSha256, SigningError> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| {
            SigningError::CryptographicFailure {
                algorithm: ALGORITHM.into(),
                reason: e.to_string(),
            }
        })?;
        mac.update(signing_input.as_bytes());
        Ok(mac)
    }
}

impl SigningMethod for Hs256 {
    fn algorithm_name(&self) -> &'static str {
        ALGORITHM
    }

    fn key_family(&self) -> KeyFamily {
        KeyFamily::Hmac
    }

    fn sign(&self, signing_input: &str, key: &SigningKey) -> Result<Vec<u8>, SigningError> {
        let SigningKey::Hmac(secret) = key else {
            return Err(SigningError::key_type_mismatch(
                ALGORITHM,
                KeyFamily::Hmac,
                key.family(),
            ));
        };
        Ok(Self::mac(secret, signing_input)?
            .finalize()
            .into_bytes()
            .to_vec())
    }

    fn verify(
        &self,
        signing_input: &str,
        signature: &[u8],
        key: &VerifyingKey,
    ) -> Result<(), SigningError> {
        let VerifyingKey::Hmac(secret) = key else {
            return Err(SigningError::key_type_mismatch(
                ALGORITHM,
                KeyFamily::Hmac,
                key.family(),
            ));
        };
        if signature.len() != TAG_LEN {
            return Err(SigningError::SignatureEncoding {
                algorithm: ALGORITHM.into(),
                reason: format!("expected {TAG_LEN} bytes, got {}", signature.len()),
            });
        }

        // Constant-time tag comparison.
        Self::mac(secret, signing_input)?
            .verify_slice(signature)
            .map_err(|_| SigningError::VerificationMismatch {
                algorithm: ALGORITHM.into(),
            })
    }
}
