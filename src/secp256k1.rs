//! ES256K primitives: ECDSA over secp256k1 with SHA-256 (RFC 8812 §3.2).
//!
//! This module knows nothing about tokens. It signs and verifies arbitrary
//! messages and speaks the algorithm's canonical wire form: the 64-byte
//! `R || S` signature, big-endian, as unpadded base64url text.
//!
//! Signing is deterministic (RFC 6979) and always yields low-S signatures.
//! Verification rejects high-S signatures.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};

use crate::jws::SigningError;

/// Algorithm name used in errors from this module.
pub const ALGORITHM: &str = "ES256K";

/// Length of a raw `R || S` signature in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Signs `message` and returns the base64url `R || S` signature.
pub fn sign(message: &str, key: &SigningKey) -> Result<String, SigningError> {
    let signature: Signature = key.try_sign(message.as_bytes()).map_err(|e| {
        SigningError::CryptographicFailure {
            algorithm: ALGORITHM.into(),
            reason: e.to_string(),
        }
    })?;
    Ok(URL_SAFE_NO_PAD.encode(signature.to_bytes()))
}

/// Verifies a base64url `R || S` signature over `message`.
///
/// Returns `SignatureEncoding` if the text does not decode to a 64-byte
/// signature with in-range scalars, and `VerificationMismatch` if it decodes
/// but does not match.
pub fn verify(message: &str, signature: &str, key: &VerifyingKey) -> Result<(), SigningError> {
    let raw = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|e| encoding_error(format!("not base64url: {e}")))?;
    if raw.len() != SIGNATURE_LEN {
        return Err(encoding_error(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            raw.len()
        )));
    }
    let signature = Signature::from_slice(&raw).map_err(|e| encoding_error(e.to_string()))?;

    key.verify(message.as_bytes(), &signature)
        .map_err(|_| SigningError::VerificationMismatch {
            algorithm: ALGORITHM.into(),
        })
}

fn encoding_error(reason: String) -> SigningError {
    SigningError::SignatureEncoding {
        algorithm: ALGORITHM.into(),
        reason,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn keypair() -> (SigningKey, VerifyingKey) {
        let sk = SigningKey::from_slice(&[0x11; 32]).unwrap();
        let vk = VerifyingKey::from(&sk);
        (sk, vk)
    }

    #[test]
    fn signature_is_64_bytes_of_base64url() {
        let (sk, _) = keypair();
        let sig = sign("message", &sk).unwrap();
        // 64 bytes -> 86 unpadded base64url characters
        assert_eq!(sig.len(), 86);
        assert!(!sig.contains('='));
        assert!(!sig.contains('+') && !sig.contains('/'));
        assert_eq!(URL_SAFE_NO_PAD.decode(&sig).unwrap().len(), SIGNATURE_LEN);
    }

    #[test]
    fn signing_is_deterministic() {
        let (sk, _) = keypair();
        assert_eq!(sign("m", &sk).unwrap(), sign("m", &sk).unwrap());
    }

    #[test]
    fn sign_then_verify() {
        let (sk, vk) = keypair();
        let sig = sign("header.payload", &sk).unwrap();
        verify("header.payload", &sig, &vk).unwrap();
    }

    #[test]
    fn signature_is_low_s() {
        let (sk, _) = keypair();
        for msg in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            let raw = URL_SAFE_NO_PAD.decode(sign(msg, &sk).unwrap()).unwrap();
            let sig = Signature::from_slice(&raw).unwrap();
            assert!(sig.normalize_s().is_none(), "high-S signature for {msg}");
        }
    }

    #[test]
    fn verifies_signature_made_directly_with_k256() {
        let (sk, vk) = keypair();
        let sig: Signature = sk.sign(b"interop");
        let encoded = URL_SAFE_NO_PAD.encode(sig.to_bytes());
        verify("interop", &encoded, &vk).unwrap();
    }

    #[test]
    fn reject_der_encoded_signature() {
        let (sk, vk) = keypair();
        let sig: Signature = sk.sign(b"der");
        let der = URL_SAFE_NO_PAD.encode(sig.to_der().as_bytes());
        let err = verify("der", &der, &vk).unwrap_err();
        assert!(matches!(err, SigningError::SignatureEncoding { .. }));
    }

    #[test]
    fn reject_non_base64url_signature() {
        let (_, vk) = keypair();
        let err = verify("m", "not/base64+", &vk).unwrap_err();
        assert!(matches!(err, SigningError::SignatureEncoding { .. }));
    }

    #[test]
    fn reject_zero_scalars() {
        let (_, vk) = keypair();
        let zeros = URL_SAFE_NO_PAD.encode([0u8; SIGNATURE_LEN]);
        let err = verify("m", &zeros, &vk).unwrap_err();
        assert!(matches!(err, SigningError::SignatureEncoding { .. }));
    }

    #[test]
    fn reject_wrong_message() {
        let (sk, vk) = keypair();
        let sig = sign("original", &sk).unwrap();
        let err = verify("altered", &sig, &vk).unwrap_err();
        assert_eq!(
            err,
            SigningError::VerificationMismatch {
                algorithm: "ES256K".into()
            }
        );
    }

    #[test]
    fn reject_wrong_key() {
        let (sk, _) = keypair();
        let other = VerifyingKey::from(&SigningKey::from_slice(&[0x22; 32]).unwrap());
        let sig = sign("m", &sk).unwrap();
        let err = verify("m", &sig, &other).unwrap_err();
        assert!(matches!(err, SigningError::VerificationMismatch { .. }));
    }
}
