//! Error types for signing, verification and token handling.
//!
//! Every failure in the token library and its signing methods is a
//! [`SigningError`]. `Display` output names the algorithm and the reason
//! but never includes key bytes or signature bytes, so errors are safe to
//! surface in logs and CLI output.

use std::fmt;

use super::keys::KeyFamily;

/// Errors produced while signing, verifying, or (de)serializing tokens.
///
/// The verification-side variants stay distinct so a caller can tell a
/// token that used the wrong kind of key (`KeyTypeMismatch`) from one whose
/// signature bytes are garbage (`SignatureEncoding`) from one that was
/// tampered with (`VerificationMismatch`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// No signing method is registered under this algorithm name.
    UnknownAlgorithm(String),

    /// The algorithm is registered but rejected by the token policy.
    AlgorithmNotAllowed(String),

    /// The supplied key belongs to a different algorithm family.
    KeyTypeMismatch {
        /// Algorithm that was asked to use the key.
        algorithm: String,
        /// Key family the algorithm requires.
        expected: KeyFamily,
        /// Key family that was supplied.
        found: KeyFamily,
    },

    /// The signature bytes cannot be decoded into the algorithm's
    /// canonical form (wrong length, bad base64url, scalar out of range).
    SignatureEncoding {
        /// Which algorithm was decoding.
        algorithm: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The underlying signing primitive failed.
    CryptographicFailure {
        /// Which algorithm was signing.
        algorithm: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The signature is well formed but does not authenticate the signing
    /// input under the given key. This is the normal outcome for tampered
    /// tokens.
    VerificationMismatch {
        /// Which algorithm was verifying.
        algorithm: String,
    },

    /// Key material is malformed (wrong length, invalid encoding, point
    /// not on the curve).
    InvalidKeyMaterial(String),

    /// The compact token could not be split or its header/claims decoded.
    MalformedToken(String),

    /// Header or claims could not be serialized to JSON.
    Serialization(String),
}

impl SigningError {
    /// Builds a [`SigningError::KeyTypeMismatch`] for `algorithm`.
    pub fn key_type_mismatch(algorithm: &str, expected: KeyFamily, found: KeyFamily) -> Self {
        Self::KeyTypeMismatch {
            algorithm: algorithm.to_string(),
            expected,
            found,
        }
    }

    /// Returns `true` for failures that mean the token itself is not
    /// authentic (bad encoding or signature mismatch), as opposed to a
    /// configuration problem on the verifier's side.
    pub fn is_rejected_signature(&self) -> bool {
        matches!(
            self,
            Self::SignatureEncoding { .. } | Self::VerificationMismatch { .. }
        )
    }
}

impl fmt::Display for SigningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAlgorithm(alg) => {
                write!(f, "unknown signing algorithm: {alg}")
            }
            Self::AlgorithmNotAllowed(alg) => {
                write!(f, "signing algorithm not allowed by policy: {alg}")
            }
            Self::KeyTypeMismatch {
                algorithm,
                expected,
                found,
            } => {
                write!(
                    f,
                    "key type mismatch for {algorithm}: expected {expected} key, got {found} key"
                )
            }
            Self::SignatureEncoding { algorithm, reason } => {
                write!(f, "malformed {algorithm} signature: {reason}")
            }
            Self::CryptographicFailure { algorithm, reason } => {
                write!(f, "{algorithm} signing failed: {reason}")
            }
            Self::VerificationMismatch { algorithm } => {
                write!(f, "{algorithm} signature does not match")
            }
            Self::InvalidKeyMaterial(msg) => write!(f, "invalid key material: {msg}"),
            Self::MalformedToken(msg) => write!(f, "malformed token: {msg}"),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for SigningError {}
