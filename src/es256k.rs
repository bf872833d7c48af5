//! `ES256K` signing method for the token library.
//!
//! The token library only ships `HS256` and `EdDSA`. [`Es256k`] teaches it
//! ECDSA over secp256k1 by implementing [`SigningMethod`] on top of the
//! [`secp256k1`](crate::secp256k1) primitives, and [`register`] installs it
//! in a [`MethodRegistry`] during application wiring.
//!
//! The two sides speak different vocabularies: the token library passes raw
//! signature bytes, the primitives speak base64url text. This adapter only
//! converts between the two; errors from the primitives pass through
//! untouched.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::jws::registry::{MethodFactory, MethodRegistry};
use crate::jws::{KeyFamily, SigningError, SigningKey, SigningMethod, VerifyingKey};
use crate::secp256k1;

/// Algorithm name for ECDSA over secp256k1 with SHA-256 (RFC 8812).
pub const ALGORITHM: &str = "ES256K";

/// Stateless `ES256K` signing method.
#[derive(Clone, Copy, Debug, Default)]
pub struct Es256k;

impl SigningMethod for Es256k {
    fn algorithm_name(&self) -> &'static str {
        ALGORITHM
    }

    fn key_family(&self) -> KeyFamily {
        KeyFamily::Secp256k1
    }

    fn sign(&self, signing_input: &str, key: &SigningKey) -> Result<Vec<u8>, SigningError> {
        let SigningKey::Secp256k1(sk) = key else {
            return Err(SigningError::key_type_mismatch(
                ALGORITHM,
                KeyFamily::Secp256k1,
                key.family(),
            ));
        };
        let encoded = secp256k1::sign(signing_input, sk)?;
        URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|e| SigningError::CryptographicFailure {
                algorithm: ALGORITHM.into(),
                reason: format!("primitive returned undecodable signature: {e}"),
            })
    }

    fn verify(
        &self,
        signing_input: &str,
        signature: &[u8],
        key: &VerifyingKey,
    ) -> Result<(), SigningError> {
        let VerifyingKey::Secp256k1(vk) = key else {
            return Err(SigningError::key_type_mismatch(
                ALGORITHM,
                KeyFamily::Secp256k1,
                key.family(),
            ));
        };
        secp256k1::verify(signing_input, &URL_SAFE_NO_PAD.encode(signature), vk)
    }
}

/// Registers [`Es256k`] under `"ES256K"`.
///
/// Call once while wiring the application, before the registry is shared.
/// Returns the factory previously registered under the same name, if any;
/// that factory is replaced.
pub fn register(registry: &mut MethodRegistry) -> Option<MethodFactory> {
    registry.register(ALGORITHM, || -> Arc<dyn SigningMethod> { Arc::new(Es256k) })
}
