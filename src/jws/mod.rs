//! Compact JWS token library with an open set of signing methods.
//!
//! The library ships two built-in algorithms (`HS256`, `EdDSA`). Anything
//! else is taught to it at startup by registering a factory under an
//! algorithm name in a [`registry::MethodRegistry`]; the token code looks
//! methods up by the `alg` header and never names a concrete algorithm.
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`errors`] | `SigningError` type for all signing and token operations |
//! | [`keys`] | Algorithm-tagged `SigningKey` / `VerifyingKey` enums |
//! | [`registry`] | Algorithm name to signing-method factory mapping |
//! | [`token`] | Compact serialization: header, encode, decode |
//! | [`methods`] | Built-in `SigningMethod` implementations |

#![forbid(unsafe_code)]

pub mod errors;
pub mod keys;
pub mod methods;
pub mod registry;
pub mod token;

pub use errors::SigningError;
pub use keys::{KeyFamily, SigningKey, VerifyingKey};
pub use registry::{default_registry, MethodRegistry};

/// The contract every signing algorithm implements to be usable by the
/// token library.
///
/// Implementations hold no mutable state: one instance may serve any number
/// of concurrent `sign`/`verify` calls. The signing input is treated as an
/// opaque string; methods must not reinterpret its structure.
pub trait SigningMethod: Send + Sync {
    /// The algorithm name used for registry lookup and in the `alg` header
    /// (e.g. `"EdDSA"`). Constant for the lifetime of the method.
    fn algorithm_name(&self) -> &'static str;

    /// The key family this method accepts.
    fn key_family(&self) -> KeyFamily;

    /// Signs `signing_input` and returns the raw signature bytes.
    ///
    /// Returns `KeyTypeMismatch` if `key` is of the wrong family, or
    /// `CryptographicFailure` if the primitive fails.
    fn sign(&self, signing_input: &str, key: &SigningKey) -> Result<Vec<u8>, SigningError>;

    /// Checks `signature` over `signing_input`.
    ///
    /// Returns `Ok(())` only when the signature authenticates the input.
    /// Failures are `KeyTypeMismatch`, `SignatureEncoding` for bytes that
    /// cannot be decoded, or `VerificationMismatch` for a well-formed
    /// signature that does not match.
    fn verify(
        &self,
        signing_input: &str,
        signature: &[u8],
        key: &VerifyingKey,
    ) -> Result<(), SigningError>;
}
