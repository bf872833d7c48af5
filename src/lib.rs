//! # jwt-es256k
//!
//! Compact JWS tokens with a pluggable signing-method registry, and an
//! `ES256K` (ECDSA over secp256k1, RFC 8812) signing method that plugs
//! into it.
//!
//! The token library in [`jws`] knows two algorithms out of the box
//! (`HS256`, `EdDSA`). Any other algorithm is added at startup by
//! registering a factory under its name:
//!
//! ```
//! use jwt_es256k::es256k;
//! use jwt_es256k::jws::{default_registry, token, KeyFamily, SigningKey};
//! use jwt_es256k::jws::token::Header;
//!
//! let mut registry = default_registry();
//! es256k::register(&mut registry);
//!
//! let key = SigningKey::from_bytes(KeyFamily::Secp256k1, &[0x11; 32]).unwrap();
//! let claims = serde_json::json!({"sub": "alice"});
//! let jwt = token::encode(&registry, &Header::new("ES256K"), &claims, &key).unwrap();
//!
//! let decoded = token::decode(&registry, &jwt, &key.verifying_key()).unwrap();
//! assert_eq!(decoded.claims, claims);
//! ```
//!
//! ## Security Properties
//!
//! - **`#![forbid(unsafe_code)]`** throughout.
//! - **Algorithm-tagged keys**: every signing method checks the key family
//!   before use; a key of the wrong family is a `KeyTypeMismatch`, never a
//!   silent wrong result.
//! - **No `alg: none`**: an algorithm that is not registered cannot be
//!   selected by a token header.
//! - **Policy allowlist**: [`policy::TokenPolicy`] rejects algorithms the
//!   deployment did not opt into before any signature work.
//! - **Redacted key material**: `Debug` and error output never print
//!   private keys; HMAC secrets are zeroized on drop.
//!
//! ## Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`jws`] | Token library: signing-method trait, keys, registry, compact encode/decode |
//! | [`secp256k1`] | ES256K sign/verify primitives on base64url `R \|\| S` signatures |
//! | [`es256k`] | `ES256K` signing method adapter and its registration |
//! | [`policy`] | Token policy loading and algorithm allowlist |
//! | [`fs_guard`] | Symlink-safe, size-bounded file reads |

#![forbid(unsafe_code)]

/// Symlink-safe, size-bounded file reads for policy and key files.
pub mod fs_guard;

/// Token policy model: loads the policy JSON, provides secure defaults, and
/// enforces the algorithm allowlist.
pub mod policy;

/// Compact JWS token library with an open set of signing methods.
pub mod jws;

/// ECDSA secp256k1 + SHA-256 primitives in the `ES256K` wire format.
pub mod secp256k1;

/// `ES256K` signing method plugged into the token library.
pub mod es256k;
