//! Signing methods built into the token library.
//!
//! | Method | Algorithm | Key family |
//! |--------|-----------|------------|
//! | [`hmac::Hs256`] | `HS256` (HMAC-SHA-256) | `Hmac` |
//! | [`eddsa::EdDsa`] | `EdDSA` (Ed25519) | `Ed25519` |
//!
//! Other algorithms are not known here; they are added to a
//! [`MethodRegistry`](super::registry::MethodRegistry) by the application.

pub mod eddsa;
pub mod hmac;
