//! Red team tests for the token library and its signing methods.
//!
//! Adversarial tokens must come back as proper errors: no panics, no
//! acceptance of forged or downgraded tokens, and no key material in error
//! messages.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::json;

use jwt_es256k::es256k;
use jwt_es256k::jws::registry::{default_registry, MethodRegistry};
use jwt_es256k::jws::token::{self, Header};
use jwt_es256k::jws::{KeyFamily, SigningError, SigningKey, SigningMethod, VerifyingKey};
use jwt_es256k::policy::TokenPolicy;

fn registry() -> MethodRegistry {
    let mut registry = default_registry();
    es256k::register(&mut registry);
    registry
}

fn secp_key() -> SigningKey {
    SigningKey::from_bytes(KeyFamily::Secp256k1, &[0x5e; 32]).unwrap()
}

fn b64(json: &serde_json::Value) -> String {
    URL_SAFE_NO_PAD.encode(serde_json::to_vec(json).unwrap())
}

// -------------------------------------------------------------------------
// (a) alg "none": unsigned token must never verify
// -------------------------------------------------------------------------

#[test]
fn alg_none_is_rejected() {
    let registry = registry();
    let forged = format!(
        "{}.{}.",
        b64(&json!({"alg": "none"})),
        b64(&json!({"admin": true}))
    );

    let err = token::decode(&registry, &forged, &secp_key().verifying_key()).unwrap_err();
    assert_eq!(err, SigningError::UnknownAlgorithm("none".into()));
}

// -------------------------------------------------------------------------
// (b) Algorithm confusion: ES256K public key used as an HS256 secret
// -------------------------------------------------------------------------

#[test]
fn public_key_as_hmac_secret_is_rejected_by_policy() {
    let registry = registry();
    let secp = secp_key();
    // The 33-byte SEC1 point is long enough to pass as an HMAC secret.
    let public = secp.verifying_key().to_public_bytes().unwrap();
    let attacker_key = SigningKey::from_bytes(KeyFamily::Hmac, &public).unwrap();
    let claims = json!({"admin": true});
    let forged = token::encode(&registry, &Header::new("HS256"), &claims, &attacker_key).unwrap();

    // The verifier only holds the secp256k1 key: HS256 sees the wrong family.
    let err = token::decode(&registry, &forged, &secp.verifying_key()).unwrap_err();
    assert!(matches!(err, SigningError::KeyTypeMismatch { .. }));

    // And the default policy refuses HS256 before looking at the key.
    let err = TokenPolicy::default()
        .decode(&registry, &forged, &secp.verifying_key())
        .unwrap_err();
    assert_eq!(err, SigningError::AlgorithmNotAllowed("HS256".into()));
}

// -------------------------------------------------------------------------
// (c) Header swap: EdDSA signature relabelled as ES256K
// -------------------------------------------------------------------------

#[test]
fn relabelled_alg_header_fails() {
    let registry = registry();
    let ed = SigningKey::from_bytes(KeyFamily::Ed25519, &[0x09; 32]).unwrap();
    let jwt = token::encode(&registry, &Header::new("EdDSA"), &json!({"a": 1}), &ed).unwrap();

    let parts: Vec<&str> = jwt.split('.').collect();
    let relabelled = format!("{}.{}.{}", b64(&json!({"alg": "ES256K"})), parts[1], parts[2]);

    let err = token::decode(&registry, &relabelled, &secp_key().verifying_key()).unwrap_err();
    assert!(err.is_rejected_signature(), "unexpected error: {err}");
}

// -------------------------------------------------------------------------
// (d) Signature malleability: high-S twin of a valid signature
// -------------------------------------------------------------------------

#[test]
fn high_s_signature_is_rejected() {
    use k256::ecdsa::Signature;

    let registry = registry();
    let key = secp_key();
    let jwt = token::encode(&registry, &Header::new("ES256K"), &json!({}), &key).unwrap();
    let (signing_input, sig_b64) = jwt.rsplit_once('.').unwrap();

    let sig = Signature::from_slice(&URL_SAFE_NO_PAD.decode(sig_b64).unwrap()).unwrap();
    let (r, s) = sig.split_scalars();
    let high_s = Signature::from_scalars(r, -*s.as_ref()).unwrap();
    let malleated = format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(high_s.to_bytes()));

    let err = token::decode(&registry, &malleated, &key.verifying_key()).unwrap_err();
    assert!(err.is_rejected_signature(), "unexpected error: {err}");
}

// -------------------------------------------------------------------------
// (e) Garbage inputs never panic
// -------------------------------------------------------------------------

#[test]
fn garbage_tokens_are_errors_not_panics() {
    let registry = registry();
    let vk = secp_key().verifying_key();
    let inputs = [
        "",
        ".",
        "..",
        "...",
        "a.b.c",
        "%%%.%%%.%%%",
        "eyJhbGciOiJFUzI1NksifQ..",
        "eyJhbGciOiJFUzI1NksifQ.e30.",
        "eyJhbGciOiJFUzI1NksifQ.e30.AAAA",
        "e30.e30.AAAA",
    ];
    for input in inputs {
        assert!(token::decode(&registry, input, &vk).is_err(), "accepted {input:?}");
    }
}

#[test]
fn header_without_alg_is_malformed() {
    let registry = registry();
    let token = format!("{}.{}.AAAA", b64(&json!({"typ": "JWT"})), b64(&json!({})));
    let err = token::decode(&registry, &token, &secp_key().verifying_key()).unwrap_err();
    assert!(matches!(err, SigningError::MalformedToken(_)));
}

// -------------------------------------------------------------------------
// (f) Registry hijack: a later registration replaces ES256K
// -------------------------------------------------------------------------

/// Accepts any signature. Stands in for a rogue plugin.
struct AcceptAll;

impl SigningMethod for AcceptAll {
    fn algorithm_name(&self) -> &'static str {
        "ES256K"
    }

    fn key_family(&self) -> KeyFamily {
        KeyFamily::Secp256k1
    }

    fn sign(&self, _signing_input: &str, _key: &SigningKey) -> Result<Vec<u8>, SigningError> {
        Ok(Vec::new())
    }

    fn verify(
        &self,
        _signing_input: &str,
        _signature: &[u8],
        _key: &VerifyingKey,
    ) -> Result<(), SigningError> {
        Ok(())
    }
}

#[test]
fn re_registration_is_reported_to_the_caller() {
    let mut registry = registry();
    let previous =
        registry.register("ES256K", || -> Arc<dyn SigningMethod> { Arc::new(AcceptAll) });

    // Last registration wins, and the caller is told something was replaced.
    assert!(previous.is_some());
    let forged = format!("{}.{}.", b64(&json!({"alg": "ES256K"})), b64(&json!({})));
    assert!(token::decode(&registry, &forged, &secp_key().verifying_key()).is_ok());

    // Putting the real adapter back restores verification.
    assert!(es256k::register(&mut registry).is_some());
    assert!(token::decode(&registry, &forged, &secp_key().verifying_key()).is_err());
}

// -------------------------------------------------------------------------
// (g) Error output carries no key material
// -------------------------------------------------------------------------

#[test]
fn errors_do_not_leak_key_bytes() {
    let secret = [0xC3u8; 32];
    let key = SigningKey::from_bytes(KeyFamily::Hmac, &secret).unwrap();
    let err = es256k::Es256k.sign("x", &key).unwrap_err();

    let shown = format!("{err} {err:?} {key:?}");
    assert!(!shown.to_lowercase().contains(&hex::encode(&secret[..4])));
}
