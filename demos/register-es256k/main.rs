//! Registering ES256K with the token library.
//!
//! 1. Out of the box the registry knows HS256 and EdDSA only.
//! 2. `es256k::register` adds ES256K under its algorithm name.
//! 3. A token signed with a secp256k1 key verifies with the public key
//!    alone, and fails with any other key.
//!
//! Run with: `cargo run --example register-es256k`

#![allow(clippy::unwrap_used)]

use jwt_es256k::es256k;
use jwt_es256k::jws::token::{self, Header};
use jwt_es256k::jws::{default_registry, KeyFamily, SigningKey};

fn main() {
    let mut registry = default_registry();
    println!("built-in algorithms: {:?}", registry.algorithms());

    let key = SigningKey::from_bytes(KeyFamily::Secp256k1, &[0x42; 32]).unwrap();
    match token::encode(&registry, &Header::new("ES256K"), &serde_json::json!({}), &key) {
        Ok(_) => println!("[UNEXPECTED] ES256K signed before registration"),
        Err(e) => println!("[OK] before registration: {e}"),
    }

    es256k::register(&mut registry);
    println!("after registration:  {:?}", registry.algorithms());
    println!();

    let claims = serde_json::json!({"sub": "did:plc:demo", "aud": "bsky.social"});
    let header = Header::new("ES256K").with_kid("demo-key-1");
    let jwt = token::encode(&registry, &header, &claims, &key).unwrap();
    println!("token: {jwt}");

    let public = key.verifying_key();
    println!(
        "public key (SEC1): {}",
        hex::encode(public.to_public_bytes().unwrap_or_default())
    );

    let decoded = token::decode(&registry, &jwt, &public).unwrap();
    println!("[OK] verified claims: {}", decoded.claims);

    let stranger = SigningKey::from_bytes(KeyFamily::Secp256k1, &[0x43; 32]).unwrap();
    match token::decode(&registry, &jwt, &stranger.verifying_key()) {
        Ok(_) => println!("[UNEXPECTED] verified with the wrong key"),
        Err(e) => println!("[OK] wrong key rejected: {e}"),
    }
}
