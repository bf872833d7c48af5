//! Token policy: which algorithms may be used, and header defaults.
//!
//! Loaded from a JSON file. Every field has a default, so an empty object
//! (or no file at all) yields the secure defaults below.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::jws::registry::MethodRegistry;
use crate::jws::token::{self, Token, DEFAULT_TOKEN_TYPE};
use crate::jws::{SigningError, VerifyingKey};

/// Maximum policy file size (1 MB).
const MAX_POLICY_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPolicy {
    /// Algorithm used when signing without an explicit `--alg`.
    #[serde(default = "default_algorithm")]
    pub default_algorithm: String,

    /// Algorithms accepted for signing and verification. `HS256` is not in
    /// the default list: a verifier holding a public key must never accept
    /// a shared-secret algorithm unless configured to.
    #[serde(default = "default_allowed_algorithms")]
    pub allowed_algorithms: Vec<String>,

    /// `typ` header written on new tokens.
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_algorithm() -> String {
    crate::es256k::ALGORITHM.into()
}

fn default_allowed_algorithms() -> Vec<String> {
    vec![
        crate::es256k::ALGORITHM.into(),
        crate::jws::methods::eddsa::ALGORITHM.into(),
    ]
}

fn default_token_type() -> String {
    DEFAULT_TOKEN_TYPE.into()
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            default_algorithm: default_algorithm(),
            allowed_algorithms: default_allowed_algorithms(),
            token_type: default_token_type(),
        }
    }
}

impl TokenPolicy {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => serde_json::from_slice(&crate::fs_guard::read_validated(
                p,
                MAX_POLICY_BYTES,
            )?)
            .with_context(|| format!("parsing policy {}", p.display())),
            None => Ok(Self::default()),
        }
    }

    /// Returns `true` if `alg` is in the allowed list.
    pub fn is_allowed(&self, alg: &str) -> bool {
        self.allowed_algorithms.iter().any(|a| a == alg)
    }

    /// Rejects algorithms outside the allowed list.
    pub fn check_algorithm(&self, alg: &str) -> Result<(), SigningError> {
        if self.is_allowed(alg) {
            Ok(())
        } else {
            Err(SigningError::AlgorithmNotAllowed(alg.to_string()))
        }
    }

    /// Verifies `token` after checking its `alg` against the allowed list.
    /// A disallowed algorithm is rejected before any signature work.
    pub fn decode(
        &self,
        registry: &MethodRegistry,
        token: &str,
        key: &VerifyingKey,
    ) -> Result<Token, SigningError> {
        let header = token::decode_header(token)?;
        self.check_algorithm(&header.alg)?;
        token::decode(registry, token, key)
    }
}
