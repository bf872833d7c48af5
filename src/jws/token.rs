//! Compact JWS serialization (RFC 7515 §7.1).
//!
//! A token is `BASE64URL(header) "." BASE64URL(claims) "." BASE64URL(signature)`,
//! unpadded. The first two segments, joined by `"."`, are the signing input.
//! The signing method is chosen by looking up the header's `alg` in a
//! [`MethodRegistry`]; this module has no knowledge of individual algorithms.
//!
//! Claims are carried as arbitrary JSON. Registered-claim validation
//! (`exp`, `nbf`, `aud`, ...) is left to the caller.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::errors::SigningError;
use super::keys::{SigningKey, VerifyingKey};
use super::registry::MethodRegistry;

/// Default `typ` header value.
pub const DEFAULT_TOKEN_TYPE: &str = "JWT";

/// JOSE header of a compact token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signing algorithm name (e.g. `"ES256K"`).
    pub alg: String,

    /// Media type of the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,

    /// Key identifier hint for the verifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl Header {
    /// Creates a header for `alg` with `typ` set to `"JWT"`.
    pub fn new(alg: impl Into<String>) -> Self {
        Self {
            alg: alg.into(),
            typ: Some(DEFAULT_TOKEN_TYPE.to_string()),
            kid: None,
        }
    }

    /// Sets the key identifier.
    #[must_use]
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }
}

/// A token whose signature has been verified.
#[derive(Clone, Debug)]
pub struct Token {
    /// Decoded header.
    pub header: Header,
    /// Decoded claims.
    pub claims: serde_json::Value,
    /// Raw signature bytes.
    pub signature: Vec<u8>,
}

impl Token {
    /// Deserializes the claims into a caller-defined type.
    pub fn claims_as<T: DeserializeOwned>(&self) -> Result<T, SigningError> {
        serde_json::from_value(self.claims.clone())
            .map_err(|e| SigningError::MalformedToken(format!("claims do not match type: {e}")))
    }
}

/// Signs `claims` under `header` and returns the compact token.
///
/// The method is looked up by `header.alg`.
pub fn encode<C: Serialize + ?Sized>(
    registry: &MethodRegistry,
    header: &Header,
    claims: &C,
    key: &SigningKey,
) -> Result<String, SigningError> {
    let method = registry.method(&header.alg)?;

    let header_json =
        serde_json::to_vec(header).map_err(|e| SigningError::Serialization(e.to_string()))?;
    let claims_json =
        serde_json::to_vec(claims).map_err(|e| SigningError::Serialization(e.to_string()))?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(claims_json)
    );
    let signature = method.sign(&signing_input, key)?;

    Ok(format!(
        "{signing_input}.{}",
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

/// Decodes the header of a compact token without verifying it.
///
/// Use this to choose a verification key; never trust anything else in the
/// token until [`decode`] succeeds.
pub fn decode_header(token: &str) -> Result<Header, SigningError> {
    decode_segment(split(token)?.header, "header")
}

/// Verifies a compact token and returns its decoded contents.
///
/// The signing method is selected by the header's `alg`; an algorithm that
/// is not registered (including `"none"`) fails with `UnknownAlgorithm`.
pub fn decode(
    registry: &MethodRegistry,
    token: &str,
    key: &VerifyingKey,
) -> Result<Token, SigningError> {
    let segments = split(token)?;
    let header: Header = decode_segment(segments.header, "header")?;
    let method = registry.method(&header.alg)?;

    let signature = URL_SAFE_NO_PAD.decode(segments.signature).map_err(|e| {
        SigningError::SignatureEncoding {
            algorithm: header.alg.clone(),
            reason: format!("signature segment is not base64url: {e}"),
        }
    })?;

    tracing::debug!(alg = %header.alg, kid = ?header.kid, "verifying token signature");
    method.verify(segments.signing_input, &signature, key)?;

    let claims = decode_segment(segments.claims, "claims")?;
    Ok(Token {
        header,
        claims,
        signature,
    })
}

/// The segments of a compact token. `signing_input` is the token text up
/// to the last `'.'`, byte for byte.
struct Segments<'a> {
    signing_input: &'a str,
    header: &'a str,
    claims: &'a str,
    signature: &'a str,
}

fn split(token: &str) -> Result<Segments<'_>, SigningError> {
    let malformed = || SigningError::MalformedToken("expected three '.'-separated segments".into());

    let (signing_input, signature) = token.rsplit_once('.').ok_or_else(malformed)?;
    let (header, claims) = signing_input.split_once('.').ok_or_else(malformed)?;
    if claims.contains('.') {
        return Err(malformed());
    }
    Ok(Segments {
        signing_input,
        header,
        claims,
        signature,
    })
}

fn decode_segment<T: DeserializeOwned>(segment: &str, what: &str) -> Result<T, SigningError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| SigningError::MalformedToken(format!("{what} is not base64url: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| SigningError::MalformedToken(format!("{what} is not valid JSON: {e}")))
}
