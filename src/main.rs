use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::{
    io::Read,
    path::{Path, PathBuf},
};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use jwt_es256k::es256k;
use jwt_es256k::fs_guard;
use jwt_es256k::jws::registry::{default_registry, MethodRegistry};
use jwt_es256k::jws::token::{self, Header};
use jwt_es256k::jws::{SigningKey, VerifyingKey};
use jwt_es256k::policy::TokenPolicy;

const SIGNING_KEY_ENV: &str = "JWT_ES256K_SIGNING_KEY";
const VERIFYING_KEY_ENV: &str = "JWT_ES256K_VERIFYING_KEY";

// Claims and tokens arrive on stdin; nothing legitimate is this large.
const MAX_STDIN_BYTES: u64 = 1024 * 1024; // 1MB

#[derive(Parser)]
#[command(
    name = "jwt-es256k",
    about = "Sign and verify compact JWS tokens (ES256K, EdDSA, HS256)",
    version
)]
struct Cli {
    /// Token policy JSON (algorithm allowlist and header defaults)
    #[arg(long, global = true)]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Sign a JSON claims object read from stdin and print the token
    Sign {
        /// Signing algorithm (defaults to the policy's default algorithm)
        #[arg(long)]
        alg: Option<String>,

        /// File holding the hex-encoded private key
        /// (defaults to $JWT_ES256K_SIGNING_KEY)
        #[arg(long)]
        key_file: Option<PathBuf>,

        /// Key identifier to put in the header
        #[arg(long)]
        kid: Option<String>,

        /// Stamp an `iat` claim with the current time
        #[arg(long)]
        issued_at: bool,
    },

    /// Verify a token read from stdin and print its claims
    Verify {
        /// File holding the hex-encoded public key (or HMAC secret)
        /// (defaults to $JWT_ES256K_VERIFYING_KEY)
        #[arg(long)]
        key_file: Option<PathBuf>,
    },

    /// List registered signing algorithms
    Algorithms,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let policy = TokenPolicy::load(cli.policy.as_deref())?;
    let registry = build_registry(&policy);

    match cli.cmd {
        Cmd::Sign {
            alg,
            key_file,
            kid,
            issued_at,
        } => sign_claims(&registry, &policy, alg, key_file.as_deref(), kid, issued_at),
        Cmd::Verify { key_file } => verify_token(&registry, &policy, key_file.as_deref()),
        Cmd::Algorithms => {
            list_algorithms(&registry, &policy);
            Ok(())
        }
    }
}

/// Built-in methods plus ES256K. All registration happens here, before the
/// registry is used.
fn build_registry(policy: &TokenPolicy) -> MethodRegistry {
    let mut registry = default_registry();
    es256k::register(&mut registry);

    for warning in registry.validate_policy(policy) {
        tracing::warn!(%warning, "token policy does not match registered algorithms");
    }
    registry
}

fn sign_claims(
    registry: &MethodRegistry,
    policy: &TokenPolicy,
    alg: Option<String>,
    key_file: Option<&Path>,
    kid: Option<String>,
    issued_at: bool,
) -> Result<()> {
    let alg = alg.unwrap_or_else(|| policy.default_algorithm.clone());
    policy.check_algorithm(&alg)?;
    let method = registry.method(&alg)?;

    let key_hex = read_key(key_file, SIGNING_KEY_ENV)?;
    let key = SigningKey::from_hex(method.key_family(), &key_hex)
        .with_context(|| format!("loading {alg} signing key"))?;

    let mut claims: Value =
        serde_json::from_str(&read_stdin()?).context("parsing claims JSON from stdin")?;
    let Some(object) = claims.as_object_mut() else {
        bail!("claims must be a JSON object");
    };
    if issued_at {
        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        object.insert("iat".into(), Value::from(now));
    }

    let header = Header {
        alg,
        typ: Some(policy.token_type.clone()),
        kid,
    };
    tracing::debug!(alg = %header.alg, kid = ?header.kid, "signing token");
    let token = token::encode(registry, &header, &claims, &key)?;
    println!("{token}");
    Ok(())
}

fn verify_token(
    registry: &MethodRegistry,
    policy: &TokenPolicy,
    key_file: Option<&Path>,
) -> Result<()> {
    let input = read_stdin()?;
    let token = input.trim();

    // The header picks the key family; nothing in it is trusted beyond that.
    let header = token::decode_header(token)?;
    policy.check_algorithm(&header.alg)?;
    let method = registry.method(&header.alg)?;

    let key_hex = read_key(key_file, VERIFYING_KEY_ENV)?;
    let key = VerifyingKey::from_hex(method.key_family(), &key_hex)
        .with_context(|| format!("loading {} verifying key", header.alg))?;

    let verified = policy.decode(registry, token, &key)?;
    println!("{}", serde_json::to_string_pretty(&verified.claims)?);
    Ok(())
}

fn list_algorithms(registry: &MethodRegistry, policy: &TokenPolicy) {
    for alg in registry.algorithms() {
        let marker = if policy.is_allowed(&alg) {
            "allowed"
        } else {
            "disabled"
        };
        println!("{alg}\t{marker}");
    }
}

fn read_key(key_file: Option<&Path>, env_var: &str) -> Result<Zeroizing<String>> {
    match key_file {
        Some(path) => fs_guard::read_key_file(path),
        None => std::env::var(env_var)
            .map(|v| Zeroizing::new(v.trim().to_string()))
            .map_err(|_| anyhow!("no key given: pass --key-file or set {env_var}")),
    }
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .take(MAX_STDIN_BYTES + 1)
        .read_to_string(&mut buf)
        .context("reading stdin")?;
    if buf.len() as u64 > MAX_STDIN_BYTES {
        bail!("stdin exceeds {MAX_STDIN_BYTES} bytes");
    }
    Ok(buf)
}
