//! Signing-method registry.
//!
//! The `MethodRegistry` is the dispatch table that maps algorithm names to
//! factories producing [`SigningMethod`] instances. The token code looks a
//! method up by the `alg` header on every encode and decode; it never names
//! a concrete algorithm.
//!
//! ## Lifecycle
//!
//! The registry is an explicit value, built during application wiring and
//! then shared immutably. Registration needs `&mut self`, so every
//! registration happens-before any lookup that goes through a shared
//! reference. There is no unregistration.
//!
//! ## Name collisions
//!
//! Registering a name that is already present replaces the earlier factory
//! (last registration wins). The displaced factory is returned to the
//! caller and the replacement is logged at `warn`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::errors::SigningError;
use super::methods::{eddsa::EdDsa, hmac::Hs256};
use super::SigningMethod;
use crate::policy::TokenPolicy;

/// Produces a signing method for a registered algorithm name.
pub type MethodFactory = Arc<dyn Fn() -> Arc<dyn SigningMethod> + Send + Sync>;

/// Registry mapping algorithm names to signing-method factories.
#[derive(Clone, Default)]
pub struct MethodRegistry {
    factories: HashMap<String, MethodFactory>,
}

impl MethodRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers `factory` under `name`.
    ///
    /// If `name` was already registered, the new factory replaces the old
    /// one and the old one is returned.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Option<MethodFactory>
    where
        F: Fn() -> Arc<dyn SigningMethod> + Send + Sync + 'static,
    {
        let name = name.into();
        let previous = self.factories.insert(name.clone(), Arc::new(factory));
        if previous.is_some() {
            tracing::warn!(
                algorithm = %name,
                "signing method registered twice; previous factory replaced"
            );
        } else {
            tracing::debug!(algorithm = %name, "registered signing method");
        }
        previous
    }

    /// Registers a single shared instance of `method` under its own
    /// algorithm name.
    pub fn register_method<M>(&mut self, method: M) -> Option<MethodFactory>
    where
        M: SigningMethod + 'static,
    {
        let name = method.algorithm_name();
        let shared: Arc<dyn SigningMethod> = Arc::new(method);
        self.register(name, move || Arc::clone(&shared))
    }

    /// Looks up and instantiates the signing method registered under `name`.
    pub fn method(&self, name: &str) -> Result<Arc<dyn SigningMethod>, SigningError> {
        let factory = self.factories.get(name).ok_or_else(|| {
            tracing::debug!(algorithm = %name, "no signing method registered");
            SigningError::UnknownAlgorithm(name.to_string())
        })?;
        Ok(factory())
    }

    /// Returns `true` if a signing method is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns all registered algorithm names, sorted.
    pub fn algorithms(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Checks the registry against a token policy. Returns a warning for
    /// every policy algorithm with no registered method, and for every
    /// factory whose method reports a different name than the one it is
    /// registered under. Call at startup, after all registrations.
    pub fn validate_policy(&self, policy: &TokenPolicy) -> Vec<RegistryWarning> {
        let mut warnings = Vec::new();

        if !self.contains(&policy.default_algorithm) {
            warnings.push(RegistryWarning {
                algorithm: policy.default_algorithm.clone(),
                reason: "default algorithm has no registered signing method".into(),
            });
        }
        if !policy.is_allowed(&policy.default_algorithm) {
            warnings.push(RegistryWarning {
                algorithm: policy.default_algorithm.clone(),
                reason: "default algorithm is not in the allowed list".into(),
            });
        }

        for alg in &policy.allowed_algorithms {
            if !self.contains(alg) {
                warnings.push(RegistryWarning {
                    algorithm: alg.clone(),
                    reason: "allowed algorithm has no registered signing method".into(),
                });
            }
        }

        for name in self.algorithms() {
            if let Some(factory) = self.factories.get(&name) {
                let reported = factory().algorithm_name();
                if reported != name {
                    warnings.push(RegistryWarning {
                        algorithm: name.clone(),
                        reason: format!("registered method reports algorithm name '{reported}'"),
                    });
                }
            }
        }

        warnings
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("algorithms", &self.algorithms())
            .finish()
    }
}

/// Warning produced by [`MethodRegistry::validate_policy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryWarning {
    /// The algorithm name involved.
    pub algorithm: String,
    /// Why the configuration is unusable or suspicious.
    pub reason: String,
}

impl fmt::Display for RegistryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "algorithm '{}': {}", self.algorithm, self.reason)
    }
}

/// Builds a registry holding only the built-in methods (`HS256`, `EdDSA`).
///
/// Applications add further algorithms to the returned registry before
/// sharing it.
pub fn default_registry() -> MethodRegistry {
    let mut registry = MethodRegistry::new();
    registry.register_method(Hs256);
    registry.register_method(EdDsa);
    registry
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::jws::keys::{KeyFamily, SigningKey, VerifyingKey};

    /// A method that reports a fixed name and never verifies anything.
    struct Named(&'static str);

    impl SigningMethod for Named {
        fn algorithm_name(&self) -> &'static str {
            self.0
        }

        fn key_family(&self) -> KeyFamily {
            KeyFamily::Hmac
        }

        fn sign(&self, _signing_input: &str, _key: &SigningKey) -> Result<Vec<u8>, SigningError> {
            Ok(self.0.as_bytes().to_vec())
        }

        fn verify(
            &self,
            _signing_input: &str,
            _signature: &[u8],
            _key: &VerifyingKey,
        ) -> Result<(), SigningError> {
            Err(SigningError::VerificationMismatch {
                algorithm: self.0.into(),
            })
        }
    }

    #[test]
    fn default_registry_has_builtins_only() {
        let reg = default_registry();
        assert_eq!(reg.algorithms(), vec!["EdDSA".to_string(), "HS256".to_string()]);
        assert!(!reg.contains("ES256K"));
    }

    #[test]
    fn unknown_algorithm_returns_error() {
        let reg = default_registry();
        let err = reg.method("RS256").err().unwrap();
        assert_eq!(err, SigningError::UnknownAlgorithm("RS256".into()));
    }

    #[test]
    fn none_algorithm_is_never_registered() {
        let reg = default_registry();
        assert!(reg.method("none").is_err());
    }

    #[test]
    fn empty_registry_supports_nothing() {
        let reg = MethodRegistry::new();
        assert!(reg.algorithms().is_empty());
        assert!(reg.method("EdDSA").is_err());
    }

    #[test]
    fn lookup_returns_registered_method() {
        let mut reg = MethodRegistry::new();
        assert!(reg
            .register("X-TEST", || Arc::new(Named("X-TEST")) as Arc<dyn SigningMethod>)
            .is_none());
        let method = reg.method("X-TEST").unwrap();
        assert_eq!(method.algorithm_name(), "X-TEST");
    }

    #[test]
    fn last_registration_wins_and_returns_previous() {
        let mut reg = MethodRegistry::new();
        reg.register("X-TEST", || Arc::new(Named("first")) as Arc<dyn SigningMethod>);
        let previous = reg
            .register("X-TEST", || Arc::new(Named("second")) as Arc<dyn SigningMethod>)
            .unwrap();

        assert_eq!(previous().algorithm_name(), "first");
        assert_eq!(reg.method("X-TEST").unwrap().algorithm_name(), "second");
        assert_eq!(reg.algorithms().len(), 1);
    }

    #[test]
    fn register_method_shares_one_instance() {
        let mut reg = MethodRegistry::new();
        reg.register_method(Named("SHARED"));
        let a = reg.method("SHARED").unwrap();
        let b = reg.method("SHARED").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn registry_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MethodRegistry>();
    }

    #[test]
    fn validate_policy_warns_for_unregistered_default() {
        let reg = default_registry();
        let warnings = reg.validate_policy(&TokenPolicy::default());
        // ES256K is the default but is not a built-in.
        assert!(warnings.iter().any(|w| w.algorithm == "ES256K"));
        assert!(warnings
            .iter()
            .all(|w| !w.reason.contains("not in the allowed list")));
    }

    #[test]
    fn validate_policy_warns_for_name_mismatch() {
        let mut reg = default_registry();
        reg.register("ALIAS", || Arc::new(Named("REAL")) as Arc<dyn SigningMethod>);
        let policy = TokenPolicy {
            default_algorithm: "EdDSA".into(),
            allowed_algorithms: vec!["EdDSA".into()],
            ..TokenPolicy::default()
        };
        let warnings = reg.validate_policy(&policy);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].algorithm, "ALIAS");
        assert!(warnings[0].reason.contains("REAL"));
    }

    #[test]
    fn validate_policy_warns_for_disallowed_default() {
        let reg = default_registry();
        let policy = TokenPolicy {
            default_algorithm: "HS256".into(),
            allowed_algorithms: vec!["EdDSA".into()],
            ..TokenPolicy::default()
        };
        let warnings = reg.validate_policy(&policy);
        assert!(warnings
            .iter()
            .any(|w| w.reason.contains("not in the allowed list")));
    }
}
