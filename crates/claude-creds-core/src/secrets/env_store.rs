//! Environment variable lookup

use std::collections::HashMap;
use std::env;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};

/// Reads secrets from environment variables, keyed by variable name
///
/// Empty values count as unset. The account argument is ignored.
///
/// By default the live process environment is read on every lookup; `with_vars` pins a
/// fixed snapshot instead, which keeps tests independent of the real environment.
///
/// # Example
///
/// ```
/// use claude_creds_core::secrets::EnvSecretStore;
///
/// let env = EnvSecretStore::with_vars([("ANTHROPIC_API_KEY", "sk-ant-test")]);
/// assert_eq!(env.var("ANTHROPIC_API_KEY"), Some("sk-ant-test".to_string()));
/// assert_eq!(env.var("OPENAI_API_KEY"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore {
    snapshot: Option<HashMap<String, String>>,
}

impl EnvSecretStore {
    /// Read from the process environment
    pub fn new() -> Self {
        Self { snapshot: None }
    }

    /// Read from a fixed set of variables
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            snapshot: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Value of `name`, or `None` when unset, empty, or not valid unicode
    pub fn var(&self, name: &str) -> Option<String> {
        let value = match &self.snapshot {
            Some(vars) => vars.get(name).cloned(),
            None => env::var(name).ok(),
        };
        value.filter(|v| !v.is_empty())
    }
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn lookup(&self, service: &str, _account: Option<&str>) -> SecretStoreResult<String> {
        self.var(service)
            .ok_or_else(|| SecretStoreError::not_found(service))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_store_name() {
        assert_eq!(EnvSecretStore::new().name(), "env");
    }

    #[test]
    fn test_env_store_works_on_every_os() {
        let store = EnvSecretStore::new();
        for os in ["macos", "linux", "windows", "freebsd"] {
            assert!(store.supports_os(os), "{}", os);
        }
    }

    #[test]
    fn test_snapshot_lookup() {
        let store = EnvSecretStore::with_vars([("KEY", "value"), ("EMPTY", "")]);

        assert_eq!(store.lookup("KEY", None).unwrap(), "value");
        assert_eq!(store.get("KEY", Some("ignored")), Some("value".to_string()));
        assert!(store.lookup("EMPTY", None).unwrap_err().is_not_found());
        assert!(store.lookup("MISSING", None).unwrap_err().is_not_found());
    }

    #[test]
    fn test_snapshot_ignores_process_env() {
        // PATH is set in any test environment
        let store = EnvSecretStore::with_vars(Vec::<(String, String)>::new());
        assert_eq!(store.var("PATH"), None);
    }

    #[test]
    fn test_process_env_lookup() {
        let store = EnvSecretStore::new();
        assert!(store.var("PATH").is_some());
        assert_eq!(store.var("CLAUDE_CREDS_SURELY_UNSET_VAR_7731"), None);
    }
}
