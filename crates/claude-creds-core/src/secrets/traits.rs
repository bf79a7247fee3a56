//! Core traits and types for secret lookup

use thiserror::Error;

/// Errors a single store lookup can produce
///
/// The resolver treats every variant as "this source produced nothing"; the variants
/// only exist so the reason can be logged and tested.
#[derive(Error, Debug)]
pub enum SecretStoreError {
    #[error("No secret stored for service '{0}'")]
    NotFound(String),

    #[error("Store not available: {0}")]
    NotAvailable(String),

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Secret for service '{0}' is not valid UTF-8")]
    InvalidUtf8(String),

    #[error("Store error: {0}")]
    Other(String),
}

impl SecretStoreError {
    pub fn not_found(service: impl Into<String>) -> Self {
        Self::NotFound(service.into())
    }

    /// Whether this is a plain miss rather than a fault
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type SecretStoreResult<T> = Result<T, SecretStoreError>;

/// Read-only accessor for a per-user credential store
///
/// Implementations:
/// - `SecurityCliStore`: macOS `security` command line tool
/// - `KeychainSecretStore`: native keychain via the `keyring` crate
/// - `MemorySecretStore`: in-memory, for tests and embedding
/// - `EnvSecretStore`: process environment, keyed by variable name
///
/// # Example
///
/// ```
/// use claude_creds_core::secrets::{SecretStore, MemorySecretStore};
///
/// let store = MemorySecretStore::new();
/// store.insert("Claude Code", None, "sk-ant-example");
/// assert_eq!(store.get("Claude Code", None), Some("sk-ant-example".to_string()));
/// ```
pub trait SecretStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Whether this store can work on the given OS family (`std::env::consts::OS` values)
    fn supports_os(&self, _os: &str) -> bool {
        true
    }

    /// Look up the secret stored under `service`, optionally scoped to `account`
    ///
    /// Blocking. A missing entry is `Err(SecretStoreError::NotFound)`.
    fn lookup(&self, service: &str, account: Option<&str>) -> SecretStoreResult<String>;

    /// Like `lookup`, with every failure collapsed to `None`
    fn get(&self, service: &str, account: Option<&str>) -> Option<String> {
        self.lookup(service, account).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_helpers() {
        let err = SecretStoreError::not_found("Claude Code");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "No secret stored for service 'Claude Code'");

        let err = SecretStoreError::NotAvailable("locked".into());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_spawn_error_message() {
        let err = SecretStoreError::Spawn {
            program: "security".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().starts_with("Failed to spawn 'security'"));
    }
}
