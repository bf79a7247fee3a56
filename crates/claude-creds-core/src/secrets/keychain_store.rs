//! Native keychain lookup through the `keyring` crate
//!
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet)

use keyring::Entry;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};
use crate::logging::file_logger as log;

/// Secret store backed by the platform's native credential manager
///
/// Native APIs address entries by `(service, user)`, so when no account is given the
/// current login name is used. Entries written without that account (Claude Code's
/// storage entries, for one) are only reachable through `SecurityCliStore` on macOS.
#[derive(Debug, Clone, Default)]
pub struct KeychainSecretStore;

impl KeychainSecretStore {
    pub fn new() -> Self {
        Self
    }
}

fn account_for(account: Option<&str>) -> Option<String> {
    account.map(str::to_string).or_else(current_user)
}

/// Login name of the current user, if the environment exposes one
fn current_user() -> Option<String> {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
}

impl SecretStore for KeychainSecretStore {
    fn name(&self) -> &str {
        "keychain"
    }

    fn supports_os(&self, os: &str) -> bool {
        matches!(os, "macos" | "windows" | "linux")
    }

    fn lookup(&self, service: &str, account: Option<&str>) -> SecretStoreResult<String> {
        let user = account_for(account).ok_or_else(|| {
            SecretStoreError::NotAvailable("no account given and no current user".to_string())
        })?;
        log::debug(
            "KeychainSecretStore",
            &format!("lookup service='{}', account='{}'", service, user),
        );

        let entry = Entry::new(service, &user).map_err(|e| {
            log::error("KeychainSecretStore", &format!("entry creation failed: {:?}", e));
            SecretStoreError::NotAvailable(e.to_string())
        })?;

        match entry.get_password() {
            Ok(password) if password.trim().is_empty() => Err(SecretStoreError::not_found(service)),
            Ok(password) => {
                log::info("KeychainSecretStore", &format!("found, value len={}", password.len()));
                Ok(password.trim().to_string())
            }
            Err(keyring::Error::NoEntry) => {
                log::debug("KeychainSecretStore", "NoEntry");
                Err(SecretStoreError::not_found(service))
            }
            Err(keyring::Error::BadEncoding(_)) => Err(SecretStoreError::InvalidUtf8(service.to_string())),
            Err(keyring::Error::NoStorageAccess(e)) => {
                log::warn("KeychainSecretStore", &format!("no storage access: {:?}", e));
                Err(SecretStoreError::NotAvailable(e.to_string()))
            }
            Err(e) => {
                log::warn("KeychainSecretStore", &format!("get_password error: {:?}", e));
                Err(SecretStoreError::Other(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_and_os_support() {
        let store = KeychainSecretStore::new();
        assert_eq!(store.name(), "keychain");
        assert!(store.supports_os("macos"));
        assert!(store.supports_os("linux"));
        assert!(store.supports_os("windows"));
        assert!(!store.supports_os("freebsd"));
    }

    #[test]
    fn test_account_precedence() {
        assert_eq!(account_for(Some("explicit")), Some("explicit".to_string()));
        assert_eq!(account_for(None), current_user());
    }

    #[test]
    #[ignore] // Requires system keychain
    fn test_missing_entry_is_not_found() {
        let store = KeychainSecretStore::new();
        let err = store
            .lookup("claude-creds-test-missing-service", Some("claude-creds-test"))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
