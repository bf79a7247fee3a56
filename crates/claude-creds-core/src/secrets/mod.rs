//! Read-only secret lookup backends
//!
//! - `SecretStore` trait, one blocking lookup per `(service, account)`
//! - `SecurityCliStore`: macOS `security` tool (default backend)
//! - `KeychainSecretStore`: native keychain via `keyring`
//! - `MemorySecretStore`: in-memory, counts lookups
//! - `EnvSecretStore`: environment variables

mod traits;
mod env_store;
mod memory_store;
mod keychain_store;
mod security_cli_store;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use traits::{SecretStore, SecretStoreError, SecretStoreResult};
pub use env_store::EnvSecretStore;
pub use memory_store::MemorySecretStore;
pub use keychain_store::KeychainSecretStore;
pub use security_cli_store::SecurityCliStore;

/// Which OS store backend a resolver queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreBackend {
    /// `security find-generic-password` (macOS)
    #[default]
    SecurityCli,
    /// Native credential manager through `keyring`
    Keyring,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::SecurityCli => "security-cli",
            StoreBackend::Keyring => "keyring",
        }
    }

    /// Parse a backend name, `None` if unknown
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "security-cli" | "security" | "security_cli" => Some(StoreBackend::SecurityCli),
            "keyring" | "keychain" | "native" => Some(StoreBackend::Keyring),
            _ => None,
        }
    }

    /// Construct the store for this backend
    pub fn create(&self) -> Arc<dyn SecretStore> {
        match self {
            StoreBackend::SecurityCli => Arc::new(SecurityCliStore::new()),
            StoreBackend::Keyring => Arc::new(KeychainSecretStore::new()),
        }
    }
}
