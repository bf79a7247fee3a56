//! Resolver configuration and the keychain service descriptor

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::traits::{ConfigError, ConfigResult};
use crate::secrets::StoreBackend;

/// Environment variable checked before any store
pub const DEFAULT_ENV_VAR: &str = "ANTHROPIC_API_KEY";

/// Prefix every Anthropic API key starts with
pub const DEFAULT_KEY_PREFIX: &str = "sk-ant-";

pub const VERBOSE_ENV: &str = "CLAUDE_CREDS_VERBOSE";
pub const ACCOUNT_ENV: &str = "CLAUDE_CREDS_ACCOUNT";
pub const BACKEND_ENV: &str = "CLAUDE_CREDS_BACKEND";

/// Keychain service names Claude Code writes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeychainServices {
    /// Holds the raw API key
    pub primary: String,
    /// Holds the JSON document with OAuth tokens (and sometimes a key)
    pub credentials: String,
    /// Holds an opaque encryption/session artifact
    pub storage: String,
}

impl Default for KeychainServices {
    fn default() -> Self {
        Self {
            primary: "Claude Code".to_string(),
            credentials: "Claude Code-credentials".to_string(),
            storage: "Claude Safe Storage".to_string(),
        }
    }
}

impl KeychainServices {
    pub fn name(&self, role: ServiceRole) -> &str {
        match role {
            ServiceRole::Primary => &self.primary,
            ServiceRole::Credentials => &self.credentials,
            ServiceRole::Storage => &self.storage,
        }
    }
}

/// What a keychain service is expected to contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRole {
    Primary,
    Credentials,
    Storage,
}

impl ServiceRole {
    /// Whether lookups pass the configured account; the storage entry is shared by
    /// every account and is always looked up without one
    pub fn account_scoped(&self) -> bool {
        !matches!(self, ServiceRole::Storage)
    }
}

/// Order of the two fallback services after the primary one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceOrder {
    /// OAuth credentials document, then storage
    #[default]
    CredentialsFirst,
    /// Storage, then OAuth credentials document
    StorageFirst,
}

impl ServiceOrder {
    /// All services in query order
    pub fn sequence(&self) -> [ServiceRole; 3] {
        match self {
            ServiceOrder::CredentialsFirst => {
                [ServiceRole::Primary, ServiceRole::Credentials, ServiceRole::Storage]
            }
            ServiceOrder::StorageFirst => {
                [ServiceRole::Primary, ServiceRole::Storage, ServiceRole::Credentials]
            }
        }
    }
}

/// Everything a `CredentialResolver` needs to know up front
///
/// Deserializes from YAML with every field optional:
///
/// ```yaml
/// verbose: true
/// account: alice
/// backend: keyring
/// service_order: storage-first
/// key_file: ~/.anthropic/api_key
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Print `[TokenManager]` diagnostics
    pub verbose: bool,
    /// Keychain account; `None` matches any account
    pub account: Option<String>,
    /// Environment variable that overrides every store
    pub env_var: String,
    /// Prefix a raw primary-service value must have to count as a key
    pub key_prefix: String,
    pub services: KeychainServices,
    pub service_order: ServiceOrder,
    pub backend: StoreBackend,
    /// File holding a key, checked after the environment variable; off when `None`
    pub key_file: Option<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            account: None,
            env_var: DEFAULT_ENV_VAR.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            services: KeychainServices::default(),
            service_order: ServiceOrder::default(),
            backend: StoreBackend::default(),
            key_file: None,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_env_var(mut self, name: impl Into<String>) -> Self {
        self.env_var = name.into();
        self
    }

    pub fn with_services(mut self, services: KeychainServices) -> Self {
        self.services = services;
        self
    }

    pub fn with_service_order(mut self, order: ServiceOrder) -> Self {
        self.service_order = order;
        self
    }

    pub fn with_backend(mut self, backend: StoreBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_file = Some(path.into());
        self
    }

    /// Apply `CLAUDE_CREDS_VERBOSE`, `CLAUDE_CREDS_ACCOUNT` and `CLAUDE_CREDS_BACKEND`
    /// as read through `lookup`
    pub fn apply_env_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(VERBOSE_ENV) {
            self.verbose = parse_bool(VERBOSE_ENV, &value)?;
        }
        if let Some(account) = lookup(ACCOUNT_ENV).filter(|a| !a.is_empty()) {
            self.account = Some(account);
        }
        if let Some(value) = lookup(BACKEND_ENV) {
            self.backend = StoreBackend::parse(&value).ok_or_else(|| ConfigError::Invalid {
                name: BACKEND_ENV.to_string(),
                value,
            })?;
        }
        Ok(self)
    }
}

fn parse_bool(name: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}
