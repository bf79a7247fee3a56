//! Anthropic credential resolution
//!
//! Sources, in priority order:
//! 1. The `ANTHROPIC_API_KEY` environment variable
//! 2. An optional key file
//! 3. The OS keychain, when this runtime can reach it:
//!    `Claude Code` (raw key), then `Claude Code-credentials` (JSON document) and
//!    `Claude Safe Storage` (session artifact) in the configured order

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::sync::Arc;

use crate::capability::{CapabilityProbe, HostProbe};
use crate::config::{ResolverConfig, ServiceRole};
use crate::credentials::{mask_secret, Credentials};
use crate::extract::{
    extract_api_key, extract_auxiliary_tokens, parse_document, KeyExtractor, DEFAULT_KEY_EXTRACTORS,
};
use crate::logging::{ConsoleLogger, NoOpLogger, SharedLogger};
use crate::secrets::{EnvSecretStore, SecretStore, SecretStoreError};
use crate::{log_debug, log_info, log_warn};

/// A resolved key together with where it came from
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    /// The secret value
    pub value: String,
    /// Which source provided the secret (`environment`, `key_file`, `keychain:<service>`)
    pub source: String,
    /// Human-readable source description
    pub source_detail: String,
}

impl std::fmt::Debug for ResolvedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecret")
            .field("value", &mask_secret(&self.value))
            .field("source", &self.source)
            .field("source_detail", &self.source_detail)
            .finish()
    }
}

/// Bundle plus the service that produced its key, if any
struct KeychainScan {
    credentials: Credentials,
    key_service: Option<String>,
}

/// Resolves an Anthropic API key from the environment and the OS keychain
///
/// Read-only and stateless between calls: every call re-runs the whole priority chain,
/// and nothing is cached. Lookup failures never surface as errors, they only make a
/// source count as empty.
///
/// # Example
///
/// ```no_run
/// use claude_creds_core::{CredentialResolver, ResolverConfig};
///
/// let resolver = CredentialResolver::new(ResolverConfig::new().with_verbose(true));
/// match resolver.resolve_api_key() {
///     Some(_key) => println!("ready"),
///     None => eprintln!("set ANTHROPIC_API_KEY or sign in to Claude Code"),
/// }
/// ```
pub struct CredentialResolver {
    config: ResolverConfig,
    env: EnvSecretStore,
    store: Arc<dyn SecretStore>,
    probe: Arc<dyn CapabilityProbe>,
    logger: SharedLogger,
    extractors: Vec<KeyExtractor>,
}

impl CredentialResolver {
    /// Create a resolver for the real host: process environment, the configured store
    /// backend and the host capability probe
    pub fn new(config: ResolverConfig) -> Self {
        let logger: SharedLogger = if config.verbose {
            Arc::new(ConsoleLogger::new())
        } else {
            Arc::new(NoOpLogger::new())
        };
        Self {
            store: config.backend.create(),
            env: EnvSecretStore::new(),
            probe: Arc::new(HostProbe::new()),
            logger,
            extractors: DEFAULT_KEY_EXTRACTORS.to_vec(),
            config,
        }
    }

    /// Replace the secret store
    pub fn with_store(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.store = store;
        self
    }

    /// Replace the environment source
    pub fn with_env(mut self, env: EnvSecretStore) -> Self {
        self.env = env;
        self
    }

    /// Replace the capability probe
    pub fn with_probe(mut self, probe: Arc<dyn CapabilityProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Replace the diagnostics sink chosen from `verbose`
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Replace the ordered list of credentials-document key locations
    pub fn with_extractors(mut self, extractors: Vec<KeyExtractor>) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Same sources and sinks, scoped to `account` (`None` keeps the configured one)
    pub fn for_account(&self, account: Option<&str>) -> Self {
        let mut config = self.config.clone();
        if let Some(account) = account {
            config.account = Some(account.to_string());
        }
        Self {
            config,
            env: self.env.clone(),
            store: Arc::clone(&self.store),
            probe: Arc::clone(&self.probe),
            logger: Arc::clone(&self.logger),
            extractors: self.extractors.clone(),
        }
    }

    /// Best available API key, or `None`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with_source().map(|resolved| resolved.value)
    }

    /// Best available API key with its provenance
    pub fn resolve_api_key_with_source(&self) -> Option<ResolvedSecret> {
        let env_var = &self.config.env_var;
        if let Some(value) = self.env.var(env_var) {
            log_info!(self.logger, "Using {} from environment", env_var);
            return Some(ResolvedSecret {
                value,
                source: "environment".to_string(),
                source_detail: format!("Environment variable ${}", env_var),
            });
        }

        if let Some(resolved) = self.read_key_file() {
            return Some(resolved);
        }

        if !self.keychain_reachable() {
            log_debug!(self.logger, "No API key found in environment; keychain not reachable here");
            return None;
        }

        let scan = self.scan_keychain();
        match (scan.credentials.into_api_key(), scan.key_service) {
            (Some(value), Some(service)) => {
                log_info!(self.logger, "Retrieved API key from keychain");
                Some(ResolvedSecret {
                    value,
                    source: format!("keychain:{}", service),
                    source_detail: format!("Keychain service \"{}\"", service),
                })
            }
            _ => {
                log_debug!(self.logger, "No API key found in environment or keychain");
                None
            }
        }
    }

    /// Query the keychain services and return everything found
    ///
    /// Does not consult the environment or the capability probes; see
    /// `discover_credentials` for the gated variant.
    pub fn resolve_credentials_bundle(&self) -> Credentials {
        self.scan_keychain().credentials
    }

    /// `resolve_credentials_bundle`, but only when this runtime can reach the keychain;
    /// an empty bundle otherwise
    pub fn discover_credentials(&self) -> Credentials {
        if self.keychain_reachable() {
            self.resolve_credentials_bundle()
        } else {
            Credentials::default()
        }
    }

    /// Environment variables to hand to a child process: `{ANTHROPIC_API_KEY: key}` when a
    /// key resolves, empty otherwise. The current process environment is left untouched.
    pub fn setup_environment(&self) -> HashMap<String, String> {
        let mut env_vars = HashMap::new();
        if let Some(key) = self.resolve_api_key() {
            log_debug!(self.logger, "{} configured ({})", self.config.env_var, mask_secret(&key));
            env_vars.insert(self.config.env_var.clone(), key);
        }
        env_vars
    }

    /// Capability gate: native access available, and the store works on this OS
    pub fn keychain_reachable(&self) -> bool {
        if !self.probe.has_native_capability() {
            log_debug!(self.logger, "Restricted runtime detected; skipping keychain");
            return false;
        }
        match self.probe.os_family() {
            Some(os) if self.store.supports_os(&os) => true,
            Some(os) => {
                log_debug!(self.logger, "{} store is not supported on {}", self.store.name(), os);
                false
            }
            None => {
                log_debug!(self.logger, "Unknown OS family; skipping keychain");
                false
            }
        }
    }

    fn read_key_file(&self) -> Option<ResolvedSecret> {
        let path = self.config.key_file.as_ref()?;
        match fs::read_to_string(path) {
            Ok(content) => {
                let value = content.trim();
                if value.is_empty() {
                    log_debug!(self.logger, "Key file {} is empty", path.display());
                    return None;
                }
                log_info!(self.logger, "Using API key from {}", path.display());
                Some(ResolvedSecret {
                    value: value.to_string(),
                    source: "key_file".to_string(),
                    source_detail: format!("Key file {}", path.display()),
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                log_warn!(self.logger, "Could not read key file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// One isolated lookup; every failure is logged and becomes `None`
    fn query(&self, role: ServiceRole) -> Option<String> {
        let service = self.config.services.name(role);
        let account = if role.account_scoped() {
            self.config.account.as_deref()
        } else {
            None
        };

        match self.store.lookup(service, account) {
            Ok(value) => {
                log_debug!(self.logger, "Successfully retrieved credential from service: {}", service);
                Some(value)
            }
            Err(SecretStoreError::NotFound(_)) => {
                log_debug!(self.logger, "No credential found for service: {}", service);
                None
            }
            Err(e) => {
                log_debug!(self.logger, "Error accessing keychain for {}: {}", service, e);
                None
            }
        }
    }

    fn scan_keychain(&self) -> KeychainScan {
        let mut api_key = None;
        let mut key_service = None;
        let mut auxiliary_tokens = None;
        let mut session_token = None;

        for role in self.config.service_order.sequence() {
            let service = self.config.services.name(role);
            match role {
                ServiceRole::Primary => {
                    let Some(value) = self.query(role) else { continue };
                    if value.starts_with(&self.config.key_prefix) {
                        log_debug!(self.logger, "Found Anthropic API key in {} keychain service", service);
                        api_key = Some(value);
                        key_service = Some(service.to_string());
                        break;
                    }
                    log_debug!(self.logger, "Value in {} does not look like an API key; ignoring", service);
                }
                ServiceRole::Credentials => {
                    let Some(raw) = self.query(role) else { continue };
                    let doc = match parse_document(&raw) {
                        Ok(doc) => doc,
                        Err(e) => {
                            log_debug!(self.logger, "Could not parse {} as credentials JSON: {}", service, e);
                            continue;
                        }
                    };
                    auxiliary_tokens = extract_auxiliary_tokens(&doc);
                    if let Some(tokens) = &auxiliary_tokens {
                        log_debug!(self.logger, "Found MCP OAuth tokens for {} services", tokens.len());
                    }
                    if let Some(key) = extract_api_key(&doc, &self.extractors) {
                        log_debug!(self.logger, "Found API key in {} document", service);
                        api_key = Some(key);
                        key_service = Some(service.to_string());
                        break;
                    }
                }
                ServiceRole::Storage => {
                    let Some(value) = self.query(role) else { continue };
                    if api_key.is_none() {
                        session_token = Some(value);
                    }
                }
            }
        }

        KeychainScan {
            credentials: Credentials::new(api_key, auxiliary_tokens, session_token),
            key_service,
        }
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("config", &self.config)
            .field("store", &self.store.name())
            .field("extractors", &self.extractors.len())
            .finish()
    }
}

/// Resolve an API key for `config` on the real host
pub fn resolve_api_key(config: &ResolverConfig) -> Option<String> {
    CredentialResolver::new(config.clone()).resolve_api_key()
}

/// Query the keychain services for `config` without capability gating
pub fn resolve_credentials_bundle(config: &ResolverConfig) -> Credentials {
    CredentialResolver::new(config.clone()).resolve_credentials_bundle()
}

/// Query the keychain services for `config` if this runtime can reach them
pub fn discover_credentials(config: &ResolverConfig) -> Credentials {
    CredentialResolver::new(config.clone()).discover_credentials()
}
