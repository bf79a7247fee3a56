//! claude-creds core
//!
//! Best-effort, read-only discovery of Anthropic credentials for constructing API
//! clients. Checks `ANTHROPIC_API_KEY` first, then, when the runtime allows it, the
//! keychain entries Claude Code maintains:
//!
//! - `Claude Code`: the raw API key
//! - `Claude Code-credentials`: a JSON document with MCP OAuth tokens and possibly a key
//! - `Claude Safe Storage`: an opaque session artifact
//!
//! "Not found" is never an error. Callers get `None` or an empty bundle and decide
//! for themselves whether that is fatal.
//!
//! ```rust,no_run
//! use claude_creds_core::{resolve_api_key, discover_credentials, NoOpLogger, ResolverConfig};
//!
//! let config = ResolverConfig::load_or_default(&NoOpLogger::new());
//! let key = resolve_api_key(&config);
//!
//! let bundle = discover_credentials(&config);
//! println!("{} MCP integrations", bundle.auxiliary_token_count());
//! ```

pub mod logging;
pub mod secrets;
pub mod config;
pub mod capability;
pub mod credentials;
pub mod extract;
pub mod resolver;

pub use secrets::{
    SecretStore, SecretStoreError, SecretStoreResult, StoreBackend,
    EnvSecretStore, MemorySecretStore, KeychainSecretStore, SecurityCliStore,
};

pub use logging::{Logger, SharedLogger, NoOpLogger, ConsoleLogger};

pub use config::{
    ResolverConfig, KeychainServices, ServiceOrder, ServiceRole, ConfigError, ConfigResult,
    default_key_file, user_config_path,
};

pub use capability::{CapabilityProbe, HostProbe, StaticProbe};

pub use credentials::{Credentials, mask_secret};

pub use extract::{KeyExtractor, DocumentError, DEFAULT_KEY_EXTRACTORS};

pub use resolver::{
    CredentialResolver, ResolvedSecret,
    resolve_api_key, resolve_credentials_bundle, discover_credentials,
};
