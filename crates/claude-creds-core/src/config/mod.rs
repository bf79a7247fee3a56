//! Resolver configuration
//!
//! - `ResolverConfig`: verbose flag, account, service descriptor, backend choice
//! - YAML file loading (`~/.config/claude-creds/config.yaml`) with env overrides

mod traits;
mod resolver_config;
mod file;

pub use traits::{ConfigError, ConfigResult};
pub use resolver_config::{
    KeychainServices, ResolverConfig, ServiceOrder, ServiceRole,
    DEFAULT_ENV_VAR, DEFAULT_KEY_PREFIX, VERBOSE_ENV, ACCOUNT_ENV, BACKEND_ENV,
};
pub use file::{default_key_file, user_config_path};
