//! YAML configuration file
//!
//! Read-only: `~/.config/claude-creds/config.yaml` (XDG config dir on Linux,
//! `~/Library/Application Support` on macOS). A missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use super::resolver_config::ResolverConfig;
use super::traits::{ConfigError, ConfigResult};
use crate::logging::Logger;

/// Path of the user-level config file
pub fn user_config_path() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
    config_dir.join("claude-creds").join("config.yaml")
}

/// Where the Anthropic demos keep a hand-entered key (`~/.anthropic/api_key`)
pub fn default_key_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".anthropic").join("api_key"))
}

/// Expand a leading `~/` against the home directory
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

impl ResolverConfig {
    /// Parse a config file; every field is optional
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yaml::from_str(content)?;
        config.key_file = config.key_file.as_deref().map(expand_home);
        Ok(config)
    }

    /// Load `path` if it exists (defaults otherwise), then apply environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::load_from_with(path, |name| std::env::var(name).ok())
    }

    /// `load_from` with overrides read through `lookup`
    pub fn load_from_with<F>(path: impl AsRef<Path>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides(lookup)
    }

    /// Load the user-level config file plus environment overrides
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(user_config_path())
    }

    /// `load`, falling back to defaults when the file or an override is invalid
    pub fn load_or_default(logger: &dyn Logger) -> Self {
        Self::load_or_default_from(user_config_path(), |name| std::env::var(name).ok(), logger)
    }

    /// `load_from_with` that never fails
    ///
    /// An unreadable file is replaced by defaults with the overrides still applied; an
    /// invalid override drops every override. The error goes to `logger`.
    pub fn load_or_default_from<F>(path: impl AsRef<Path>, lookup: F, logger: &dyn Logger) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match Self::load_from_with(path, &lookup) {
            Ok(config) => config,
            Err(e) => {
                logger.warn(&format!("Ignoring configuration: {}", e));
                Self::default().apply_env_overrides(&lookup).unwrap_or_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceOrder;
    use crate::secrets::StoreBackend;
    use parking_lot::Mutex;
    use tempfile::TempDir;

    #[test]
    fn test_user_config_path() {
        let path = user_config_path();
        assert!(path.ends_with("claude-creds/config.yaml"));
    }

    #[test]
    fn test_default_key_file() {
        if let Some(path) = default_key_file() {
            assert!(path.ends_with(".anthropic/api_key"));
        }
    }

    #[test]
    fn test_from_file_partial() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "verbose: true\naccount: alice\nbackend: keyring\nservice_order: storage-first\nservices:\n  primary: Custom Service\n",
        )
        .unwrap();

        let config = ResolverConfig::from_file(&path).unwrap();
        assert!(config.verbose);
        assert_eq!(config.account.as_deref(), Some("alice"));
        assert_eq!(config.backend, StoreBackend::Keyring);
        assert_eq!(config.service_order, ServiceOrder::StorageFirst);
        assert_eq!(config.services.primary, "Custom Service");
        // unspecified nested fields keep their defaults
        assert_eq!(config.services.storage, "Claude Safe Storage");
        assert_eq!(config.env_var, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_from_file_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "").unwrap();
        assert_eq!(ResolverConfig::from_file(&path).unwrap(), ResolverConfig::default());
    }

    #[test]
    fn test_from_file_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "verbose: [not, a, bool").unwrap();
        assert!(matches!(ResolverConfig::from_file(&path), Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn test_from_file_missing() {
        let dir = TempDir::new().unwrap();
        let err = ResolverConfig::from_file(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_key_file_home_expansion() {
        let config = ResolverConfig::from_yaml("key_file: ~/.anthropic/api_key\n").unwrap();
        let key_file = config.key_file.unwrap();
        if dirs::home_dir().is_some() {
            assert!(!key_file.starts_with("~"));
        }
        assert!(key_file.ends_with(".anthropic/api_key"));
    }

    #[test]
    fn test_load_from_missing_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ResolverConfig::load_from_with(dir.path().join("absent.yaml"), |_| None).unwrap();
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn test_load_from_applies_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "account: alice\n").unwrap();

        let config = ResolverConfig::load_from_with(&path, |name| {
            (name == crate::config::BACKEND_ENV).then(|| "keyring".to_string())
        })
        .unwrap();
        assert_eq!(config.account.as_deref(), Some("alice"));
        assert_eq!(config.backend, StoreBackend::Keyring);
    }

    #[derive(Default)]
    struct Warnings(Mutex<Vec<String>>);

    impl Logger for Warnings {
        fn debug(&self, _message: &str) {}
        fn info(&self, _message: &str) {}
        fn warn(&self, message: &str) {
            self.0.lock().push(message.to_string());
        }
        fn error(&self, _message: &str) {}
    }

    #[test]
    fn test_load_or_default_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "verbose: [oops").unwrap();
        let warnings = Warnings::default();

        let config = ResolverConfig::load_or_default_from(
            &path,
            |name| (name == crate::config::ACCOUNT_ENV).then(|| "bob".to_string()),
            &warnings,
        );
        assert!(!config.verbose);
        assert_eq!(config.account.as_deref(), Some("bob"));
        assert_eq!(config.services, crate::config::KeychainServices::default());

        let logged = warnings.0.lock();
        assert_eq!(logged.len(), 1);
        assert!(logged[0].contains("Invalid YAML"));
    }

    #[test]
    fn test_load_or_default_invalid_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "account: alice\n").unwrap();
        let warnings = Warnings::default();

        let config = ResolverConfig::load_or_default_from(
            &path,
            |name| (name == crate::config::VERBOSE_ENV).then(|| "maybe".to_string()),
            &warnings,
        );
        assert_eq!(config, ResolverConfig::default());
        assert!(warnings.0.lock()[0].contains("CLAUDE_CREDS_VERBOSE"));
    }

    #[test]
    fn test_load_or_default_valid_file_is_silent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "verbose: true\n").unwrap();
        let warnings = Warnings::default();

        let config = ResolverConfig::load_or_default_from(&path, |_| None, &warnings);
        assert!(config.verbose);
        assert!(warnings.0.lock().is_empty());
    }
}
