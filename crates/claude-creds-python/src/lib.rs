//! Python bindings for claude-creds via PyO3

use std::collections::HashMap;

use pyo3::prelude::*;

use claude_creds_core::{
    mask_secret as core_mask_secret,
    ConsoleLogger,
    Credentials as CoreCredentials,
    CredentialResolver as CoreCredentialResolver,
    NoOpLogger,
    ResolverConfig,
};

/// User config with the caller's arguments on top; an invalid config falls back to defaults
fn load_config(verbose: bool, account: Option<String>) -> ResolverConfig {
    let mut config = if verbose {
        ResolverConfig::load_or_default(&ConsoleLogger::new())
    } else {
        ResolverConfig::load_or_default(&NoOpLogger::new())
    };
    config.verbose = config.verbose || verbose;
    if account.is_some() {
        config.account = account;
    }
    config
}

// ============================================================================
// ClaudeCredentials
// ============================================================================

#[pyclass(frozen)]
#[derive(Clone)]
pub struct ClaudeCredentials {
    #[pyo3(get)]
    pub api_key: Option<String>,
    #[pyo3(get)]
    pub session_token: Option<String>,
    mcp_oauth_tokens: Option<String>,
    mcp_oauth_services: Vec<String>,
}

#[pymethods]
impl ClaudeCredentials {
    /// MCP OAuth tokens as a dict, or None
    #[getter]
    fn mcp_oauth_tokens(&self, py: Python<'_>) -> PyResult<Option<Py<PyAny>>> {
        match &self.mcp_oauth_tokens {
            Some(json) => {
                let parsed = py.import("json")?.call_method1("loads", (json.as_str(),))?;
                Ok(Some(parsed.unbind()))
            }
            None => Ok(None),
        }
    }

    /// Names of the integrations that have MCP OAuth tokens
    #[getter]
    fn mcp_oauth_services(&self) -> Vec<String> {
        self.mcp_oauth_services.clone()
    }

    fn __bool__(&self) -> bool {
        self.api_key.is_some() || self.session_token.is_some() || self.mcp_oauth_tokens.is_some()
    }

    fn __repr__(&self) -> String {
        format!(
            "ClaudeCredentials(api_key={}, mcp_oauth_tokens={}, session_token={})",
            self.api_key.as_deref().map(core_mask_secret).unwrap_or_else(|| "None".into()),
            self.mcp_oauth_services.len(),
            self.session_token.as_deref().map(core_mask_secret).unwrap_or_else(|| "None".into()),
        )
    }
}

impl From<CoreCredentials> for ClaudeCredentials {
    fn from(creds: CoreCredentials) -> Self {
        let tokens = creds.auxiliary_tokens();
        Self {
            api_key: creds.api_key().map(str::to_string),
            session_token: creds.session_token().map(str::to_string),
            mcp_oauth_tokens: tokens.and_then(|t| serde_json::to_string(t).ok()),
            mcp_oauth_services: tokens.map(|t| t.keys().cloned().collect()).unwrap_or_default(),
        }
    }
}

// ============================================================================
// TokenManager
// ============================================================================

#[pyclass]
pub struct TokenManager {
    inner: CoreCredentialResolver,
}

#[pymethods]
impl TokenManager {
    #[new]
    #[pyo3(signature = (verbose=false, account=None))]
    pub fn new(verbose: bool, account: Option<String>) -> Self {
        Self {
            inner: CoreCredentialResolver::new(load_config(verbose, account)),
        }
    }

    #[getter]
    pub fn verbose(&self) -> bool {
        self.inner.config().verbose
    }

    #[getter]
    pub fn account(&self) -> Option<String> {
        self.inner.config().account.clone()
    }

    /// Environment variable first, then the keychain
    pub fn get_anthropic_api_key(&self, py: Python<'_>) -> Option<String> {
        py.allow_threads(|| self.inner.resolve_api_key())
    }

    /// (value, source) of the resolved key
    pub fn get_anthropic_api_key_with_source(&self, py: Python<'_>) -> Option<(String, String)> {
        py.allow_threads(|| self.inner.resolve_api_key_with_source())
            .map(|resolved| (resolved.value, resolved.source))
    }

    /// Everything the keychain holds, without capability checks
    #[pyo3(signature = (account=None))]
    pub fn get_claude_credentials(&self, py: Python<'_>, account: Option<&str>) -> ClaudeCredentials {
        let resolver = self.inner.for_account(account);
        py.allow_threads(|| resolver.resolve_credentials_bundle()).into()
    }

    /// Everything the keychain holds, or an empty result where it can't be reached
    pub fn discover_credentials(&self, py: Python<'_>) -> ClaudeCredentials {
        py.allow_threads(|| self.inner.discover_credentials()).into()
    }

    /// {"ANTHROPIC_API_KEY": key} when a key resolves; os.environ is not modified
    #[pyo3(signature = (account=None))]
    pub fn setup_environment(&self, py: Python<'_>, account: Option<&str>) -> HashMap<String, String> {
        let resolver = self.inner.for_account(account);
        py.allow_threads(|| resolver.setup_environment())
    }

    pub fn keychain_reachable(&self) -> bool {
        self.inner.keychain_reachable()
    }

    fn __repr__(&self) -> String {
        format!(
            "TokenManager(verbose={}, account={:?}, backend='{}')",
            self.inner.config().verbose,
            self.inner.config().account,
            self.inner.config().backend.as_str(),
        )
    }
}

// ============================================================================
// Module functions
// ============================================================================

#[pyfunction]
#[pyo3(signature = (verbose=false))]
fn get_api_key_from_keychain(py: Python<'_>, verbose: bool) -> Option<String> {
    let resolver = CoreCredentialResolver::new(load_config(verbose, None));
    py.allow_threads(|| resolver.resolve_api_key())
}

#[pyfunction]
#[pyo3(signature = (account=None, verbose=false))]
fn get_claude_credentials(py: Python<'_>, account: Option<String>, verbose: bool) -> ClaudeCredentials {
    let resolver = CoreCredentialResolver::new(load_config(verbose, account));
    py.allow_threads(|| resolver.resolve_credentials_bundle()).into()
}

#[pyfunction]
fn mask_secret(value: &str) -> String {
    core_mask_secret(value)
}

#[pymodule]
fn claude_creds(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ClaudeCredentials>()?;
    m.add_class::<TokenManager>()?;

    m.add_function(wrap_pyfunction!(get_api_key_from_keychain, m)?)?;
    m.add_function(wrap_pyfunction!(get_claude_credentials, m)?)?;
    m.add_function(wrap_pyfunction!(mask_secret, m)?)?;

    Ok(())
}
