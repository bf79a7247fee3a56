//! The credentials bundle returned by a resolution

use serde_json::{Map, Value};

/// Everything a resolution discovered
///
/// Each field is independently optional and no field implies another. A bundle is built
/// once per resolution call and not modified afterwards.
///
/// `Debug` masks the secret values so a bundle can be logged safely.
#[derive(Clone, Default, PartialEq)]
pub struct Credentials {
    api_key: Option<String>,
    auxiliary_tokens: Option<Map<String, Value>>,
    session_token: Option<String>,
}

impl Credentials {
    pub fn new(
        api_key: Option<String>,
        auxiliary_tokens: Option<Map<String, Value>>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            api_key,
            auxiliary_tokens,
            session_token,
        }
    }

    /// The bearer key for direct API calls
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// OAuth tokens for plugin integrations, keyed by integration name
    ///
    /// Reported for observability only; never a substitute for the API key.
    pub fn auxiliary_tokens(&self) -> Option<&Map<String, Value>> {
        self.auxiliary_tokens.as_ref()
    }

    /// Opaque session/encryption artifact; never a valid bearer key
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Number of integrations with auxiliary tokens
    pub fn auxiliary_token_count(&self) -> usize {
        self.auxiliary_tokens.as_ref().map_or(0, Map::len)
    }

    /// True when nothing at all was found
    pub fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.auxiliary_tokens.is_none() && self.session_token.is_none()
    }

    pub fn into_api_key(self) -> Option<String> {
        self.api_key
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_deref().map(mask_secret))
            .field(
                "auxiliary_tokens",
                &self.auxiliary_tokens.as_ref().map(|m| m.keys().collect::<Vec<_>>()),
            )
            .field("session_token", &self.session_token.as_deref().map(mask_secret))
            .finish()
    }
}

/// Render a secret for display: first 8 and last 4 characters, or `***` when the value
/// is too short to show any of it
///
/// ```
/// use claude_creds_core::mask_secret;
///
/// assert_eq!(mask_secret("sk-ant-api03-abcdefgh"), "sk-ant-a...efgh");
/// assert_eq!(mask_secret("short"), "***");
/// ```
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 12 {
        return "***".to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
