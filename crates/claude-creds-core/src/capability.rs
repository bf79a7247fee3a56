//! Runtime capability probes
//!
//! The resolver asks two questions before touching a secret store: can this context
//! spawn processes or call native APIs at all, and which OS family is it running on.
//! Both probes are pure reads and never panic.

use std::env::{self, VarError};

/// Environment variables that mark a restricted runtime, with the values that mean
/// "restricted". An empty value list matches any non-empty value.
const SANDBOX_MARKERS: &[(&str, &[&str])] = &[
    ("NEXT_RUNTIME", &["edge"]),
    ("CLAUDE_CREDS_SANDBOXED", &[]),
];

/// Answers the capability questions the resolver gates on
pub trait CapabilityProbe: Send + Sync {
    /// Whether process spawning / native store access is available here
    fn has_native_capability(&self) -> bool;

    /// OS family identifier (`std::env::consts::OS` values), `None` when unknown
    fn os_family(&self) -> Option<String>;
}

/// Probe for the real host
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProbe;

impl HostProbe {
    pub fn new() -> Self {
        Self
    }
}

/// Evaluate the sandbox markers against `read`
///
/// A marker whose value can't be read (`NotUnicode`) counts as restricted.
fn markers_allow_native<F>(read: F) -> bool
where
    F: Fn(&str) -> Result<String, VarError>,
{
    for &(name, restricted_values) in SANDBOX_MARKERS {
        match read(name) {
            Ok(value) if value.is_empty() => {}
            Ok(value) => {
                if restricted_values.is_empty()
                    || restricted_values.iter().any(|r| value.eq_ignore_ascii_case(r))
                {
                    return false;
                }
            }
            Err(VarError::NotPresent) => {}
            Err(VarError::NotUnicode(_)) => return false,
        }
    }
    true
}

impl CapabilityProbe for HostProbe {
    fn has_native_capability(&self) -> bool {
        if cfg!(target_family = "wasm") {
            return false;
        }
        markers_allow_native(|name| env::var(name))
    }

    fn os_family(&self) -> Option<String> {
        let os = env::consts::OS;
        (!os.is_empty()).then(|| os.to_string())
    }
}

/// Probe with fixed answers, for tests and for hosts that know their own context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticProbe {
    pub native_capability: bool,
    pub os_family: Option<String>,
}

impl StaticProbe {
    pub fn new(native_capability: bool, os_family: Option<&str>) -> Self {
        Self {
            native_capability,
            os_family: os_family.map(str::to_string),
        }
    }

    /// Unrestricted macOS host
    pub fn macos() -> Self {
        Self::new(true, Some("macos"))
    }

    /// Restricted runtime with no process spawning
    pub fn sandboxed() -> Self {
        Self::new(false, None)
    }
}

impl CapabilityProbe for StaticProbe {
    fn has_native_capability(&self) -> bool {
        self.native_capability
    }

    fn os_family(&self) -> Option<String> {
        self.os_family.clone()
    }
}
