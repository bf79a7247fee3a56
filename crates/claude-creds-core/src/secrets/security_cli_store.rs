//! macOS keychain lookup through the `security` command line tool
//!
//! This is how Claude Code's own entries are read: `security find-generic-password`
//! can match on the service alone, without knowing the account name the entry was
//! written with.

use std::path::PathBuf;
use std::process::Command;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};
use crate::logging::file_logger as log;

const DEFAULT_PROGRAM: &str = "security";

/// Secret store that shells out to `security find-generic-password -s <service> -w`
///
/// - exit status 0 with non-empty output: the trimmed password
/// - any other exit status, or empty output: `NotFound`
/// - the program could not be started: `Spawn`
///
/// Each lookup is one blocking subprocess with no timeout of its own.
#[derive(Debug, Clone)]
pub struct SecurityCliStore {
    program: PathBuf,
}

impl SecurityCliStore {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Use a different executable with the same calling convention
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    fn command(&self, service: &str, account: Option<&str>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["find-generic-password", "-s", service, "-w"]);
        if let Some(account) = account {
            cmd.args(["-a", account]);
        }
        cmd
    }
}

impl Default for SecurityCliStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for SecurityCliStore {
    fn name(&self) -> &str {
        "security-cli"
    }

    fn supports_os(&self, os: &str) -> bool {
        os == "macos"
    }

    fn lookup(&self, service: &str, account: Option<&str>) -> SecretStoreResult<String> {
        log::debug(
            "SecurityCliStore",
            &format!("lookup service='{}', account={:?}", service, account),
        );

        let output = self.command(service, account).output().map_err(|source| {
            log::warn("SecurityCliStore", &format!("spawn failed: {}", source));
            SecretStoreError::Spawn {
                program: self.program.display().to_string(),
                source,
            }
        })?;

        if !output.status.success() {
            log::debug(
                "SecurityCliStore",
                &format!("no entry for '{}' (status {:?})", service, output.status.code()),
            );
            return Err(SecretStoreError::not_found(service));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| SecretStoreError::InvalidUtf8(service.to_string()))?;
        let value = stdout.trim();
        if value.is_empty() {
            return Err(SecretStoreError::not_found(service));
        }

        log::info("SecurityCliStore", &format!("found '{}', value len={}", service, value.len()));
        Ok(value.to_string())
    }
}
