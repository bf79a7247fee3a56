//! Credential resolution across the environment and the OS keychain

mod credential_resolver;

pub use credential_resolver::{
    CredentialResolver, ResolvedSecret,
    resolve_api_key, resolve_credentials_bundle, discover_credentials,
};
