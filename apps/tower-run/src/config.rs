//! Environment-based server configuration.
//!
//! `TOWER_SERVERS` names the configured servers (comma-separated). Each
//! name `foo-bar` is looked up through uppercased `FOO_BAR` variables:
//!
//! - `TOWER_URL_FOO_BAR`         base URL (required; the entry is skipped
//!   with a warning when missing)
//! - `TOWER_TRUST_CERTS_FOO_BAR` "1"/"true" to accept any certificate
//! - `TOWER_USER_FOO_BAR` / `TOWER_PASS_FOO_BAR` Basic auth credentials

use std::env;

use tracing::warn;
use tower_client::{CredentialStore, ServerRecord, ServerRegistry};

pub struct Config {
    pub registry: ServerRegistry,
    pub credentials: EnvCredentialStore,
}

impl Config {
    pub fn from_env() -> Self {
        let mut registry = ServerRegistry::new();
        let names = env::var("TOWER_SERVERS").unwrap_or_default();
        for name in names.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            let key = env_key(name);
            let base_url = match env::var(format!("TOWER_URL_{key}")) {
                Ok(url) => url,
                Err(_) => {
                    warn!("server {name:?} listed in TOWER_SERVERS but TOWER_URL_{key} is not set");
                    continue;
                }
            };
            let trust_all_certs = env::var(format!("TOWER_TRUST_CERTS_{key}"))
                .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
                .unwrap_or(false);
            registry.insert(ServerRecord {
                name: name.to_string(),
                base_url,
                trust_all_certs,
                credential_id: Some(name.to_string()),
            });
        }
        Self {
            registry,
            credentials: EnvCredentialStore,
        }
    }
}

/// Reads `TOWER_USER_<ID>`/`TOWER_PASS_<ID>` pairs on demand.
pub struct EnvCredentialStore;

impl CredentialStore for EnvCredentialStore {
    fn lookup(&self, credential_id: &str) -> Option<(String, String)> {
        let key = env_key(credential_id);
        let username = env::var(format!("TOWER_USER_{key}")).ok()?;
        let password = env::var(format!("TOWER_PASS_{key}")).unwrap_or_default();
        Some((username, password))
    }
}

fn env_key(name: &str) -> String {
    name.to_uppercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_key_uppercases_and_replaces_dashes() {
        assert_eq!(env_key("prod-tower"), "PROD_TOWER");
    }
}
