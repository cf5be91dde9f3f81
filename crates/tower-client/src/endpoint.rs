//! Server endpoint configuration and the collaborator seams the core
//! depends on: a registry of named servers and a credential store.

use std::collections::HashMap;

use url::Url;

use crate::error::TowerError;

/// Connection details for one orchestration server. Immutable once built;
/// a [`crate::Transport`] owns a clone for the duration of a job run.
#[derive(Debug, Clone)]
pub struct ServerEndpoint {
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    trust_all_certs: bool,
    debug: bool,
}

impl ServerEndpoint {
    /// Validates the base URL up front so a typo fails here instead of on
    /// the first request. A trailing slash is dropped; request paths all
    /// start with one.
    pub fn new(base_url: &str) -> Result<Self, TowerError> {
        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed)
            .map_err(|err| TowerError::Configuration(format!("bad server url {base_url:?}: {err}")))?;
        Ok(Self {
            base_url: trimmed.to_string(),
            username: None,
            password: None,
            trust_all_certs: false,
            debug: false,
        })
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Insecure mode: accept any certificate and hostname. Never the
    /// default; callers opt in per configured server.
    pub fn with_trust_all_certs(mut self, trust_all_certs: bool) -> Self {
        self.trust_all_certs = trust_all_certs;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn trust_all_certs(&self) -> bool {
        self.trust_all_certs
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}

/// Username/password lookup for an opaque credential id. Owned by the
/// calling environment; the core never stores secrets itself.
pub trait CredentialStore {
    /// Returns `None` when the id is unknown, in which case the endpoint
    /// is used unauthenticated.
    fn lookup(&self, credential_id: &str) -> Option<(String, String)>;
}

/// In-memory store for tests and early wiring.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: HashMap<String, (String, String)>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        credential_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) {
        self.entries
            .insert(credential_id.into(), (username.into(), password.into()));
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn lookup(&self, credential_id: &str) -> Option<(String, String)> {
        self.entries.get(credential_id).cloned()
    }
}

/// One configured server as the calling environment describes it: a display
/// name, a base URL, the trust flag, and which credential to attach.
#[derive(Debug, Clone)]
pub struct ServerRecord {
    pub name: String,
    pub base_url: String,
    pub trust_all_certs: bool,
    pub credential_id: Option<String>,
}

/// Display name -> server record mapping, read-only once loaded.
#[derive(Debug, Default, Clone)]
pub struct ServerRegistry {
    servers: Vec<ServerRecord>,
}

impl ServerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: ServerRecord) {
        self.servers.push(record);
    }

    pub fn get(&self, name: &str) -> Option<&ServerRecord> {
        self.servers.iter().find(|record| record.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.servers.iter().map(|record| record.name.as_str())
    }

    /// Resolves a server name into a ready [`ServerEndpoint`], pulling
    /// credentials from the store when the record names one.
    pub fn endpoint(
        &self,
        name: &str,
        credentials: &dyn CredentialStore,
    ) -> Result<ServerEndpoint, TowerError> {
        let record = self.get(name).ok_or_else(|| {
            TowerError::Configuration(format!("server {name:?} is not configured"))
        })?;
        let mut endpoint =
            ServerEndpoint::new(&record.base_url)?.with_trust_all_certs(record.trust_all_certs);
        if let Some(credential_id) = &record.credential_id {
            if let Some((username, password)) = credentials.lookup(credential_id) {
                endpoint = endpoint.with_credentials(username, password);
            }
        }
        Ok(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_base_url() {
        let err = ServerEndpoint::new("not a url").unwrap_err();
        assert!(matches!(err, TowerError::Configuration(_)));
    }

    #[test]
    fn trims_trailing_slash() {
        let endpoint = ServerEndpoint::new("https://tower.example.com/").unwrap();
        assert_eq!(endpoint.base_url(), "https://tower.example.com");
    }

    #[test]
    fn unknown_server_name_is_a_configuration_error() {
        let registry = ServerRegistry::new();
        let store = MemoryCredentialStore::new();
        let err = registry.endpoint("prod", &store).unwrap_err();
        assert!(matches!(err, TowerError::Configuration(_)));
    }

    #[test]
    fn registry_attaches_stored_credentials() {
        let mut registry = ServerRegistry::new();
        registry.insert(ServerRecord {
            name: "prod".into(),
            base_url: "https://tower.example.com".into(),
            trust_all_certs: true,
            credential_id: Some("tower-prod".into()),
        });
        let mut store = MemoryCredentialStore::new();
        store.insert("tower-prod", "deploy", "s3cret");

        let endpoint = registry.endpoint("prod", &store).unwrap();
        assert_eq!(endpoint.username(), Some("deploy"));
        assert_eq!(endpoint.password(), Some("s3cret"));
        assert!(endpoint.trust_all_certs());
    }

    #[test]
    fn unknown_credential_id_leaves_endpoint_unauthenticated() {
        let mut registry = ServerRegistry::new();
        registry.insert(ServerRecord {
            name: "lab".into(),
            base_url: "https://lab.example.com".into(),
            trust_all_certs: false,
            credential_id: Some("missing".into()),
        });
        let store = MemoryCredentialStore::new();

        let endpoint = registry.endpoint("lab", &store).unwrap();
        assert_eq!(endpoint.username(), None);
        assert_eq!(endpoint.password(), None);
    }
}
