//! Turns a user-supplied "id or name" string into a canonical numeric id
//! for one of the server's item collections.

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::TowerError;
use crate::transport::{Method, Transport};

/// The collections a reference can be resolved against. The algorithm is
/// identical for all of them; only the list endpoint differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    JobTemplates,
    Inventories,
    Credentials,
}

impl Collection {
    pub fn list_path(self) -> &'static str {
        match self {
            Collection::JobTemplates => "/api/v1/job_templates/",
            Collection::Inventories => "/api/v1/inventories/",
            Collection::Credentials => "/api/v1/credentials/",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Collection::JobTemplates => "job template",
            Collection::Inventories => "inventory",
            Collection::Credentials => "credential",
        }
    }
}

#[derive(Debug, Deserialize)]
struct NamedItem {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ListPage {
    results: Vec<NamedItem>,
}

/// Resolves `id_or_name` against a collection's list endpoint.
///
/// Numeric input is returned unchanged without a network call; the server
/// validates raw ids itself when they are eventually used. A name must
/// match exactly one entry (exact, case-sensitive comparison over the full
/// result list): zero matches fail with [`TowerError::NotFound`], two or
/// more with [`TowerError::AmbiguousName`] rather than guessing.
pub async fn resolve(
    transport: &Transport,
    id_or_name: &str,
    collection: Collection,
) -> Result<String, TowerError> {
    if id_or_name.parse::<i64>().is_ok() {
        return Ok(id_or_name.to_string());
    }

    let response = transport.request(Method::Get, collection.list_path(), None).await?;
    if response.status() != StatusCode::OK {
        return Err(TowerError::UnexpectedStatus {
            status: response.status(),
            context: format!("{} list", collection.label()),
        });
    }

    let page: ListPage = response.json().await.map_err(|err| {
        TowerError::Protocol(format!("unable to parse {} list: {err}", collection.label()))
    })?;

    let mut found: Option<i64> = None;
    for item in &page.results {
        if item.name == id_or_name {
            if found.is_some() {
                return Err(TowerError::AmbiguousName(id_or_name.to_string()));
            }
            found = Some(item.id);
        }
    }

    match found {
        Some(id) => Ok(id.to_string()),
        None => Err(TowerError::NotFound(format!(
            "no {} named {id_or_name:?}",
            collection.label()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::ServerEndpoint;

    #[tokio::test]
    async fn numeric_input_short_circuits_without_network() {
        // The endpoint is unreachable; a network call would error out.
        let endpoint = ServerEndpoint::new("http://127.0.0.1:1").unwrap();
        let transport = Transport::new(endpoint).unwrap();
        let id = resolve(&transport, "17", Collection::JobTemplates).await.unwrap();
        assert_eq!(id, "17");
    }

    #[test]
    fn collection_paths_are_versioned() {
        assert_eq!(Collection::JobTemplates.list_path(), "/api/v1/job_templates/");
        assert_eq!(Collection::Inventories.list_path(), "/api/v1/inventories/");
        assert_eq!(Collection::Credentials.list_path(), "/api/v1/credentials/");
    }
}
