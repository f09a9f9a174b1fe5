//! Chroma HTTP collection — the production document store behind the vector
//! cache backend.
//!
//! Talks to the v2 REST API: resolves (or creates) the configured collection
//! once at startup, then upserts and fetches digest documents by id. The
//! API key, when present, rides in the `x-chroma-token` header.

use serde::Deserialize;
use serde_json::{Map, Value, json};

use scry_config::{ChromaConfig, ConfigError};

use crate::error::CacheError;
use crate::vector::{DocumentCollection, StoredDocument};

#[derive(Debug, Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
struct GetResponse {
    #[serde(default)]
    ids: Vec<String>,
    #[serde(default)]
    documents: Option<Vec<Option<String>>>,
    #[serde(default)]
    metadatas: Option<Vec<Option<Map<String, Value>>>>,
}

/// One Chroma collection, addressed through the v2 HTTP API.
#[derive(Debug)]
pub struct ChromaCollection {
    http: reqwest::Client,
    collection_url: String,
}

impl ChromaCollection {
    /// Resolve the configured collection, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Config`] when no URL is configured — the vector
    /// backend cannot start without one — or [`CacheError`] when the server
    /// is unreachable or rejects the request.
    pub async fn connect(config: &ChromaConfig) -> Result<Self, CacheError> {
        if !config.is_configured() {
            return Err(CacheError::Config(ConfigError::NotConfigured {
                section: "chroma".to_string(),
            }));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        if !config.api_key.is_empty() {
            let value = reqwest::header::HeaderValue::from_str(&config.api_key).map_err(|_| {
                CacheError::Config(ConfigError::InvalidValue {
                    field: "chroma.api_key".to_string(),
                    reason: "not a valid header value".to_string(),
                })
            })?;
            headers.insert("x-chroma-token", value);
        }
        let http = reqwest::Client::builder()
            .user_agent("scry/0.1")
            .default_headers(headers)
            .build()?;

        let collections_url = format!(
            "{}/api/v2/tenants/{}/databases/{}/collections",
            config.url.trim_end_matches('/'),
            config.tenant,
            config.database,
        );
        let resp = http
            .post(&collections_url)
            .json(&json!({ "name": config.collection, "get_or_create": true }))
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let collection: CollectionResponse = resp.json().await?;

        Ok(Self {
            http,
            collection_url: format!("{collections_url}/{}", collection.id),
        })
    }
}

impl DocumentCollection for ChromaCollection {
    async fn upsert(&self, doc: StoredDocument) -> Result<(), CacheError> {
        let resp = self
            .http
            .post(format!("{}/upsert", self.collection_url))
            .json(&json!({
                "ids": [doc.id],
                "documents": [doc.document],
                "metadatas": [doc.metadata],
            }))
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<StoredDocument>, CacheError> {
        let resp = self
            .http
            .post(format!("{}/get", self.collection_url))
            .json(&json!({
                "ids": [id],
                "include": ["documents", "metadatas"],
            }))
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let record: GetResponse = resp.json().await?;
        Ok(extract_first(record))
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, CacheError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(CacheError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        })
    }
}

/// Pull the first record out of a Chroma batch-get response.
fn extract_first(record: GetResponse) -> Option<StoredDocument> {
    let id = record.ids.first()?.clone();
    let document = record
        .documents
        .and_then(|mut docs| docs.drain(..).next().flatten())
        .unwrap_or_default();
    let metadata = record
        .metadatas
        .and_then(|mut metas| metas.drain(..).next().flatten())
        .unwrap_or_default();
    Some(StoredDocument {
        id,
        document,
        metadata,
    })
}
