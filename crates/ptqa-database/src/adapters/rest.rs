//! PostgREST-style HTTP adapter for the hosted backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde_json::Value;
use tracing::{debug, error};

use ptqa_core::config::backend::BackendConfig;
use ptqa_core::error::{AppError, ErrorKind};
use ptqa_core::result::AppResult;
use ptqa_core::traits::collection::CollectionAdapter;
use ptqa_core::types::query::CollectionQuery;

use super::prepare_insert;

const RETURN_REPRESENTATION: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";

/// Talks to `{url}/rest/v1/{collection}` with the project's API key.
#[derive(Debug, Clone)]
pub struct RestCollectionAdapter {
    client: Client,
    base_url: Url,
}

impl RestCollectionAdapter {
    /// Build an adapter from configuration.
    pub fn new(config: &BackendConfig) -> AppResult<Self> {
        if config.url.trim().is_empty() {
            return Err(AppError::configuration(
                "backend.url must be set for the rest provider",
            ));
        }

        let base = format!("{}/rest/v1/", config.url.trim_end_matches('/'));
        let base_url = Url::parse(&base).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid backend URL '{}'", config.url),
                e,
            )
        })?;

        let client = Client::builder()
            .default_headers(default_headers(config)?)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self { client, base_url })
    }

    fn collection_url(&self, collection: &str, params: &[(String, String)]) -> AppResult<Url> {
        let mut url = self.base_url.join(collection).map_err(|e| {
            AppError::with_source(
                ErrorKind::Internal,
                format!("Invalid collection name '{collection}'"),
                e,
            )
        })?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    fn by_id(id: &str) -> Vec<(String, String)> {
        vec![("id".to_string(), format!("eq.{id}"))]
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    async fn send(&self, collection: &str, request: RequestBuilder) -> AppResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!(collection, status = %status, body = %body, "Remote collection request failed");
        Err(AppError::remote(format!(
            "Request on '{collection}' failed with status {status}: {body}"
        )))
    }

    async fn first_row(collection: &str, response: Response) -> AppResult<Value> {
        let rows: Vec<Value> = response.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::not_found(format!("No row returned from '{collection}'")))
    }
}

fn default_headers(config: &BackendConfig) -> AppResult<HeaderMap> {
    let invalid = |e: reqwest::header::InvalidHeaderValue| {
        AppError::with_source(
            ErrorKind::Configuration,
            "backend.api_key contains invalid header characters",
            e,
        )
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("apikey"),
        HeaderValue::from_str(&config.api_key).map_err(invalid)?,
    );
    headers.insert(
        reqwest::header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(invalid)?,
    );
    let schema = HeaderValue::from_str(&config.schema).map_err(|e| {
        AppError::with_source(ErrorKind::Configuration, "Invalid backend.schema", e)
    })?;
    headers.insert(HeaderName::from_static("accept-profile"), schema.clone());
    headers.insert(HeaderName::from_static("content-profile"), schema);
    Ok(headers)
}

#[async_trait]
impl CollectionAdapter for RestCollectionAdapter {
    async fn fetch(&self, collection: &str, query: &CollectionQuery) -> AppResult<Vec<Value>> {
        let url = self.collection_url(collection, &query.to_query_pairs())?;
        debug!(collection, url = %url, "Fetching rows");
        let response = self.send(collection, self.request(Method::GET, url)).await?;
        Ok(response.json().await?)
    }

    async fn insert(&self, collection: &str, row: Value) -> AppResult<Value> {
        let row = prepare_insert(row)?;
        let url = self.collection_url(collection, &[])?;
        let request = self
            .request(Method::POST, url)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&vec![row]);
        let response = self.send(collection, request).await?;
        Self::first_row(collection, response).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> AppResult<Value> {
        let url = self.collection_url(collection, &Self::by_id(id))?;
        let request = self
            .request(Method::PATCH, url)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&patch);
        let response = self.send(collection, request).await?;
        Self::first_row(collection, response)
            .await
            .map_err(|e| match e.kind {
                ErrorKind::NotFound => AppError::not_found(format!("{collection} '{id}' not found")),
                _ => e,
            })
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let url = self.collection_url(collection, &Self::by_id(id))?;
        self.send(collection, self.request(Method::DELETE, url))
            .await?;
        Ok(())
    }

    async fn upsert(&self, collection: &str, row: Value) -> AppResult<Value> {
        let url = self.collection_url(collection, &[])?;
        let request = self
            .request(Method::POST, url)
            .header("Prefer", MERGE_DUPLICATES)
            .json(&vec![row]);
        let response = self.send(collection, request).await?;
        Self::first_row(collection, response).await
    }

    fn provider_name(&self) -> &'static str {
        "rest"
    }
}
