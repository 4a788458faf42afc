// SPDX-License-Identifier: AGPL-3.0
// EduToyRent Core - Remote catalog client
//
// Thin read-only client for the toy catalog API. Every call goes to the
// network: no caching, no retries. Dropping a pending call cancels it.

use crate::types::{AppError, AppSettings, Toy, ToyId};
use reqwest::{Client, Response, StatusCode, Url};
use std::time::Duration;

/// Path of the catalog collection on the API host
const CATALOG_PATH: &str = "ListOfToys";

/// Client for the remote toy catalog
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http_client: Client,
    base_url: String,
}

impl CatalogClient {
    /// Build a client from validated settings
    pub fn new(settings: &AppSettings) -> Result<Self, AppError> {
        settings.validate()?;

        let mut builder =
            Client::builder().connect_timeout(Duration::from_secs(settings.connect_timeout_secs));
        // No overall timeout unless configured; a slow catalog only stalls its own screen
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http_client = builder
            .build()
            .map_err(|e| AppError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: settings.api_base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the whole catalog
    pub async fn fetch_all(&self) -> Result<Vec<Toy>, AppError> {
        let url = format!("{}/{}", self.base_url, CATALOG_PATH);
        let response = self.get(&url).await?;

        if !response.status().is_success() {
            return Err(AppError::Network(format!(
                "Catalog returned status {}",
                response.status()
            )));
        }

        let toys: Vec<Toy> = response
            .json()
            .await
            .map_err(|e| AppError::Serialization(format!("Failed to parse catalog: {}", e)))?;

        tracing::info!("Fetched {} toys from catalog", toys.len());
        Ok(toys)
    }

    /// Fetch a single toy by id
    pub async fn fetch_by_id(&self, id: &ToyId) -> Result<Toy, AppError> {
        let url = self.toy_url(id)?;
        let response = self.get(url.as_str()).await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(AppError::NotFound(format!("Toy {} is not in the catalog", id)));
            }
            status if !status.is_success() => {
                return Err(AppError::Network(format!(
                    "Catalog returned status {} for toy {}",
                    status, id
                )));
            }
            _ => {}
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Serialization(format!("Failed to parse toy {}: {}", id, e)))
    }

    /// Item URL with the id pushed as one percent-encoded path segment
    fn toy_url(&self, id: &ToyId) -> Result<Url, AppError> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, CATALOG_PATH))
            .map_err(|e| AppError::InvalidConfig(format!("Invalid API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::InvalidConfig(format!(
                    "API base URL cannot take a path: {}",
                    self.base_url
                ))
            })?
            .push(id.as_str());
        Ok(url)
    }

    async fn get(&self, url: &str) -> Result<Response, AppError> {
        tracing::debug!("GET {}", url);

        self.http_client.get(url).send().await.map_err(|e| {
            tracing::warn!("Catalog request to {} failed: {}", url, e);
            if e.is_connect() {
                AppError::Network(format!("Cannot connect to {} - {}", url, e))
            } else if e.is_timeout() {
                AppError::Network(format!("Request to {} timed out", url))
            } else {
                AppError::Network(format!("Request failed: {}", e))
            }
        })
    }
}
