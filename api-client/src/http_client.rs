// HTTP client for the floor-plan export service

use crate::errors::ApiError;
use floorplan_export_core::{
    ApiKey, ExportConfig, ExportResult, ModelId, API_KEY_HEADER, DEFAULT_API_BASE_URL, EXPORT_PATH,
};
use reqwest::header::HeaderValue;
use serde_json::Value;
use std::env;

/// Environment variable overriding the export service origin
pub const API_BASE_URL_ENV: &str = "CUBICASA_API_BASE_URL";

fn get_api_base_url() -> String {
    env::var(API_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
}

/// Client for the floor-plan exporter
///
/// No timeout and no retry are applied here. Callers that need either wrap
/// the returned future themselves.
#[derive(Debug, Clone)]
pub struct ExportClient {
    client: reqwest::Client,
    base_url: String,
}

impl ExportClient {
    /// Create a new export client
    ///
    /// # Arguments
    /// * `base_url` - Export service origin (e.g., "https://api.cubi.casa")
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a client for the origin in `CUBICASA_API_BASE_URL`, or the public service
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(get_api_base_url())
    }

    /// Reuse an existing reqwest client (e.g., with proxy or TLS settings)
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full export URL for a model
    pub fn endpoint(&self, model_id: &ModelId) -> String {
        format!("{}/{}/{}", self.base_url, EXPORT_PATH, model_id)
    }

    /// Request an export of the given model
    ///
    /// # Arguments
    /// * `model_id` - Floor-plan model to export
    /// * `api_key` - Sent as the `x-api-key` header
    /// * `config` - Sent verbatim as the JSON request body
    ///
    /// # Returns
    /// The decoded response body. A body that is not JSON (including an
    /// empty one) is an `ApiError::Decode`.
    pub async fn export_floor_plan(
        &self,
        model_id: &ModelId,
        api_key: &ApiKey,
        config: &ExportConfig,
    ) -> Result<ExportResult, ApiError> {
        let url = self.endpoint(model_id);
        let key = HeaderValue::from_str(api_key.expose()).map_err(|_| ApiError::InvalidApiKey)?;

        tracing::debug!(model_id = %model_id, url = %url, "Sending export request");

        // .json() also sets Content-Type: application/json
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, key)
            .json(config.as_value())
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(model_id = %model_id, %status, error = %e, "Failed to read error response body");
                    String::new()
                }
            };
            tracing::warn!(model_id = %model_id, %status, "Export request rejected");
            return Err(ApiError::Status { status, body });
        }

        let bytes = response.bytes().await.map_err(ApiError::Network)?;
        tracing::debug!(model_id = %model_id, bytes = bytes.len(), "Export response received");

        let body: Value = serde_json::from_slice(&bytes).map_err(ApiError::Decode)?;
        Ok(ExportResult::new(body))
    }
}

/// Export a floor plan via the remote exporter
///
/// Builds a client from the environment on every call.
///
/// # Arguments
/// * `model_id` - Floor-plan model identifier (must not be empty)
/// * `api_key` - API key for the exporter, sent as-is
/// * `config` - Export options, forwarded as-is
pub async fn export_floor_plan(
    model_id: &str,
    api_key: &str,
    config: &ExportConfig,
) -> Result<ExportResult, ApiError> {
    let model_id = ModelId::new(model_id)?;
    let api_key = ApiKey::new(api_key);

    ExportClient::from_env()?
        .export_floor_plan(&model_id, &api_key, config)
        .await
}
