// Core data models for the floor-plan export toolkit

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::validation::{validate_model_id, ValidationError};

/// Default export service origin
pub const DEFAULT_API_BASE_URL: &str = "https://api.cubi.casa";

/// Path prefix of the floor-plan export endpoint
pub const EXPORT_PATH: &str = "exporter/floorplan";

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// MIME type attached to downloaded JSON files
pub const JSON_MIME_TYPE: &str = "application/json;charset=utf-8";

/// Identifier of the floor-plan model to export
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Create a model ID, rejecting empty input
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        validate_model_id(&id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// API key sent with every export request
///
/// Opaque: any string is accepted here. Whether it can travel as a header
/// value is checked when the request is built. `Debug` never prints the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Export options forwarded verbatim as the request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportConfig(Value);

impl ExportConfig {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Build a config from any serializable value
    pub fn from_serializable<T: Serialize + ?Sized>(config: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(config).map(Self)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }
}

impl From<Value> for ExportConfig {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Decoded response body of the export service, passed through unmodified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportResult(Value);

impl ExportResult {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Interpret the body as a caller-defined type
    pub fn deserialize_into<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.0)
    }
}

/// JSON-plain copy of a value about to be downloaded
///
/// Built by encoding the value and decoding it again, so anything JSON cannot
/// carry is gone: skipped fields disappear and non-finite floats become `null`.
/// Object keys keep the order the value serialized them in.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPayload {
    value: Value,
}

impl DownloadPayload {
    pub fn from_serializable<T: Serialize + ?Sized>(data: &T) -> Result<Self, serde_json::Error> {
        let encoded = serde_json::to_vec(data)?;
        let value = serde_json::from_slice(&encoded)?;
        Ok(Self { value })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Render with 2-space indentation
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.value)
    }
}
