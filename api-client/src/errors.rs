// API client errors

use floorplan_export_core::ValidationError;
use reqwest::StatusCode;

/// API client error types
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Model ID rejected before sending
    #[error("入力エラー: {0}")]
    Validation(#[from] ValidationError),

    /// API key cannot be sent as a header value
    #[error("APIキーに使用できない文字が含まれています")]
    InvalidApiKey,

    /// Transport failure (DNS, connection, TLS, timeout)
    #[error("ネットワークエラー: {0}")]
    Network(#[source] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTPエラー: {status}")]
    Status { status: StatusCode, body: String },

    /// Response body is not valid JSON
    #[error("レスポンスの解析に失敗しました: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    /// HTTP status of a rejected request
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            _ => None,
        }
    }

    /// True when the request never got a response
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}
