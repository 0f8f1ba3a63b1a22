// API client library for the floor-plan export service
//
// This crate sends export requests to the remote exporter and
// hands the decoded response body back to the caller.

pub mod errors;
pub mod http_client;

// Re-export commonly used items
pub use errors::ApiError;
pub use http_client::{export_floor_plan, ExportClient, API_BASE_URL_ENV};
