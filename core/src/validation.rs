// Validation logic for export inputs

/// Validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("モデルIDが空です")]
    EmptyModelId,
}

/// Validate a model identifier
///
/// Only emptiness is checked. The ID is otherwise opaque and goes into the
/// URL path as-is.
pub fn validate_model_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::EmptyModelId);
    }
    Ok(())
}
