use thiserror::Error;

/// Errors from reading or writing document trees
///
/// The tree operations themselves never fail; only (de)serialization can.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}
