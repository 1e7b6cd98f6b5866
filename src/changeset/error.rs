use thiserror::Error;

use crate::catalog::error::CatalogError;

/// Errors from changeset lookup and the list pipeline.
#[derive(Debug, Error)]
pub enum ChangesetError {
    #[error("No changeset found for version '{0}'")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
