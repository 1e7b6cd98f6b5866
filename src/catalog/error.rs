use thiserror::Error;

/// Errors from catalog providers.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("GraphQL API error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
