//! Catalog provider trait for fetching Unity releases from various sources

#[cfg(test)]
use mockall::automock;

use crate::catalog::error::CatalogError;
use crate::changeset::release::{ReleaseEntitlement, ReleaseStream, UnityChangeset};

/// Narrowing applied to a catalog query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryScope {
    /// Version prefix; empty matches every version.
    pub version: String,
    /// Streams to include; empty matches every stream.
    pub streams: Vec<ReleaseStream>,
    /// Entitlements to include in the query.
    pub entitlements: Vec<ReleaseEntitlement>,
}

/// Trait for fetching Unity releases from a catalog source
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetches every release matching `scope`.
    ///
    /// # Returns
    /// * `Ok(Vec<UnityChangeset>)` - matching releases, in upstream order
    /// * `Err(CatalogError)` - if the fetch fails
    async fn fetch_releases(&self, scope: &QueryScope)
    -> Result<Vec<UnityChangeset>, CatalogError>;

    /// Fetches LTS releases across every major version.
    async fn fetch_lts_releases(
        &self,
        entitlements: &[ReleaseEntitlement],
    ) -> Result<Vec<UnityChangeset>, CatalogError> {
        self.fetch_releases(&QueryScope {
            version: String::new(),
            streams: vec![ReleaseStream::Lts],
            entitlements: entitlements.to_vec(),
        })
        .await
    }
}
