//! Static changeset database catalog provider.
//!
//! The database is a flat file with one `{version}\t{changeset}` pair per
//! line. It carries no stream or entitlement metadata, so stream narrowing
//! is approximated client-side from the lifecycle letter. Used as fallback
//! when the GraphQL API is unreachable.

use tracing::{debug, warn};

use crate::catalog::error::CatalogError;
use crate::catalog::provider::{CatalogProvider, QueryScope};
use crate::changeset::release::{Lifecycle, ReleaseStream, UnityChangeset};
use crate::config::UNITY_CHANGESET_DB_URL;

/// Catalog provider backed by the static changeset database.
pub struct DbCatalog {
    client: reqwest::Client,
    url: String,
}

impl DbCatalog {
    /// Creates a catalog against a custom database URL.
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("unity-changeset")
                .build()
                .expect("Failed to create HTTP client"),
            url: url.to_string(),
        }
    }
}

impl Default for DbCatalog {
    fn default() -> Self {
        Self::new(UNITY_CHANGESET_DB_URL)
    }
}

/// Whether a db release belongs to one of the requested streams.
///
/// Alpha/beta lifecycles map to the ALPHA/BETA streams; final and patch
/// builds are indistinguishable between LTS, SUPPORTED and TECH here, so
/// any of those streams admits them.
fn matches_streams(changeset: &UnityChangeset, streams: &[ReleaseStream]) -> bool {
    if streams.is_empty() {
        return true;
    }
    match changeset.lifecycle {
        Some(Lifecycle::Alpha) => streams.contains(&ReleaseStream::Alpha),
        Some(Lifecycle::Beta) => streams.contains(&ReleaseStream::Beta),
        Some(Lifecycle::Final | Lifecycle::Patch) | None => streams.iter().any(|s| {
            matches!(
                s,
                ReleaseStream::Lts | ReleaseStream::Supported | ReleaseStream::Tech
            )
        }),
    }
}

#[async_trait::async_trait]
impl CatalogProvider for DbCatalog {
    async fn fetch_releases(
        &self,
        scope: &QueryScope,
    ) -> Result<Vec<UnityChangeset>, CatalogError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("changeset db returned status {}: {}", status, self.url);
            return Err(CatalogError::InvalidResponse(format!(
                "unexpected status: {status}"
            )));
        }

        let body = response.text().await?;
        Ok(body
            .lines()
            .filter_map(|line| match line.parse::<UnityChangeset>() {
                Ok(changeset) => Some(changeset),
                Err(_) => {
                    if !line.trim().is_empty() {
                        debug!("skipping malformed db line: {line}");
                    }
                    None
                }
            })
            .filter(|c| matches_streams(c, &scope.streams))
            .filter(|c| scope.version.is_empty() || c.version.starts_with(&scope.version))
            .collect())
    }
}
