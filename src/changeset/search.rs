//! Catalog search and the list/resolve operations.

use tracing::warn;

use crate::catalog::db::DbCatalog;
use crate::catalog::graphql::GraphQlCatalog;
use crate::catalog::provider::{CatalogProvider, QueryScope};
use crate::changeset::error::ChangesetError;
use crate::changeset::filter::{FilterOptions, filter_changesets};
use crate::changeset::group::{GroupMode, group_changesets};
use crate::changeset::output::{FormatMode, OutputMode, format_changesets};
use crate::changeset::release::{ReleaseEntitlement, ReleaseStream, UnityChangeset};

/// Which release streams to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Every stream, alpha/beta included.
    All,
    /// The LTS, SUPPORTED and TECH streams.
    #[default]
    Default,
    /// The SUPPORTED stream only.
    Supported,
    /// The LTS stream only.
    Lts,
    /// The LTS stream only, with the XLTS entitlement.
    Xlts,
    /// The ALPHA and BETA streams.
    PreRelease,
}

impl SearchMode {
    /// Streams queried for this mode.
    pub fn streams(self) -> &'static [ReleaseStream] {
        match self {
            Self::All => &[
                ReleaseStream::Lts,
                ReleaseStream::Supported,
                ReleaseStream::Tech,
                ReleaseStream::Beta,
                ReleaseStream::Alpha,
            ],
            Self::Default => &[
                ReleaseStream::Lts,
                ReleaseStream::Supported,
                ReleaseStream::Tech,
            ],
            Self::Supported => &[ReleaseStream::Supported],
            Self::Lts | Self::Xlts => &[ReleaseStream::Lts],
            Self::PreRelease => &[ReleaseStream::Alpha, ReleaseStream::Beta],
        }
    }
}

/// Release catalog: a primary provider plus a fallback consulted only when
/// the primary fails outright. An empty-but-successful primary result never
/// triggers the fallback.
pub struct Catalog {
    primary: Box<dyn CatalogProvider>,
    fallback: Box<dyn CatalogProvider>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(
            Box::new(GraphQlCatalog::default()),
            Box::new(DbCatalog::default()),
        )
    }
}

impl Catalog {
    pub fn new(primary: Box<dyn CatalogProvider>, fallback: Box<dyn CatalogProvider>) -> Self {
        Self { primary, fallback }
    }

    /// All releases visible in `mode`.
    pub async fn search(
        &self,
        mode: SearchMode,
        entitlements: &[ReleaseEntitlement],
    ) -> Result<Vec<UnityChangeset>, ChangesetError> {
        let scope = QueryScope {
            version: String::new(),
            streams: mode.streams().to_vec(),
            entitlements: entitlements.to_vec(),
        };

        let primary = match mode {
            SearchMode::Lts | SearchMode::Xlts => {
                self.primary.fetch_lts_releases(entitlements).await
            }
            _ => self.primary.fetch_releases(&scope).await,
        };

        match primary {
            Ok(releases) => Ok(releases),
            Err(err) => {
                warn!("primary catalog query failed, falling back to the changeset db: {err}");
                Ok(self.fallback.fetch_releases(&scope).await?)
            }
        }
    }

    /// Resolve one exact version string to its release.
    pub async fn resolve(&self, version: &str) -> Result<UnityChangeset, ChangesetError> {
        let version = sanitize_version(version)?;
        self.search(SearchMode::All, &[])
            .await?
            .into_iter()
            .find(|c| c.version == version)
            .ok_or(ChangesetError::NotFound(version))
    }

    /// Search, sort, filter, group and format in one pass.
    pub async fn list(
        &self,
        mode: SearchMode,
        options: &FilterOptions,
        group: GroupMode,
        output: OutputMode,
        format: FormatMode,
    ) -> Result<String, ChangesetError> {
        options.validate()?;
        let entitlements = if options.xlts {
            vec![ReleaseEntitlement::Xlts]
        } else {
            Vec::new()
        };

        let mut changesets = self.search(mode, &entitlements).await?;
        changesets.sort_by(|a, b| b.version_number.cmp(&a.version_number));

        let filtered = filter_changesets(&changesets, options)?;
        let grouped = group_changesets(&filtered, group);
        format_changesets(&grouped, output, format)
    }
}

/// Reject version strings carrying characters outside the version alphabet.
pub fn sanitize_version(version: &str) -> Result<String, ChangesetError> {
    let valid = version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !valid {
        return Err(ChangesetError::InvalidInput(format!(
            "version '{version}' contains invalid characters"
        )));
    }
    Ok(version.to_string())
}

/// Resolve `version` to its release using the default providers.
pub async fn get_unity_changeset(version: &str) -> Result<UnityChangeset, ChangesetError> {
    Catalog::default().resolve(version).await
}

/// Search known releases using the default providers.
pub async fn search_changesets(mode: SearchMode) -> Result<Vec<UnityChangeset>, ChangesetError> {
    Catalog::default().search(mode, &[]).await
}

/// List releases as printable output using the default providers.
pub async fn list_changesets(
    mode: SearchMode,
    options: &FilterOptions,
    group: GroupMode,
    output: OutputMode,
    format: FormatMode,
) -> Result<String, ChangesetError> {
    Catalog::default()
        .list(mode, options, group, output, format)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::error::CatalogError;
    use crate::catalog::provider::MockCatalogProvider;

    fn releases() -> Vec<UnityChangeset> {
        vec![
            UnityChangeset::with_stream("2018.4.0f1", "b6ffa8986c8d", ReleaseStream::Lts, vec![]),
            UnityChangeset::new("2018.3.0f2", "6e9a27477296"),
            UnityChangeset::new("2018.3.0f1", "f023c421e164"),
        ]
    }

    fn failing_provider() -> MockCatalogProvider {
        let mut provider = MockCatalogProvider::new();
        provider
            .expect_fetch_releases()
            .returning(|_| Err(CatalogError::Api("unreachable".to_string())));
        provider
    }

    #[test]
    fn search_mode_maps_to_streams() {
        assert_eq!(
            SearchMode::All.streams(),
            &[
                ReleaseStream::Lts,
                ReleaseStream::Supported,
                ReleaseStream::Tech,
                ReleaseStream::Beta,
                ReleaseStream::Alpha,
            ]
        );
        assert_eq!(
            SearchMode::Default.streams(),
            &[
                ReleaseStream::Lts,
                ReleaseStream::Supported,
                ReleaseStream::Tech,
            ]
        );
        assert_eq!(
            SearchMode::PreRelease.streams(),
            &[ReleaseStream::Alpha, ReleaseStream::Beta]
        );
        assert_eq!(SearchMode::Lts.streams(), &[ReleaseStream::Lts]);
        assert_eq!(SearchMode::Xlts.streams(), &[ReleaseStream::Lts]);
        assert_eq!(SearchMode::Supported.streams(), &[ReleaseStream::Supported]);
    }

    #[tokio::test]
    async fn search_uses_the_primary_provider() {
        let mut primary = MockCatalogProvider::new();
        primary
            .expect_fetch_releases()
            .times(1)
            .returning(|_| Ok(releases()));
        let mut fallback = MockCatalogProvider::new();
        fallback.expect_fetch_releases().never();

        let catalog = Catalog::new(Box::new(primary), Box::new(fallback));
        let results = catalog.search(SearchMode::Default, &[]).await.unwrap();

        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn search_falls_back_when_the_primary_fails() {
        let mut fallback = MockCatalogProvider::new();
        fallback
            .expect_fetch_releases()
            .times(1)
            .returning(|_| Ok(releases()));

        let catalog = Catalog::new(Box::new(failing_provider()), Box::new(fallback));
        let results = catalog.search(SearchMode::Default, &[]).await.unwrap();

        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn search_does_not_fall_back_on_empty_success() {
        let mut primary = MockCatalogProvider::new();
        primary
            .expect_fetch_releases()
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let mut fallback = MockCatalogProvider::new();
        fallback.expect_fetch_releases().never();

        let catalog = Catalog::new(Box::new(primary), Box::new(fallback));
        let results = catalog.search(SearchMode::Default, &[]).await.unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn search_propagates_fallback_failure() {
        let catalog = Catalog::new(
            Box::new(failing_provider()),
            Box::new(failing_provider()),
        );
        let result = catalog.search(SearchMode::Default, &[]).await;

        assert!(matches!(result, Err(ChangesetError::Catalog(_))));
    }

    #[tokio::test]
    async fn lts_search_resolves_through_the_major_version_path() {
        let mut primary = MockCatalogProvider::new();
        primary
            .expect_fetch_lts_releases()
            .times(1)
            .returning(|_| {
                Ok(vec![UnityChangeset::with_stream(
                    "2018.4.0f1",
                    "b6ffa8986c8d",
                    ReleaseStream::Lts,
                    vec![],
                )])
            });
        primary.expect_fetch_releases().never();
        let mut fallback = MockCatalogProvider::new();
        fallback.expect_fetch_releases().never();

        let catalog = Catalog::new(Box::new(primary), Box::new(fallback));
        let results = catalog.search(SearchMode::Lts, &[]).await.unwrap();

        assert_eq!(results.len(), 1);
        assert!(results[0].lts);
    }

    #[tokio::test]
    async fn resolve_returns_the_exact_match() {
        let mut primary = MockCatalogProvider::new();
        primary
            .expect_fetch_releases()
            .returning(|_| Ok(releases()));
        let fallback = MockCatalogProvider::new();

        let catalog = Catalog::new(Box::new(primary), Box::new(fallback));
        let changeset = catalog.resolve("2018.3.0f2").await.unwrap();

        assert_eq!(changeset.changeset, "6e9a27477296");
    }

    #[tokio::test]
    async fn resolve_fails_with_not_found_for_an_absent_version() {
        let mut primary = MockCatalogProvider::new();
        primary
            .expect_fetch_releases()
            .returning(|_| Ok(releases()));
        let fallback = MockCatalogProvider::new();

        let catalog = Catalog::new(Box::new(primary), Box::new(fallback));
        let result = catalog.resolve("2018.3.0f3").await;

        assert!(
            matches!(result, Err(ChangesetError::NotFound(version)) if version == "2018.3.0f3")
        );
    }

    #[tokio::test]
    async fn resolve_rejects_injection_attempts() {
        let catalog = Catalog::new(
            Box::new(MockCatalogProvider::new()),
            Box::new(MockCatalogProvider::new()),
        );
        let result = catalog.resolve("2018.3<script>").await;

        assert!(matches!(result, Err(ChangesetError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn list_runs_the_full_pipeline() {
        let mut primary = MockCatalogProvider::new();
        primary
            .expect_fetch_releases()
            .returning(|_| Ok(releases()));
        let fallback = MockCatalogProvider::new();

        let catalog = Catalog::new(Box::new(primary), Box::new(fallback));
        let rendered = catalog
            .list(
                SearchMode::Default,
                &FilterOptions::default(),
                GroupMode::LatestPatch,
                OutputMode::Changeset,
                FormatMode::None,
            )
            .await
            .unwrap();

        assert_eq!(
            rendered,
            "2018.4.0f1\tb6ffa8986c8d\n2018.3.0f2\t6e9a27477296"
        );
    }

    #[tokio::test]
    async fn list_sorts_before_filtering_and_grouping() {
        let mut primary = MockCatalogProvider::new();
        // Unsorted upstream order.
        primary.expect_fetch_releases().returning(|_| {
            Ok(vec![
                UnityChangeset::new("2018.3.0f1", "f023c421e164"),
                UnityChangeset::new("2018.4.0f1", "b6ffa8986c8d"),
                UnityChangeset::new("2018.3.0f2", "6e9a27477296"),
            ])
        });
        let fallback = MockCatalogProvider::new();

        let catalog = Catalog::new(Box::new(primary), Box::new(fallback));
        let rendered = catalog
            .list(
                SearchMode::Default,
                &FilterOptions::default(),
                GroupMode::All,
                OutputMode::VersionOnly,
                FormatMode::None,
            )
            .await
            .unwrap();

        assert_eq!(rendered, "2018.4.0f1\n2018.3.0f2\n2018.3.0f1");
    }

    #[tokio::test]
    async fn list_renders_json_when_requested() {
        let mut primary = MockCatalogProvider::new();
        primary
            .expect_fetch_releases()
            .returning(|_| Ok(releases()));
        let fallback = MockCatalogProvider::new();

        let catalog = Catalog::new(Box::new(primary), Box::new(fallback));
        let rendered = catalog
            .list(
                SearchMode::Default,
                &FilterOptions::default(),
                GroupMode::All,
                OutputMode::Changeset,
                FormatMode::Json,
            )
            .await
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn list_widens_entitlements_when_xlts_is_requested() {
        let mut primary = MockCatalogProvider::new();
        primary
            .expect_fetch_releases()
            .withf(|scope: &QueryScope| scope.entitlements == [ReleaseEntitlement::Xlts])
            .times(1)
            .returning(|_| Ok(releases()));
        let fallback = MockCatalogProvider::new();

        let catalog = Catalog::new(Box::new(primary), Box::new(fallback));
        let options = FilterOptions {
            xlts: true,
            ..FilterOptions::default()
        };
        catalog
            .list(
                SearchMode::Default,
                &options,
                GroupMode::All,
                OutputMode::Changeset,
                FormatMode::None,
            )
            .await
            .unwrap();
    }

    #[test]
    fn sanitize_version_accepts_the_version_alphabet() {
        assert_eq!(sanitize_version("2018.3.0f1").unwrap(), "2018.3.0f1");
        assert_eq!(sanitize_version("2019.1.0a9").unwrap(), "2019.1.0a9");
    }

    #[test]
    fn sanitize_version_rejects_other_characters() {
        assert!(sanitize_version("2018.3<script>").is_err());
        assert!(sanitize_version("2018.3 OR 1=1").is_err());
    }
}
