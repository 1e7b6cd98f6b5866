//! Unity GraphQL API catalog provider.

use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::cache::ResponseCache;
use crate::catalog::error::CatalogError;
use crate::catalog::provider::{CatalogProvider, QueryScope};
use crate::changeset::release::{ReleaseEntitlement, ReleaseStream, UnityChangeset};
use crate::config::{CACHE_TTL_MS, GRAPHQL_PAGE_LIMIT, UNITY_GRAPHQL_ENDPOINT};

const RELEASES_QUERY: &str = r#"
query GetRelease($limit: Int, $skip: Int, $version: String!, $stream: [UnityReleaseStream!], $entitlements: [UnityReleaseEntitlement!])
{
  getUnityReleases(
    limit: $limit
    skip: $skip
    stream: $stream
    version: $version
    entitlements: $entitlements
  ) {
    totalCount
    edges {
      node {
        version
        shortRevision
        stream
        entitlements
      }
    }
    pageInfo {
      hasNextPage
    }
  }
}
"#;

const MAJOR_VERSIONS_QUERY: &str = r#"
query GetReleaseMajorVersions($entitlements: [UnityReleaseEntitlement!])
{
  getUnityReleaseMajorVersions(
    stream: []
    platform: []
    architecture: []
    entitlements: $entitlements
  ) {
    version
  }
}
"#;

#[derive(Serialize)]
struct GraphQlRequest<'a, V: Serialize> {
    query: &'a str,
    variables: &'a V,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<serde_json::Value>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Serialize)]
struct ReleaseVariables {
    limit: u64,
    skip: u64,
    version: String,
    stream: Vec<ReleaseStream>,
    entitlements: Vec<ReleaseEntitlement>,
}

#[derive(Serialize)]
struct MajorVersionsVariables {
    entitlements: Vec<ReleaseEntitlement>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReleasesData {
    get_unity_releases: ReleaseConnection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseConnection {
    edges: Vec<ReleaseEdge>,
    page_info: PageInfo,
}

#[derive(Deserialize)]
struct ReleaseEdge {
    node: ReleaseNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseNode {
    version: String,
    short_revision: String,
    stream: ReleaseStream,
    entitlements: Vec<ReleaseEntitlement>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MajorVersionsData {
    get_unity_release_major_versions: Vec<MajorVersion>,
}

#[derive(Deserialize)]
struct MajorVersion {
    version: String,
}

/// Catalog provider backed by the Unity GraphQL API.
///
/// Release queries are paginated until the server reports no further pages;
/// each page response is cached per (query, variables) for a short TTL to
/// avoid redundant round trips within one process.
pub struct GraphQlCatalog {
    client: reqwest::Client,
    endpoint: String,
    cache: ResponseCache,
}

impl GraphQlCatalog {
    /// Creates a catalog against a custom endpoint.
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("unity-changeset")
                .build()
                .expect("Failed to create HTTP client"),
            endpoint: endpoint.to_string(),
            cache: ResponseCache::new(CACHE_TTL_MS),
        }
    }

    async fn request<V, T>(&self, query: &str, variables: &V) -> Result<T, CatalogError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let cache_key = cache_key(query, variables)?;
        if let Some(payload) = self.cache.get(&cache_key) {
            debug!("catalog response cache hit");
            return serde_json::from_str(&payload)
                .map_err(|e| CatalogError::InvalidResponse(format!("cached payload: {e}")));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("GraphQL endpoint returned status {}: {}", status, self.endpoint);
            return Err(CatalogError::Api(format!("HTTP error: {status}")));
        }

        let body: GraphQlResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse GraphQL response: {}", e);
            CatalogError::InvalidResponse(e.to_string())
        })?;

        if let Some(errors) = body.errors
            && !errors.is_empty()
        {
            let messages = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(CatalogError::Api(messages));
        }

        let data = body
            .data
            .ok_or_else(|| CatalogError::InvalidResponse("missing response data".to_string()))?;
        let payload = data.to_string();
        let parsed = serde_json::from_value(data)
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
        self.cache.put(&cache_key, payload);

        Ok(parsed)
    }
}

impl Default for GraphQlCatalog {
    fn default() -> Self {
        Self::new(UNITY_GRAPHQL_ENDPOINT)
    }
}

fn cache_key<V: Serialize>(query: &str, variables: &V) -> Result<String, CatalogError> {
    serde_json::to_string(&serde_json::json!({
        "query": query,
        "variables": variables,
    }))
    .map_err(|e| CatalogError::InvalidResponse(e.to_string()))
}

#[async_trait::async_trait]
impl CatalogProvider for GraphQlCatalog {
    async fn fetch_releases(
        &self,
        scope: &QueryScope,
    ) -> Result<Vec<UnityChangeset>, CatalogError> {
        let mut variables = ReleaseVariables {
            limit: GRAPHQL_PAGE_LIMIT,
            skip: 0,
            version: scope.version.clone(),
            stream: scope.streams.clone(),
            entitlements: scope.entitlements.clone(),
        };

        let mut results = Vec::new();
        loop {
            let data: ReleasesData = self.request(RELEASES_QUERY, &variables).await?;
            let connection = data.get_unity_releases;

            results.extend(connection.edges.into_iter().map(|edge| {
                UnityChangeset::with_stream(
                    edge.node.version,
                    edge.node.short_revision,
                    edge.node.stream,
                    edge.node.entitlements,
                )
            }));

            if !connection.page_info.has_next_page {
                break;
            }
            variables.skip += variables.limit;
            debug!("fetching next release page at offset {}", variables.skip);
        }

        Ok(results)
    }

    /// LTS releases are resolved per major version: one sub-query for each
    /// known major, issued concurrently and joined in request-issue order.
    async fn fetch_lts_releases(
        &self,
        entitlements: &[ReleaseEntitlement],
    ) -> Result<Vec<UnityChangeset>, CatalogError> {
        let data: MajorVersionsData = self
            .request(
                MAJOR_VERSIONS_QUERY,
                &MajorVersionsVariables {
                    entitlements: entitlements.to_vec(),
                },
            )
            .await?;

        let scopes: Vec<QueryScope> = data
            .get_unity_release_major_versions
            .into_iter()
            .map(|major| QueryScope {
                version: major.version,
                streams: vec![ReleaseStream::Lts],
                entitlements: entitlements.to_vec(),
            })
            .collect();

        let results =
            try_join_all(scopes.iter().map(|scope| self.fetch_releases(scope))).await?;
        Ok(results.into_iter().flatten().collect())
    }
}
