// =============================================================================
// Upstream endpoints
// =============================================================================

/// Unity GraphQL endpoint serving release metadata.
pub const UNITY_GRAPHQL_ENDPOINT: &str = "https://services.unity.com/graphql";

/// Static changeset database, used when the GraphQL API is unreachable.
///
/// One `{version}\t{changeset}` pair per line.
pub const UNITY_CHANGESET_DB_URL: &str = "https://mob-sakai.github.io/unity-changeset/db";

// =============================================================================
// Query tuning
// =============================================================================

/// Page size for paginated release queries (upstream cap).
pub const GRAPHQL_PAGE_LIMIT: u64 = 250;

/// API response cache TTL in milliseconds (5 minutes).
pub const CACHE_TTL_MS: i64 = 5 * 60 * 1000;
