//! Filtering of release sequences by range, pattern and lifecycle.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::changeset::error::ChangesetError;
use crate::changeset::group::{group_by_minor, is_sorted_descending};
use crate::changeset::number::to_number;
use crate::changeset::release::{Lifecycle, UnityChangeset};

/// Options narrowing a release list.
///
/// Empty `min`/`max` leave that bound open. Partial bound strings are
/// inclusive: `min = "2018.3"` admits every 2018.3 release and
/// `max = "2018.3"` does too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Minimum version, inclusive.
    pub min: String,
    /// Maximum version, inclusive.
    pub max: String,
    /// Case-insensitive regular expression matched against the version.
    pub grep: String,
    /// Keep every lifecycle instead of only the active one per minor
    /// version.
    pub all_lifecycles: bool,
    /// Include releases gated behind the XLTS entitlement.
    pub xlts: bool,
}

impl FilterOptions {
    /// Validate the options without running a filter. Malformed `grep`
    /// patterns are rejected here rather than silently matching nothing.
    pub fn validate(&self) -> Result<(), ChangesetError> {
        self.grep_regex().map(|_| ())
    }

    fn grep_regex(&self) -> Result<Option<Regex>, ChangesetError> {
        if self.grep.is_empty() {
            return Ok(None);
        }
        RegexBuilder::new(&self.grep)
            .case_insensitive(true)
            .build()
            .map(Some)
            .map_err(|e| {
                ChangesetError::InvalidInput(format!("invalid grep pattern '{}': {e}", self.grep))
            })
    }
}

/// Narrow `changesets` to those matching `options`, preserving order.
///
/// Caller contract: the input must already be sorted descending by
/// `version_number`. Unless `all_lifecycles` is set, each minor version is
/// restricted to the lifecycle of its first (newest) element — the active
/// lifecycle of that release line — and that restriction is derived from the
/// unfiltered input, before the range and pattern filters apply.
pub fn filter_changesets(
    changesets: &[UnityChangeset],
    options: &FilterOptions,
) -> Result<Vec<UnityChangeset>, ChangesetError> {
    debug_assert!(
        is_sorted_descending(changesets),
        "input must be sorted descending by version number"
    );

    let grep = options.grep_regex()?;
    let min = if options.min.is_empty() {
        u64::MIN
    } else {
        to_number(&options.min, false)
    };
    let max = if options.max.is_empty() {
        u64::MAX
    } else {
        to_number(&options.max, true)
    };

    let active: HashMap<&str, Lifecycle> = group_by_minor(changesets)
        .into_iter()
        .filter_map(|(minor, group)| {
            group.first().and_then(|c| c.lifecycle).map(|l| (minor, l))
        })
        .collect();

    Ok(changesets
        .iter()
        .filter(|c| min <= c.version_number && c.version_number <= max)
        .filter(|c| grep.as_ref().is_none_or(|re| re.is_match(&c.version)))
        .filter(|c| {
            options.all_lifecycles
                || active
                    .get(c.minor.as_str())
                    .is_none_or(|l| c.lifecycle == Some(*l))
        })
        .filter(|c| options.xlts || !c.xlts)
        .cloned()
        .collect())
}
