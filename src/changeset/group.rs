//! Grouping and reduction of release sequences by minor version.

use indexmap::IndexMap;

use crate::changeset::release::UnityChangeset;

/// Reduction policy applied to each minor-version group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMode {
    /// No reduction.
    #[default]
    All,
    /// Every release in the active lifecycle of each minor version.
    LatestLifecycle,
    /// The newest release of each minor version.
    LatestPatch,
    /// The oldest release within the active lifecycle of each minor version.
    OldestPatch,
}

/// Collapse `changesets` to representatives per minor version under `mode`.
///
/// Caller contract: the input must already be sorted descending by
/// `version_number` — "first" within a group means the newest release and
/// the group's active lifecycle is taken from it. No sorting happens here.
/// Groups are emitted in encounter order; within-group order is preserved.
pub fn group_changesets(changesets: &[UnityChangeset], mode: GroupMode) -> Vec<UnityChangeset> {
    debug_assert!(
        is_sorted_descending(changesets),
        "input must be sorted descending by version number"
    );

    match mode {
        GroupMode::All => changesets.to_vec(),
        GroupMode::LatestLifecycle => group_by_minor(changesets)
            .into_values()
            .flat_map(|group| active_lifecycle_members(&group))
            .cloned()
            .collect(),
        GroupMode::LatestPatch => group_by_minor(changesets)
            .into_values()
            .filter_map(|group| group.first().copied().cloned())
            .collect(),
        GroupMode::OldestPatch => group_by_minor(changesets)
            .into_values()
            .filter_map(|group| active_lifecycle_members(&group).last().copied().cloned())
            .collect(),
    }
}

/// Group releases by their `{major}.{minor}` key, keeping encounter order.
pub(crate) fn group_by_minor<'a>(
    changesets: &'a [UnityChangeset],
) -> IndexMap<&'a str, Vec<&'a UnityChangeset>> {
    let mut groups: IndexMap<&str, Vec<&UnityChangeset>> = IndexMap::new();
    for changeset in changesets {
        groups.entry(changeset.minor.as_str()).or_default().push(changeset);
    }
    groups
}

/// The members of `group` sharing the first element's lifecycle.
fn active_lifecycle_members<'a>(group: &[&'a UnityChangeset]) -> Vec<&'a UnityChangeset> {
    let Some(first) = group.first() else {
        return Vec::new();
    };
    group
        .iter()
        .filter(|c| c.lifecycle == first.lifecycle)
        .copied()
        .collect()
}

pub(crate) fn is_sorted_descending(changesets: &[UnityChangeset]) -> bool {
    changesets
        .windows(2)
        .all(|pair| pair[0].version_number >= pair[1].version_number)
}
