//! Find Unity editor changesets and list Unity releases.
//!
//! The library resolves a Unity version string (e.g. `2020.1.14f1`) to its
//! internal build changeset, and lists/filters/groups known Unity releases
//! across release streams. Release metadata comes from the Unity GraphQL API,
//! with a static changeset database as fallback.

pub mod catalog;
pub mod changeset;
pub mod config;

pub use changeset::error::ChangesetError;
pub use changeset::number::to_number;
pub use changeset::filter::{FilterOptions, filter_changesets};
pub use changeset::group::{GroupMode, group_changesets};
pub use changeset::output::{FormatMode, OutputMode, format_changesets};
pub use changeset::release::{Lifecycle, ReleaseEntitlement, ReleaseStream, UnityChangeset};
pub use changeset::search::{
    Catalog, SearchMode, get_unity_changeset, list_changesets, search_changesets,
};
