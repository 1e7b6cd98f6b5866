//! The Unity release record and its classification enums.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::changeset::error::ChangesetError;
use crate::changeset::number::{letter_ordinal, lifecycle_letter, minor_version, to_number};

/// Pattern for a Unity Hub deep link, `unityhub://{version}/{changeset}`.
static HUB_LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^unityhub://(\d{4}\.\d+\.\d+(a|b|f)\d+)/(\w{12})$")
        .expect("hub link pattern is valid")
});

/// Upstream release channel classification.
///
/// Independent of [`Lifecycle`]: a build can be lifecycle `f` and stream
/// `LTS` at the same time. Serialized names match the Unity GraphQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseStream {
    Lts,
    Supported,
    Tech,
    Beta,
    Alpha,
    #[serde(other)]
    Undefined,
}

/// Access-tier tag gating availability of a release.
///
/// Serialized names match the Unity GraphQL enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseEntitlement {
    Xlts,
    U7Alpha,
}

/// Release lifecycle, encoded as a single letter suffix in the version
/// string (e.g. the `f` in `2020.1.14f1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    #[serde(rename = "a")]
    Alpha,
    #[serde(rename = "b")]
    Beta,
    #[serde(rename = "f")]
    Final,
    #[serde(rename = "p")]
    Patch,
}

impl Lifecycle {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'a' => Some(Self::Alpha),
            'b' => Some(Self::Beta),
            'f' => Some(Self::Final),
            'p' => Some(Self::Patch),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Self::Alpha => 'a',
            Self::Beta => 'b',
            Self::Final => 'f',
            Self::Patch => 'p',
        }
    }

    /// Rank of this lifecycle within the version key encoding.
    pub fn ordinal(self) -> u64 {
        letter_ordinal(self.letter())
    }
}

/// One known Unity build: a version string plus its immutable changeset.
///
/// The derived fields (`version_number`, `minor`, `lifecycle`, `lts`,
/// `xlts`) are computed once at construction and never mutated; filtering
/// and grouping produce new sequences instead of modifying records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnityChangeset {
    pub version: String,
    pub changeset: String,
    pub stream: ReleaseStream,
    pub entitlements: Vec<ReleaseEntitlement>,
    /// Total-order key, ascending from older to newer releases.
    pub version_number: u64,
    /// `{major}.{minor}` grouping key for the release line.
    pub minor: String,
    pub lifecycle: Option<Lifecycle>,
    pub lts: bool,
    pub xlts: bool,
}

impl UnityChangeset {
    /// A release with no stream classification (e.g. from the changeset db).
    pub fn new(version: impl Into<String>, changeset: impl Into<String>) -> Self {
        Self::with_stream(version, changeset, ReleaseStream::Undefined, Vec::new())
    }

    pub fn with_stream(
        version: impl Into<String>,
        changeset: impl Into<String>,
        stream: ReleaseStream,
        entitlements: Vec<ReleaseEntitlement>,
    ) -> Self {
        let version = version.into();
        let version_number = to_number(&version, false);
        let minor = minor_version(&version);
        let lifecycle = lifecycle_letter(&version).and_then(Lifecycle::from_letter);
        let lts = stream == ReleaseStream::Lts;
        let xlts = entitlements.contains(&ReleaseEntitlement::Xlts);

        Self {
            version,
            changeset: changeset.into(),
            stream,
            entitlements,
            version_number,
            minor,
            lifecycle,
            lts,
            xlts,
        }
    }

    /// Whether `href` is a Unity Hub deep link carrying a version and a
    /// changeset.
    pub fn is_valid_hub_link(href: &str) -> bool {
        HUB_LINK_PATTERN.is_match(href)
    }

    /// Parse a `unityhub://{version}/{changeset}` deep link.
    pub fn from_hub_link(href: &str) -> Option<Self> {
        let caps = HUB_LINK_PATTERN.captures(href)?;
        Some(Self::new(&caps[1], &caps[3]))
    }

    /// The Unity Hub deep link installing this build.
    pub fn to_hub_link(&self) -> String {
        format!("unityhub://{}/{}", self.version, self.changeset)
    }
}

impl fmt::Display for UnityChangeset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.version, self.changeset)
    }
}

impl FromStr for UnityChangeset {
    type Err = ChangesetError;

    /// Parses the `{version}\t{changeset}` form produced by [`fmt::Display`]
    /// (and used by the changeset db).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (version, changeset) = s.split_once('\t').ok_or_else(|| {
            ChangesetError::InvalidInput(format!("expected '{{version}}\\t{{changeset}}': '{s}'"))
        })?;
        if version.is_empty() {
            return Err(ChangesetError::InvalidInput(
                "version must be a non-empty string".to_string(),
            ));
        }
        if changeset.is_empty() {
            return Err(ChangesetError::InvalidInput(
                "changeset must be a non-empty string".to_string(),
            ));
        }
        Ok(Self::new(version, changeset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_derives_fields_from_the_version_string() {
        let changeset = UnityChangeset::new("2018.3.0f1", "abc123");
        assert_eq!(changeset.version, "2018.3.0f1");
        assert_eq!(changeset.changeset, "abc123");
        assert_eq!(changeset.stream, ReleaseStream::Undefined);
        assert_eq!(changeset.entitlements, vec![]);
        assert_eq!(changeset.minor, "2018.3");
        assert_eq!(changeset.lifecycle, Some(Lifecycle::Final));
        assert_eq!(changeset.version_number, to_number("2018.3.0f1", false));
        assert!(!changeset.lts);
        assert!(!changeset.xlts);
    }

    #[test]
    fn with_stream_sets_the_lts_flag() {
        let changeset = UnityChangeset::with_stream(
            "2018.4.0f1",
            "abc123",
            ReleaseStream::Lts,
            Vec::new(),
        );
        assert!(changeset.lts);
        assert!(!changeset.xlts);
    }

    #[test]
    fn with_stream_sets_the_xlts_flag_from_entitlements() {
        let changeset = UnityChangeset::with_stream(
            "2018.4.0f1",
            "abc123",
            ReleaseStream::Lts,
            vec![ReleaseEntitlement::Xlts],
        );
        assert!(changeset.lts);
        assert!(changeset.xlts);
        assert_eq!(changeset.entitlements, vec![ReleaseEntitlement::Xlts]);
    }

    #[test]
    fn display_renders_a_tab_separated_pair() {
        let changeset = UnityChangeset::new("2018.3.0f1", "abc123");
        assert_eq!(changeset.to_string(), "2018.3.0f1\tabc123");
    }

    #[test]
    fn from_str_round_trips_display() {
        let original = UnityChangeset::new("2018.3.0f2", "6e9a27477296");
        let parsed: UnityChangeset = original.to_string().parse().unwrap();
        assert_eq!(parsed.version, original.version);
        assert_eq!(parsed.changeset, original.changeset);
        assert_eq!(parsed, original);
    }

    #[rstest]
    #[case("2018.3.0f1")]
    #[case("\tabc123")]
    #[case("2018.3.0f1\t")]
    #[case("")]
    fn from_str_rejects_malformed_lines(#[case] line: &str) {
        assert!(line.parse::<UnityChangeset>().is_err());
    }

    #[rstest]
    #[case("unityhub://2019.1.0a9/0acd256790e8", true)]
    #[case("unityhub://2018.3.0f2/6e9a27477296", true)]
    #[case("unityhub://2018.3/6e9a27477296", false)]
    #[case("unityhub://2018.3.0f2/short", false)]
    #[case("https://unity3d.com/get-unity/download/archive", false)]
    fn is_valid_hub_link_matches_complete_links(#[case] href: &str, #[case] expected: bool) {
        assert_eq!(UnityChangeset::is_valid_hub_link(href), expected);
    }

    #[test]
    fn hub_link_round_trips() {
        let changeset =
            UnityChangeset::from_hub_link("unityhub://2018.3.0f2/6e9a27477296").unwrap();
        assert_eq!(changeset.version, "2018.3.0f2");
        assert_eq!(changeset.changeset, "6e9a27477296");
        assert_eq!(
            changeset.to_hub_link(),
            "unityhub://2018.3.0f2/6e9a27477296"
        );
    }

    #[test]
    fn serializes_to_camel_case_json() {
        let changeset = UnityChangeset::with_stream(
            "2018.4.0f1",
            "abc123def456",
            ReleaseStream::Lts,
            vec![ReleaseEntitlement::Xlts],
        );
        let json = serde_json::to_value(&changeset).unwrap();
        assert_eq!(json["version"], "2018.4.0f1");
        assert_eq!(json["changeset"], "abc123def456");
        assert_eq!(json["stream"], "LTS");
        assert_eq!(json["entitlements"][0], "XLTS");
        assert_eq!(json["versionNumber"], 201804000501_u64);
        assert_eq!(json["minor"], "2018.4");
        assert_eq!(json["lifecycle"], "f");
        assert_eq!(json["lts"], true);
        assert_eq!(json["xlts"], true);
    }
}
