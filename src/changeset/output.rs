//! Rendering of release sequences as plain text or JSON.

use crate::changeset::error::ChangesetError;
use crate::changeset::release::UnityChangeset;

/// What to print for each release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// `{version}\t{changeset}` tuples.
    #[default]
    Changeset,
    /// Version strings only.
    VersionOnly,
    /// Minor version strings only.
    MinorVersionOnly,
}

/// How to render the final sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatMode {
    /// Newline-joined plain text.
    #[default]
    None,
    /// Compact JSON.
    Json,
    /// 2-space-indented JSON.
    PrettyJson,
}

/// Render `changesets` under the selected output and format modes.
pub fn format_changesets(
    changesets: &[UnityChangeset],
    output: OutputMode,
    format: FormatMode,
) -> Result<String, ChangesetError> {
    match output {
        OutputMode::Changeset => match format {
            FormatMode::None => Ok(changesets
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n")),
            FormatMode::Json => Ok(serde_json::to_string(changesets)?),
            FormatMode::PrettyJson => Ok(serde_json::to_string_pretty(changesets)?),
        },
        OutputMode::VersionOnly => {
            let versions: Vec<&str> = changesets.iter().map(|c| c.version.as_str()).collect();
            render_strings(&versions, format)
        }
        OutputMode::MinorVersionOnly => {
            let minors: Vec<&str> = changesets.iter().map(|c| c.minor.as_str()).collect();
            render_strings(&minors, format)
        }
    }
}

fn render_strings(items: &[&str], format: FormatMode) -> Result<String, ChangesetError> {
    match format {
        FormatMode::None => Ok(items.join("\n")),
        FormatMode::Json => Ok(serde_json::to_string(items)?),
        FormatMode::PrettyJson => Ok(serde_json::to_string_pretty(items)?),
    }
}
