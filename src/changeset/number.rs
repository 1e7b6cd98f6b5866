//! Integer encoding of Unity version strings.
//!
//! A version string is mapped to a single integer so that ascending integer
//! order matches release precedence. Partial strings ("2019.4") can serve as
//! inclusive range bounds: missing fields are filled with the minimum or the
//! maximum depending on the `ceiling` flag.

use std::sync::LazyLock;

use regex::Regex;

/// Pattern for a possibly-partial Unity version string.
///
/// Minor, patch, lifecycle letter and build are all optional trailing
/// components; a string without a leading digit does not match at all.
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.?(\d+)?\.?(\d+)?([a-zA-Z]+)?(\d+)?").expect("version pattern is valid")
});

/// Ordinal of a lifecycle letter within the version key.
///
/// The letter is uppercased and offset from 'A', so 'a' -> 0, 'b' -> 1,
/// 'f' -> 5 and 'p' -> 15. This single mapping defines how lifecycles rank
/// against each other; ordinals stay below 100 so the letter never overflows
/// into the neighbouring radix-100 digit.
pub(crate) fn letter_ordinal(letter: char) -> u64 {
    (letter.to_ascii_uppercase() as u64).saturating_sub('A' as u64)
}

/// Encode a (possibly partial) version string as a comparable integer.
///
/// The key is a fixed-radix-100 positional encoding:
/// `major * 100^4 + minor * 100^3 + patch * 100^2 + lifecycle * 100 + build`.
///
/// With `ceiling = false` missing fields fill with their minimum (0, and 'a'
/// for the lifecycle letter); with `ceiling = true` they fill with their
/// maximum (9999/99/99/99, and 'z'), so `to_number("2019.4", true)` is an
/// inclusive upper bound for every 2019.4 release.
///
/// Total over any input: a string that does not match the version pattern
/// encodes as 0. Not a general-purpose version comparator; patch, build and
/// lifecycle ordinal must stay below 100.
///
/// Examples:
/// - `to_number("2018.3", false)` -> 201803000000
/// - `to_number("2018.3", true)` -> 201803992599
pub fn to_number(version: &str, ceiling: bool) -> u64 {
    let Some(caps) = VERSION_PATTERN.captures(version) else {
        return 0;
    };

    let field = |index: usize, fill: u64| {
        caps.get(index)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(fill)
    };

    let major = field(1, if ceiling { 9999 } else { 0 });
    let minor = field(2, if ceiling { 99 } else { 0 });
    let patch = field(3, if ceiling { 99 } else { 0 });
    let lifecycle = caps
        .get(4)
        .and_then(|m| m.as_str().chars().next())
        .unwrap_or(if ceiling { 'z' } else { 'a' });
    let build = field(5, if ceiling { 99 } else { 0 });

    major * 100_000_000
        + minor * 1_000_000
        + patch * 10_000
        + letter_ordinal(lifecycle) * 100
        + build
}

/// The `{major}.{minor}` prefix of a version string, or as much of it as the
/// string carries. Non-matching input yields an empty string.
pub(crate) fn minor_version(version: &str) -> String {
    let Some(caps) = VERSION_PATTERN.captures(version) else {
        return String::new();
    };
    match (caps.get(1), caps.get(2)) {
        (Some(major), Some(minor)) => format!("{}.{}", major.as_str(), minor.as_str()),
        (Some(major), None) => major.as_str().to_string(),
        _ => String::new(),
    }
}

/// The lifecycle letter of a version string, if present.
pub(crate) fn lifecycle_letter(version: &str) -> Option<char> {
    VERSION_PATTERN
        .captures(version)?
        .get(4)?
        .as_str()
        .chars()
        .next()
}
