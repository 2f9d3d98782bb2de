//! Target framework moniker normalization
//!
//! MSBuild reports `TargetFramework`/`TargetFrameworks` as a `;`-separated list
//! of monikers such as `net8.0`, `netcoreapp3.1`, `net472` or
//! `net8.0-windows`. Only the `net<major>.<minor>` and
//! `netcoreapp<major>.<minor>` shapes carry a runtime major version; every
//! other moniker is ignored.

use super::version::VersionKey;
use regex::Regex;
use std::sync::OnceLock;

fn moniker_regex() -> &'static Regex {
    static MONIKER: OnceLock<Regex> = OnceLock::new();
    MONIKER.get_or_init(|| Regex::new(r"^net(?:coreapp)?([0-9]+)\.[0-9]+$").expect("valid regex"))
}

/// Maps a single moniker to its version key, or `None` if it does not match.
pub fn normalize_moniker(moniker: &str) -> Option<VersionKey> {
    let captures = moniker_regex().captures(moniker)?;
    captures
        .get(1)
        .and_then(|m| VersionKey::from_digits(m.as_str()))
}

/// Splits a raw property value on `;` and normalizes every entry.
///
/// Entries are trimmed and empty entries dropped. Output preserves input
/// order and may contain duplicates; the aggregating set dedupes.
pub fn normalize(raw: &str) -> Vec<VersionKey> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(normalize_moniker)
        .collect()
}
