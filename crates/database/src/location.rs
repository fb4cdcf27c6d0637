//! Where the database file lives.

use std::path::Path;

/// Database file used when nothing else is configured.
pub const DEFAULT_URL: &str = "sqlite:crm.sqlite3?mode=rwc";

/// File name used inside a scratch directory.
pub const FILE_NAME: &str = "crm.sqlite3";

/// Environment variable that asks for temp-directory storage.
pub const TEMP_STORAGE_VAR: &str = "CRM_TEMP_STORAGE";

/// SQLx URL for a database file at `path`, created on first use.
pub fn url_for_path(path: &Path) -> String {
    format!("sqlite:{}?mode=rwc", path.display())
}

/// SQLx URL for a database in the OS temp directory.
///
/// Used on hosts where the working directory is read-only.
pub fn temp_dir_url() -> String {
    url_for_path(&std::env::temp_dir().join(FILE_NAME))
}

/// Whether a `CRM_TEMP_STORAGE` value turns temp-directory storage on.
///
/// `1` and `true` (any case) do; anything else, or no value, does not.
pub fn temp_storage_enabled(value: Option<&str>) -> bool {
    value
        .map(str::trim)
        .is_some_and(|value| value == "1" || value.eq_ignore_ascii_case("true"))
}

/// Pick the database URL.
///
/// An explicit URL wins; otherwise the temp directory when requested, else
/// [`DEFAULT_URL`].
pub fn resolve_url(explicit: Option<&str>, use_temp_dir: bool) -> String {
    match explicit.map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => url.to_string(),
        None if use_temp_dir => temp_dir_url(),
        None => DEFAULT_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        assert_eq!(resolve_url(None, false), DEFAULT_URL);
        assert_eq!(resolve_url(Some("  "), false), DEFAULT_URL);
        assert_eq!(
            resolve_url(Some("sqlite:other.db?mode=rwc"), true),
            "sqlite:other.db?mode=rwc"
        );

        let temp = resolve_url(None, true);
        assert!(temp.starts_with("sqlite:"));
        assert!(temp.ends_with("crm.sqlite3?mode=rwc"));
    }

    #[test]
    fn test_temp_storage_enabled() {
        assert!(temp_storage_enabled(Some("1")));
        assert!(temp_storage_enabled(Some(" true ")));
        assert!(temp_storage_enabled(Some("TRUE")));
        assert!(!temp_storage_enabled(Some("0")));
        assert!(!temp_storage_enabled(Some("false")));
        assert!(!temp_storage_enabled(Some("")));
        assert!(!temp_storage_enabled(None));
    }
}
