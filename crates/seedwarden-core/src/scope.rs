//! Path normalization and scope filtering for daemon-reported directories.
//!
//! Daemons may run on another host and report paths in either slash style.
//! [`RemotePath`] splits a path into segments once so comparisons ignore
//! separator style, duplicate separators and trailing separators.

use std::fmt::{self, Display, Formatter};

use crate::model::ScopeConfig;

/// Separator convention of a remote path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    /// `/`-separated, case-sensitive.
    Unix,
    /// `\`-separated with a drive or UNC prefix, case-insensitive.
    Windows,
}

/// Normalized path as reported by a (possibly remote) daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePath {
    style: PathStyle,
    rooted: bool,
    unc: bool,
    segments: Vec<String>,
}

impl RemotePath {
    #[must_use]
    /// Parse a raw path, unifying separators.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let unc = trimmed.starts_with("\\\\");
        let backslashed = trimmed.contains('\\') && !trimmed.contains('/');
        let style = if unc || backslashed || has_drive_prefix(trimmed) {
            PathStyle::Windows
        } else {
            PathStyle::Unix
        };
        let rooted = trimmed.starts_with(['/', '\\']);
        let segments = trimmed
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            style,
            rooted,
            unc,
            segments,
        }
    }

    #[must_use]
    /// Separator convention detected for this path.
    pub const fn style(&self) -> PathStyle {
        self.style
    }

    #[must_use]
    /// Whether the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    /// Path segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    /// Whether `other` equals this path or lies beneath it.
    pub fn contains(&self, other: &Self) -> bool {
        if self.segments.len() > other.segments.len() {
            return false;
        }
        let case_insensitive =
            self.style == PathStyle::Windows || other.style == PathStyle::Windows;
        self.segments
            .iter()
            .zip(&other.segments)
            .all(|(parent, child)| segment_eq(parent, child, case_insensitive))
    }

    #[must_use]
    /// Whether any segment equals `name`.
    pub fn has_segment(&self, name: &str) -> bool {
        self.segments.iter().any(|segment| segment == name)
    }

    #[must_use]
    /// Append one or more segments (the child may itself contain separators).
    pub fn join(&self, child: &str) -> Self {
        let mut joined = self.clone();
        joined.segments.extend(
            child
                .split(['/', '\\'])
                .filter(|segment| !segment.is_empty())
                .map(str::to_string),
        );
        joined
    }
}

impl Display for RemotePath {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let separator = match self.style {
            PathStyle::Unix => "/",
            PathStyle::Windows => "\\",
        };
        if self.unc {
            formatter.write_str("\\\\")?;
        } else if self.rooted {
            formatter.write_str(separator)?;
        }
        formatter.write_str(&self.segments.join(separator))
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn segment_eq(left: &str, right: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        left.eq_ignore_ascii_case(right)
    } else {
        left == right
    }
}

/// Whether an item stored under `download_dir` falls inside `scope`.
///
/// A configured directory wins over a category; with neither configured
/// every item is in scope.
#[must_use]
pub fn in_scope(download_dir: &str, scope: &ScopeConfig) -> bool {
    let item_dir = RemotePath::parse(download_dir);
    if let Some(directory) = scope.directory() {
        return RemotePath::parse(directory).contains(&item_dir);
    }
    if let Some(category) = scope.category() {
        return item_dir.has_segment(category);
    }
    true
}

/// Output location of an item: its download directory joined with its name.
#[must_use]
pub fn output_path(download_dir: &str, name: &str) -> String {
    RemotePath::parse(download_dir).join(name).to_string()
}

/// Directory new submissions should be stored under.
///
/// The explicit directory when configured; otherwise the daemon default with
/// the category appended; otherwise `None` so the daemon picks.
#[must_use]
pub fn target_directory(scope: &ScopeConfig, default_dir: Option<&str>) -> Option<String> {
    if let Some(directory) = scope.directory() {
        return Some(directory.to_string());
    }
    let category = scope.category()?;
    let default_dir = default_dir?;
    Some(format!("{}/{category}", default_dir.trim_end_matches(['/', '\\'])))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory_scope(directory: &str) -> ScopeConfig {
        ScopeConfig {
            directory: Some(directory.to_string()),
            category: None,
        }
    }

    fn category_scope(category: &str) -> ScopeConfig {
        ScopeConfig {
            directory: None,
            category: Some(category.to_string()),
        }
    }

    #[test]
    fn directory_scope_keeps_subtree_and_drops_siblings() {
        let scope = directory_scope("C:/Downloads/Finished/radarr");
        assert!(in_scope("C:/Downloads/Finished/radarr", &scope));
        assert!(in_scope("C:/Downloads/Finished/radarr/subdir", &scope));
        assert!(in_scope("C:\\Downloads\\Finished\\radarr\\subdir\\", &scope));
        assert!(!in_scope("C:/Downloads/Finished/transmission", &scope));
        assert!(!in_scope("C:/Downloads/Finished/radarr-extra", &scope));
        assert!(!in_scope("C:/Downloads/Finished", &scope));
    }

    #[test]
    fn directory_scope_collapses_separators() {
        let scope = directory_scope("/data/downloads//movies/");
        assert!(in_scope("/data/downloads/movies", &scope));
        assert!(in_scope("/data//downloads/movies/2024", &scope));
        assert!(!in_scope("/data/downloads/Movies", &scope));
    }

    #[test]
    fn windows_paths_compare_case_insensitively() {
        let scope = directory_scope("C:\\Downloads\\Radarr");
        assert!(in_scope("c:/downloads/radarr/Movie", &scope));
    }

    #[test]
    fn category_scope_matches_any_segment() {
        let scope = category_scope("radarr");
        assert!(in_scope("C:/Downloads/Finished/transmission/radarr", &scope));
        assert!(in_scope("/srv/other/radarr/nested", &scope));
        assert!(!in_scope("C:/Downloads/Finished/transmission", &scope));
        assert!(!in_scope("/srv/radarr-old", &scope));
    }

    #[test]
    fn no_scope_keeps_everything() {
        assert!(in_scope("/anywhere", &ScopeConfig::default()));
    }

    #[test]
    fn output_path_uses_path_style() {
        assert_eq!(
            output_path("C:/Downloads/Finished/transmission", "Droned.S01E01"),
            "C:\\Downloads\\Finished\\transmission\\Droned.S01E01"
        );
        assert_eq!(
            output_path("/downloads/complete/", "Droned.S01E01"),
            "/downloads/complete/Droned.S01E01"
        );
        assert_eq!(
            output_path("\\\\nas\\share\\done", "Movie"),
            "\\\\nas\\share\\done\\Movie"
        );
    }

    #[test]
    fn target_directory_prefers_explicit_directory() {
        let scope = ScopeConfig {
            directory: Some("C:/Downloads/Finished/radarr".to_string()),
            category: Some("radarr".to_string()),
        };
        assert_eq!(
            target_directory(&scope, Some("C:/Downloads/Finished/transmission")),
            Some("C:/Downloads/Finished/radarr".to_string())
        );
    }

    #[test]
    fn target_directory_appends_category_without_double_slash() {
        let scope = category_scope("radarr");
        assert_eq!(
            target_directory(&scope, Some("C:/Downloads/Finished/transmission/")),
            Some("C:/Downloads/Finished/transmission/radarr".to_string())
        );
        assert_eq!(
            target_directory(&scope, Some("C:/Downloads/Finished/transmission")),
            Some("C:/Downloads/Finished/transmission/radarr".to_string())
        );
    }

    #[test]
    fn target_directory_defaults_to_daemon() {
        assert_eq!(
            target_directory(&ScopeConfig::default(), Some("/downloads")),
            None
        );
    }
}
