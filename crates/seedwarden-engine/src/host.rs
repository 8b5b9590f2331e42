//! Helpers behind [`seedwarden_core::ClientStatus`].

use seedwarden_core::ScopeConfig;
use seedwarden_core::scope::target_directory;

/// Whether `host` names the local machine.
#[must_use]
pub fn is_localhost(host: &str) -> bool {
    let host = host.trim().trim_start_matches('[').trim_end_matches(']');
    host.eq_ignore_ascii_case("localhost") || host == "127.0.0.1" || host == "::1"
}

/// Root folder the daemon writes completed downloads to.
///
/// The explicit directory, else the default directory with the category
/// appended, else the default directory itself.
#[must_use]
pub fn output_root(scope: &ScopeConfig, default_dir: Option<&str>) -> Option<String> {
    target_directory(scope, default_dir).or_else(|| {
        default_dir
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loopback_names_are_local() {
        for host in ["localhost", "LocalHost", "127.0.0.1", "::1", "[::1]", " localhost "] {
            assert!(is_localhost(host), "{host}");
        }
        for host in ["nas.lan", "10.0.0.5", "127.0.0.2", "localhost.example.com"] {
            assert!(!is_localhost(host), "{host}");
        }
    }

    #[test]
    fn output_root_prefers_directory_then_category() {
        let explicit = ScopeConfig {
            directory: Some("/data/radarr".to_string()),
            category: Some("movies".to_string()),
        };
        assert_eq!(
            output_root(&explicit, Some("/downloads")).as_deref(),
            Some("/data/radarr")
        );

        let category = ScopeConfig {
            directory: None,
            category: Some("movies".to_string()),
        };
        assert_eq!(
            output_root(&category, Some("/downloads/")).as_deref(),
            Some("/downloads/movies")
        );

        assert_eq!(
            output_root(&ScopeConfig::default(), Some("/downloads")).as_deref(),
            Some("/downloads")
        );
        assert_eq!(output_root(&ScopeConfig::default(), None), None);
    }
}
