//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub user to report on when `--user` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Access token for private user history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Base URL of the GitHub REST API.
    pub api_base_url: String,

    /// Events requested per page; the API default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("user", &self.user)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_base_url", &self.api_base_url)
            .field("per_page", &self.per_page)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: None,
            access_token: None,
            api_base_url: gat_github::DEFAULT_API_URL.to_string(),
            per_page: None,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Self::figment(config_path);

        // Load from environment variables (GAT_*)
        figment = figment.merge(Env::prefixed("GAT_"));

        figment.extract()
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }
}

/// Returns the platform-specific config directory for the tracker.
///
/// On Linux: `~/.config/github-activity-tracker`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("github-activity-tracker"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_dirs_config_path_ends_with_app_name() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "github-activity-tracker");
    }

    #[test]
    fn test_default_config_targets_public_api() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "https://api.github.com");
        assert!(config.user.is_none());
        assert!(config.access_token.is_none());
        assert!(config.per_page.is_none());
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
user = "octocat"
api_base_url = "https://github.example.com/api/v3"
per_page = 100
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config: Config = Config::figment(Some(file.path())).extract().unwrap();
        assert_eq!(config.user.as_deref(), Some("octocat"));
        assert_eq!(config.api_base_url, "https://github.example.com/api/v3");
        assert_eq!(config.per_page, Some(100));
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let config = Config {
            access_token: Some("ghp_secret".to_string()),
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
