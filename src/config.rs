//! Store connection settings.
//!
//! The dashboard needs exactly two values: the store endpoint and its public
//! access key. They are read once at startup from the environment (optionally
//! seeded from a `.env` file) or from command-line overrides.
//!
//! Missing values are not fatal: the caller turns [`ConfigError`] into an
//! error banner and the dashboard stays up with empty lists.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

/// Environment variables consulted for the store endpoint, in priority order.
pub const URL_VARS: &[&str] = &["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];

/// Environment variables consulted for the access key, in priority order.
pub const KEY_VARS: &[&str] = &[
    "SUPABASE_ANON_KEY",
    "NEXT_PUBLIC_SUPABASE_ANON_KEY",
    "SUPABASE_KEY",
];

/// Error type for configuration resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// One or both values are absent, empty or still a template placeholder.
    #[error("missing store configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    /// The endpoint is present but is not an absolute http(s) URL.
    #[error("invalid store URL '{0}'")]
    InvalidUrl(String),
    /// The `.env` file exists but could not be parsed.
    #[error("failed to load env file: {0}")]
    EnvFile(String),
}

/// Resolved connection settings for the record store.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL of the project, without a trailing slash.
    pub url: String,
    /// Public (anon) access key sent with every request.
    pub key: String,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl StoreConfig {
    /// Resolves settings from explicit overrides, falling back to the
    /// environment for anything not given.
    pub fn resolve(url: Option<String>, key: Option<String>) -> Result<Self, ConfigError> {
        let url = url.or_else(|| first_env(URL_VARS));
        let key = key.or_else(|| first_env(KEY_VARS));
        Self::from_values(url, key)
    }

    /// Validates raw values. Both must be non-empty and not a placeholder.
    pub fn from_values(url: Option<String>, key: Option<String>) -> Result<Self, ConfigError> {
        let url = url.filter(|v| is_usable(v));
        let key = key.filter(|v| is_usable(v));

        let mut missing = Vec::new();
        if url.is_none() {
            missing.push(URL_VARS[0]);
        }
        if key.is_none() {
            missing.push(KEY_VARS[0]);
        }

        match (url, key) {
            (Some(url), Some(key)) => {
                let url = url.trim().trim_end_matches('/').to_string();
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return Err(ConfigError::InvalidUrl(url));
                }
                Ok(Self {
                    url,
                    key: key.trim().to_string(),
                })
            }
            _ => Err(ConfigError::Missing(missing)),
        }
    }
}

/// Loads variables from a `.env` file into the process environment.
///
/// With an explicit path the file must exist. Without one, `.env` in the
/// current directory (or a parent) is used if present. Variables already set
/// in the environment are never overwritten.
pub fn load_env_file(path: Option<&Path>) -> Result<(), ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| ConfigError::EnvFile(e.to_string()))?;
            debug!(path = %path.display(), "loaded env file");
            Ok(())
        }
        None => match dotenvy::dotenv() {
            Ok(found) => {
                debug!(path = %found.display(), "loaded env file");
                Ok(())
            }
            Err(e) if e.not_found() => Ok(()),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable .env file");
                Ok(())
            }
        },
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|v| is_usable(v))
}

/// Returns `false` for empty values and for obvious template placeholders
/// such as `your-project-url` or `<anon-key>`.
pub fn is_usable(value: &str) -> bool {
    let v = value.trim();
    if v.is_empty() {
        return false;
    }
    let lower = v.to_ascii_lowercase();
    let placeholder = lower.starts_with("your")
        || lower.contains("placeholder")
        || lower == "changeme"
        || lower == "undefined"
        || lower == "null"
        || (v.starts_with('<') && v.ends_with('>'));
    !placeholder
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn accepts_real_values() {
        let cfg = StoreConfig::from_values(
            Some("https://abc.supabase.co/".to_string()),
            Some(" eyJhbGciOi ".to_string()),
        )
        .unwrap();
        assert_eq!(cfg.url, "https://abc.supabase.co");
        assert_eq!(cfg.key, "eyJhbGciOi");
    }

    #[test]
    fn reports_every_missing_value() {
        let err = StoreConfig::from_values(None, None).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Missing(vec!["SUPABASE_URL", "SUPABASE_ANON_KEY"])
        );
        assert!(err.to_string().contains("SUPABASE_URL"));
        assert!(err.to_string().contains("SUPABASE_ANON_KEY"));
    }

    #[test]
    fn placeholders_count_as_missing() {
        let err = StoreConfig::from_values(
            Some("your-project-url".to_string()),
            Some("real-key".to_string()),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(vec!["SUPABASE_URL"]));

        let err = StoreConfig::from_values(
            Some("https://abc.supabase.co".to_string()),
            Some("<anon-key>".to_string()),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing(vec!["SUPABASE_ANON_KEY"]));
    }

    #[test]
    fn rejects_non_http_url() {
        let err = StoreConfig::from_values(
            Some("abc.supabase.co".to_string()),
            Some("key".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn debug_output_redacts_key() {
        let cfg = StoreConfig {
            url: "https://abc.supabase.co".to_string(),
            key: "secret".to_string(),
        };
        let dbg = format!("{:?}", cfg);
        assert!(!dbg.contains("secret"));
    }

    #[test]
    fn explicit_env_file_must_exist() {
        let err = load_env_file(Some(Path::new("/nonexistent/codex-vivus.env"))).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile(_)));
    }

    #[test]
    fn explicit_env_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "CODEX_VIVUS_TEST_ENV_VALUE=loaded").unwrap();
        load_env_file(Some(file.path())).unwrap();
        assert_eq!(
            std::env::var("CODEX_VIVUS_TEST_ENV_VALUE").as_deref(),
            Ok("loaded")
        );
    }
}
