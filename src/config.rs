//! Store configuration.
//!
//! The remote backend is usable only when both credentials look right.
//! This is decided once, when a [`StoreConfig`] is built, and the value is
//! then handed to the repository. Nothing here touches the network.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use crate::error::{Error, Result};

/// Environment variable holding the remote endpoint.
pub const REMOTE_URL_VAR: &str = "HOMESTEAD_REMOTE_URL";
/// Environment variable holding the remote access key.
pub const REMOTE_KEY_VAR: &str = "HOMESTEAD_REMOTE_KEY";
/// Overrides the local data directory.
pub const DATA_DIR_VAR: &str = "HOMESTEAD_DATA_DIR";

/// Values that build tooling leaves behind when a credential was never set.
const PLACEHOLDERS: &[&str] = &["undefined", "null"];

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Credentials for the remote backend, already checked for shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: Url,
    pub api_key: String,
    pub timeout: Duration,
}

/// Immutable configuration for the whole process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// `Some` only if the remote backend passed the probe.
    pub remote: Option<RemoteConfig>,
    /// Directory holding the local task and diary files.
    pub data_dir: PathBuf,
}

impl StoreConfig {
    /// Reads credentials and data directory from the environment.
    pub fn from_env() -> Self {
        let url = std::env::var(REMOTE_URL_VAR).ok();
        let key = std::env::var(REMOTE_KEY_VAR).ok();
        Self::new(url.as_deref(), key.as_deref(), default_data_dir())
    }

    /// Probes the given credentials. An unusable pair degrades to local-only.
    pub fn new(url: Option<&str>, api_key: Option<&str>, data_dir: impl Into<PathBuf>) -> Self {
        let remote = match probe(url, api_key) {
            Ok(remote) => {
                info!(endpoint = %remote.url, "remote store configured");
                Some(remote)
            }
            Err(err) => {
                warn!(error = %err, kind = err.kind(), "using local storage only");
                None
            }
        };
        Self {
            remote,
            data_dir: data_dir.into(),
        }
    }

    /// Configuration that never talks to a remote backend.
    pub fn local_only(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            remote: None,
            data_dir: data_dir.into(),
        }
    }

    pub fn is_remote_available(&self) -> bool {
        self.remote.is_some()
    }
}

/// Returns the local data directory.
///
/// The path is determined in the following order:
/// 1. `HOMESTEAD_DATA_DIR` environment variable.
/// 2. `~/.local/share/homestead` (on Linux).
/// 3. `./homestead` (fallback).
pub fn default_data_dir() -> PathBuf {
    std::env::var(DATA_DIR_VAR).map(PathBuf::from).unwrap_or_else(|_| {
        let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("homestead");
        p
    })
}

/// Syntactic check of the two credentials.
///
/// The endpoint must be a non-placeholder http(s) URL with a host and the
/// key must be present and not a placeholder. Reachability is not checked.
pub fn probe(url: Option<&str>, api_key: Option<&str>) -> Result<RemoteConfig> {
    let raw_url = present(url).ok_or_else(|| Error::Configuration("endpoint is not set".into()))?;
    let api_key =
        present(api_key).ok_or_else(|| Error::Configuration("access key is not set".into()))?;

    let url = Url::parse(raw_url)
        .map_err(|e| Error::Configuration(format!("endpoint '{}' is not a URL: {}", raw_url, e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(Error::Configuration(format!(
            "endpoint '{}' is not an http(s) URL",
            raw_url
        )));
    }

    Ok(RemoteConfig {
        url,
        api_key: api_key.to_string(),
        timeout: DEFAULT_TIMEOUT,
    })
}

fn present(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !PLACEHOLDERS.contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_credentials() {
        let remote = probe(Some("https://abc.example.co"), Some("anon-key")).unwrap();
        assert_eq!(remote.url.host_str(), Some("abc.example.co"));
        assert_eq!(remote.api_key, "anon-key");
    }

    #[test]
    fn rejects_missing_or_placeholder_values() {
        assert!(probe(None, Some("key")).is_err());
        assert!(probe(Some("https://a.example"), None).is_err());
        assert!(probe(Some(""), Some("key")).is_err());
        assert!(probe(Some("undefined"), Some("key")).is_err());
        assert!(probe(Some("https://a.example"), Some("undefined")).is_err());
        assert!(probe(Some("https://a.example"), Some("  ")).is_err());
    }

    #[test]
    fn rejects_non_http_endpoints() {
        assert!(probe(Some("not a url"), Some("key")).is_err());
        assert!(probe(Some("ftp://a.example"), Some("key")).is_err());
        assert!(probe(Some("a.example.co"), Some("key")).is_err());
    }

    #[test]
    fn bad_credentials_degrade_to_local() {
        let config = StoreConfig::new(Some("null"), Some("key"), "/tmp/x");
        assert!(!config.is_remote_available());
        assert_eq!(config.data_dir, PathBuf::from("/tmp/x"));
    }
}
