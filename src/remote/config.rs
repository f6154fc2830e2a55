//! Diagram service configuration parsed from environment variables.

use super::types::RemoteError;
use crate::diagram::DiagramKind;

pub const DEFAULT_GENERATE_PATH: &str = "/{kind}/generate";
pub const DEFAULT_RENDER_PATH: &str = "/{kind}/render";
pub const DEFAULT_PERSIST_PATH: &str = "/save";
pub const DEFAULT_HISTORY_PATH: &str = "/history";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Endpoint paths. `{kind}` is replaced with `flowchart`, `uml` or `er`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePaths {
    pub generate: String,
    pub render: String,
    pub persist: String,
    pub history: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub paths: RemotePaths,
    pub timeouts: RemoteTimeouts,
}

impl RemoteConfig {
    /// Build typed service config from environment variables.
    ///
    /// Required:
    /// - `DIAGRAM_API_BASE_URL`
    ///
    /// Optional:
    /// - `DIAGRAM_API_GENERATE_PATH`: default `/{kind}/generate`
    /// - `DIAGRAM_API_RENDER_PATH`: default `/{kind}/render`
    /// - `DIAGRAM_API_PERSIST_PATH`: default `/save`
    /// - `DIAGRAM_API_HISTORY_PATH`: default `/history`
    /// - `DIAGRAM_API_REQUEST_TIMEOUT_SECS`: default 120
    /// - `DIAGRAM_API_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::NotConfigured`] if the base URL is absent or
    /// blank, and [`RemoteError::ConfigParse`] if it is not an http(s) URL.
    pub fn from_env() -> Result<Self, RemoteError> {
        let base_url = std::env::var("DIAGRAM_API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(RemoteError::NotConfigured)?;
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RemoteError::ConfigParse(format!("DIAGRAM_API_BASE_URL must be http(s): {base_url}")));
        }

        let paths = RemotePaths {
            generate: env_path("DIAGRAM_API_GENERATE_PATH", DEFAULT_GENERATE_PATH),
            render: env_path("DIAGRAM_API_RENDER_PATH", DEFAULT_RENDER_PATH),
            persist: env_path("DIAGRAM_API_PERSIST_PATH", DEFAULT_PERSIST_PATH),
            history: env_path("DIAGRAM_API_HISTORY_PATH", DEFAULT_HISTORY_PATH),
        };
        let timeouts = RemoteTimeouts {
            request_secs: env_parse_u64("DIAGRAM_API_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("DIAGRAM_API_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { base_url, paths, timeouts })
    }

    /// Absolute URL for `path`, with `{kind}` substituted.
    #[must_use]
    pub fn url(&self, path: &str, kind: Option<DiagramKind>) -> String {
        let path = match kind {
            Some(kind) => path.replace("{kind}", kind.as_str()),
            None => path.to_string(),
        };
        format!("{}{path}", self.base_url)
    }
}

fn env_path(key: &str, default: &str) -> String {
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    if raw.starts_with('/') { raw } else { format!("/{raw}") }
}

pub(crate) fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
