//! Layered settings: built-in defaults, then a `.env` file, then the process
//! environment. Keys are matched case-insensitively.

use crate::error::{ConfigError, Result};
use config::{Config, Environment};
use serde::Deserialize;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default Joplin Data API address (the desktop app's Web Clipper service).
pub const DEFAULT_JOPLIN_BASE_URL: &str = "http://127.0.0.1:41184";
/// Default listen host.
pub const DEFAULT_MCP_HOST: &str = "127.0.0.1";
/// Default listen port.
pub const DEFAULT_MCP_PORT: u16 = 5005;
/// Default timeout for calls to the Joplin Data API, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: f64 = 15.0;
/// Env file read when the caller does not name one.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Validated runtime settings.
#[derive(Clone, PartialEq)]
pub struct Settings {
    /// Joplin Data API token, sent as the `token` query parameter
    pub joplin_token: String,
    /// Joplin Data API base URL
    pub joplin_base_url: Url,
    /// Shared secret expected in the `x-api-key` header
    pub mcp_api_key: String,
    /// Listen host
    pub mcp_host: String,
    /// Listen port
    pub mcp_port: u16,
    /// Backend call timeout in seconds
    pub http_timeout_seconds: f64,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    joplin_token: Option<String>,
    joplin_base_url: String,
    mcp_api_key: Option<String>,
    mcp_host: String,
    mcp_port: i64,
    http_timeout_seconds: f64,
}

impl Settings {
    /// Load settings from `env_file` (if it exists) and the process environment.
    ///
    /// # Errors
    ///
    /// Fails when `JOPLIN_TOKEN` or `MCP_API_KEY` is missing, a value is out
    /// of range, or the env file cannot be parsed.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        Self::load_from(env_file, utf8_vars(std::env::vars_os()))
    }

    /// Like [`Settings::load`], with an explicit variable set standing in for
    /// the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::load`].
    pub fn load_from<I>(env_file: Option<&Path>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let file_vars = match env_file {
            Some(path) if path.is_file() => read_env_file(path)?,
            Some(path) => {
                debug!(path = %path.display(), "env file not found, skipping");
                HashMap::new()
            }
            None => HashMap::new(),
        };
        let process_vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(key, value)| (key.to_lowercase(), value))
            .collect();

        let raw: RawSettings = Config::builder()
            .set_default("joplin_base_url", DEFAULT_JOPLIN_BASE_URL)?
            .set_default("mcp_host", DEFAULT_MCP_HOST)?
            .set_default("mcp_port", i64::from(DEFAULT_MCP_PORT))?
            .set_default("http_timeout_seconds", DEFAULT_HTTP_TIMEOUT_SECONDS)?
            .add_source(Environment::default().source(Some(file_vars)))
            .add_source(Environment::default().source(Some(process_vars)))
            .build()?
            .try_deserialize()?;

        raw.validate()
    }

    /// `host:port` string to bind the listener to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.mcp_host, self.mcp_port)
    }

    /// Backend call timeout.
    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.http_timeout_seconds)
    }

    /// Apply command-line overrides for the listen address.
    #[must_use]
    pub fn with_bind_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.mcp_host = host;
        }
        if let Some(port) = port {
            self.mcp_port = port;
        }
        self
    }
}

impl RawSettings {
    fn validate(self) -> Result<Settings> {
        let joplin_token = required("JOPLIN_TOKEN", self.joplin_token)?;
        let mcp_api_key = required("MCP_API_KEY", self.mcp_api_key)?;

        let joplin_base_url =
            Url::parse(&self.joplin_base_url).map_err(|e| ConfigError::InvalidValue {
                key: "JOPLIN_BASE_URL",
                reason: e.to_string(),
            })?;
        if !matches!(joplin_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                key: "JOPLIN_BASE_URL",
                reason: format!("unsupported scheme '{}'", joplin_base_url.scheme()),
            });
        }

        let mcp_port = u16::try_from(self.mcp_port)
            .ok()
            .filter(|port| *port >= 1)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "MCP_PORT",
                reason: format!("{} is outside 1..=65535", self.mcp_port),
            })?;

        if !(self.http_timeout_seconds.is_finite() && self.http_timeout_seconds > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "HTTP_TIMEOUT_SECONDS",
                reason: format!("{} is not a positive number", self.http_timeout_seconds),
            });
        }

        Ok(Settings {
            joplin_token,
            joplin_base_url,
            mcp_api_key,
            mcp_host: self.mcp_host,
            mcp_port,
            http_timeout_seconds: self.http_timeout_seconds,
        })
    }
}

/// Drop variables whose name or value is not valid UTF-8.
fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter().filter_map(|(key, value)| {
        let key = key.into_string().ok()?;
        match value.into_string() {
            Ok(value) => Some((key, value)),
            Err(_) => {
                debug!(key = %key, "skipping environment variable with non UTF-8 value");
                None
            }
        }
    })
}

fn required(key: &'static str, value: Option<String>) -> Result<String> {
    match value {
        None => Err(ConfigError::Missing(key)),
        Some(value) if value.is_empty() => Err(ConfigError::Empty(key)),
        Some(value) => Ok(value),
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let to_error = |source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    dotenvy::from_path_iter(path)
        .map_err(to_error)?
        .map(|item| {
            item.map(|(key, value)| (key.to_lowercase(), value))
                .map_err(to_error)
        })
        .collect()
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("joplin_token", &"<redacted>")
            .field("joplin_base_url", &self.joplin_base_url.as_str())
            .field("mcp_api_key", &"<redacted>")
            .field("mcp_host", &self.mcp_host)
            .field("mcp_port", &self.mcp_port)
            .field("http_timeout_seconds", &self.http_timeout_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base() -> Vec<(String, String)> {
        vars(&[("JOPLIN_TOKEN", "t"), ("MCP_API_KEY", "k")])
    }

    fn env_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let settings = Settings::load_from(None, vars(&[("JOPLIN_TOKEN", "t0k"), ("MCP_API_KEY", "k")])).unwrap();

        assert_eq!(settings.joplin_token, "t0k");
        assert_eq!(settings.joplin_base_url.as_str(), "http://127.0.0.1:41184/");
        assert_eq!(settings.mcp_api_key, "k");
        assert_eq!(settings.bind_address(), "127.0.0.1:5005");
        assert_eq!(settings.http_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = Settings::load_from(None, vars(&[("MCP_API_KEY", "k")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JOPLIN_TOKEN")));
    }

    #[test]
    fn empty_token_is_an_error() {
        let err = Settings::load_from(None, vars(&[("JOPLIN_TOKEN", ""), ("MCP_API_KEY", "k")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Empty("JOPLIN_TOKEN")));
    }

    #[test]
    fn keys_are_case_insensitive_and_unknown_keys_ignored() {
        let settings = Settings::load_from(
            None,
            vars(&[
                ("joplin_token", "abc"),
                ("mcp_api_key", "k"),
                ("Mcp_Port", "9000"),
                ("SOMETHING_ELSE", "x"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.joplin_token, "abc");
        assert_eq!(settings.mcp_port, 9000);
    }

    #[test]
    fn process_environment_overrides_env_file() {
        let file = env_file(
            "JOPLIN_TOKEN=from-file\nMCP_API_KEY=secret\nHTTP_TIMEOUT_SECONDS=2.5\nMCP_PORT=7000\n",
        );

        let settings =
            Settings::load_from(Some(file.path()), vars(&[("MCP_PORT", "7100")])).unwrap();

        assert_eq!(settings.joplin_token, "from-file");
        assert_eq!(settings.mcp_api_key, "secret");
        assert_eq!(settings.mcp_port, 7100);
        assert_eq!(settings.http_timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn missing_env_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.env");
        let settings = Settings::load_from(Some(&path), base()).unwrap();
        assert_eq!(settings.joplin_token, "t");
    }

    #[test]
    fn port_out_of_range_is_rejected() {
        for port in ["0", "65536", "-1"] {
            let err = Settings::load_from(None, vars(&[("JOPLIN_TOKEN", "t"), ("MCP_API_KEY", "k"), ("MCP_PORT", port)]))
                .unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { key: "MCP_PORT", .. }),
                "port {port}: {err}"
            );
        }
    }

    #[test]
    fn non_positive_timeout_is_rejected() {
        let err = Settings::load_from(
            None,
            vars(&[("JOPLIN_TOKEN", "t"), ("MCP_API_KEY", "k"), ("HTTP_TIMEOUT_SECONDS", "0")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "HTTP_TIMEOUT_SECONDS",
                ..
            }
        ));
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let err = Settings::load_from(
            None,
            vars(&[("JOPLIN_TOKEN", "t"), ("MCP_API_KEY", "k"), ("JOPLIN_BASE_URL", "ftp://host")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "JOPLIN_BASE_URL",
                ..
            }
        ));
    }

    #[test]
    fn api_key_is_required_and_non_empty() {
        let err = Settings::load_from(None, vars(&[("JOPLIN_TOKEN", "t")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("MCP_API_KEY")));

        let err = Settings::load_from(None, vars(&[("JOPLIN_TOKEN", "t"), ("MCP_API_KEY", "")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Empty("MCP_API_KEY")));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let settings = Settings::load_from(
            None,
            vars(&[("JOPLIN_TOKEN", "super-token"), ("MCP_API_KEY", "super-key")]),
        )
        .unwrap();
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("super-token"));
        assert!(!rendered.contains("super-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    #[cfg(unix)]
    fn non_utf8_variables_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let os = |s: &str| OsString::from(s);
        let raw = vec![
            (os("JOPLIN_TOKEN"), os("tok")),
            (os("MCP_API_KEY"), os("key")),
            (os("MCP_HOST"), OsString::from_vec(vec![0x66, 0xff, 0x6f])),
            (OsString::from_vec(vec![0xfe, 0x41]), os("ignored")),
        ];

        let settings = Settings::load_from(None, utf8_vars(raw)).unwrap();
        assert_eq!(settings.joplin_token, "tok");
        assert_eq!(settings.mcp_host, DEFAULT_MCP_HOST);
    }

    #[test]
    fn bind_overrides_replace_host_and_port() {
        let settings = Settings::load_from(None, base())
            .unwrap()
            .with_bind_overrides(Some("0.0.0.0".to_string()), Some(9999));
        assert_eq!(settings.bind_address(), "0.0.0.0:9999");
    }
}
