use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const ENV_AUTH_TOKEN: &str = "ST2_AUTH_TOKEN";
pub const ENV_BASE_URL: &str = "ST2_BASE_URL";
pub const ENV_API_URL: &str = "ST2_API_URL";
pub const ENV_CONFIG_FILE: &str = "ST2_CONFIG_FILE";

pub const DEFAULT_BASE_URL: &str = "http://localhost";
pub const DEFAULT_API_PORT: u16 = 9101;

/// Snapshot of everything the client reads from its surroundings.
///
/// Built once per invocation and passed down explicitly; nothing below
/// `main` touches the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Value of `ST2_AUTH_TOKEN`.
    pub env_token: Option<String>,
    /// Value of `ST2_BASE_URL`.
    pub base_url: Option<String>,
    /// Value of `ST2_API_URL`.
    pub api_url: Option<String>,
    /// Value of `ST2_CONFIG_FILE`; `--config` takes precedence.
    pub config_file: Option<PathBuf>,
    /// Contents of the config file, if one was given.
    pub file: Option<ConfigFile>,
}

impl ClientConfig {
    /// Read the process environment once.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            env_token: get(ENV_AUTH_TOKEN),
            base_url: get(ENV_BASE_URL),
            api_url: get(ENV_API_URL),
            config_file: get(ENV_CONFIG_FILE).map(PathBuf::from),
            file: None,
        }
    }

    /// Build from a fixed set of variables.
    pub fn from_vars<'a, I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Attach the contents of a config file.
    pub fn with_file(mut self, file: ConfigFile) -> Self {
        self.file = Some(file);
        self
    }

    /// Resolve the API endpoint.
    ///
    /// Order: explicit override, `ST2_API_URL`, config file `api_url`, then
    /// the base URL (env, config file, default) with the API port appended.
    pub fn api_url(&self, explicit: Option<&str>) -> String {
        let file = self.file.as_ref();
        let api = explicit
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| self.api_url.clone())
            .or_else(|| file.and_then(|f| f.api_url.clone()));
        if let Some(api) = api {
            return api.trim_end_matches('/').to_string();
        }
        let base = self
            .base_url
            .clone()
            .or_else(|| file.and_then(|f| f.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        format!("{}:{}", base.trim_end_matches('/'), DEFAULT_API_PORT)
    }

    /// Token from the config file, if any.
    pub fn file_token(&self) -> Option<&str> {
        self.file
            .as_ref()
            .and_then(|f| f.token.as_deref())
            .filter(|t| !t.is_empty())
    }

    /// Basic credentials from the config file.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.file.as_ref().and_then(|f| f.credentials.as_ref())
    }
}

/// Optional TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub api_url: Option<String>,
    /// Lowest-precedence token, below the CLI flag and `ST2_AUTH_TOKEN`.
    pub token: Option<String>,
    pub credentials: Option<Credentials>,
}

/// `[credentials]` section: HTTP basic auth.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl ConfigFile {
    /// Load a config file. Unlike the environment, a file that was asked
    /// for must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        check_config_permissions(path);

        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))
    }
}

/// Errors that can occur when loading a config file.
#[derive(Debug)]
pub enum ConfigError {
    ReadFailed(PathBuf, std::io::Error),
    ParseFailed(PathBuf, toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed(path, e) => {
                write!(f, "Failed to read config {}: {}", path.display(), e)
            }
            Self::ParseFailed(path, e) => {
                write!(f, "Failed to parse config {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Warn if the config file is world-readable; it may hold a token or a
/// password.
#[cfg(unix)]
pub fn check_config_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let Ok(metadata) = std::fs::metadata(path) else {
        return;
    };

    let mode = metadata.permissions().mode();
    if is_world_readable(mode) {
        tracing::warn!(
            "Config file {} is world-readable (mode {:o}). \
             It may contain credentials -- consider restricting permissions to 600.",
            path.display(),
            mode & 0o7777,
        );
    }
}

#[cfg(not(unix))]
pub fn check_config_permissions(_path: &Path) {}

#[cfg(unix)]
pub fn is_world_readable(mode: u32) -> bool {
    mode & 0o004 != 0
}
