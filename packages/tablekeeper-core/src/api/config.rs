use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default API root (the backend's `/api` prefix on the local dev server)
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Default bound on every request
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Environment variable name for API URL override
pub const ENV_API_URL: &str = "TABLEKEEPER_API_URL";

/// Environment variable name for request timeout override (milliseconds)
pub const ENV_TIMEOUT_MS: &str = "TABLEKEEPER_TIMEOUT_MS";

/// Configuration file structure
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    api: Option<ApiSection>,
}

#[derive(Debug, Deserialize, Default)]
struct ApiSection {
    /// API root URL (e.g., "https://restaurant.example.com/api")
    api_url: Option<String>,
    /// Request timeout in milliseconds
    timeout_ms: Option<u64>,
}

/// Runtime API configuration
#[derive(Debug, Clone)]
pub struct ApiEndpointConfig {
    /// Root every request path is appended to
    pub api_url: String,
    pub timeout: Duration,
    /// Source of the API URL (for logging)
    pub source: ConfigSource,
}

impl Default for ApiEndpointConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            source: ConfigSource::Default,
        }
    }
}

/// Where the configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Using default hardcoded values
    Default,
    /// Loaded from environment variable
    Environment,
    /// Loaded from config file
    ConfigFile,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::ConfigFile => write!(f, "config file"),
        }
    }
}

fn normalize_url(url: &str) -> Option<String> {
    let url = url.trim().trim_end_matches('/');
    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

/// Get the path to the configuration file
fn get_config_file_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|p| p.join("tablekeeper").join("config.toml"))
}

/// Load configuration from the config file
fn load_config_file() -> Option<ConfigFile> {
    let path = get_config_file_path()?;

    if !path.exists() {
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file {:?}: {}", path, e);
            None
        }
    }
}

/// Load API endpoint configuration with priority:
/// 1. Environment variables (TABLEKEEPER_API_URL, TABLEKEEPER_TIMEOUT_MS)
/// 2. Config file (~/.config/tablekeeper/config.toml)
/// 3. Default values
pub fn load_api_config() -> ApiEndpointConfig {
    resolve_config(
        std::env::var(ENV_API_URL).ok(),
        std::env::var(ENV_TIMEOUT_MS).ok(),
        load_config_file(),
    )
}

fn resolve_config(
    env_url: Option<String>,
    env_timeout: Option<String>,
    file: Option<ConfigFile>,
) -> ApiEndpointConfig {
    let section = file.and_then(|f| f.api).unwrap_or_default();

    let (api_url, source) = if let Some(url) = env_url.as_deref().and_then(normalize_url) {
        tracing::info!("Using API URL from environment variable: {}", url);
        (url, ConfigSource::Environment)
    } else if let Some(url) = section.api_url.as_deref().and_then(normalize_url) {
        tracing::info!("Using API URL from config file: {}", url);
        (url, ConfigSource::ConfigFile)
    } else {
        tracing::debug!("Using default API URL: {}", DEFAULT_API_URL);
        (DEFAULT_API_URL.to_string(), ConfigSource::Default)
    };

    let env_timeout = env_timeout.and_then(|raw| match raw.trim().parse::<u64>() {
        Ok(ms) => Some(ms),
        Err(e) => {
            tracing::warn!("Ignoring invalid {}='{}': {}", ENV_TIMEOUT_MS, raw, e);
            None
        }
    });

    let timeout_ms = env_timeout
        .filter(|ms| *ms > 0)
        .or(section.timeout_ms.filter(|ms| *ms > 0))
        .unwrap_or(DEFAULT_TIMEOUT_MS);

    ApiEndpointConfig {
        api_url,
        timeout: Duration::from_millis(timeout_ms),
        source,
    }
}

/// Get the path to the config file for documentation purposes
pub fn get_config_file_path_string() -> String {
    get_config_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/tablekeeper/config.toml".to_string())
}

/// Generate example config file content
pub fn generate_example_config() -> String {
    r#"# Tablekeeper Configuration
# Place this file at: ~/.config/tablekeeper/config.toml

[api]
# API root of the restaurant backend (requests go to <api_url>/customers, ...)
# Default: http://localhost:8080/api
# api_url = "https://restaurant.example.com/api"

# Upper bound for every request, in milliseconds
# Default: 5000
# timeout_ms = 5000
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(toml_src: &str) -> Option<ConfigFile> {
        Some(toml::from_str(toml_src).unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = resolve_config(None, None, None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert_eq!(config.source, ConfigSource::Default);
    }

    #[test]
    fn test_environment_wins_over_file() {
        let config = resolve_config(
            Some(" https://env.example.com/api/ ".to_string()),
            Some("2500".to_string()),
            file("[api]\napi_url = \"https://file.example.com/api\"\ntimeout_ms = 9000\n"),
        );
        assert_eq!(config.api_url, "https://env.example.com/api");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert_eq!(config.source, ConfigSource::Environment);
    }

    #[test]
    fn test_config_file_values() {
        let config = resolve_config(
            None,
            None,
            file("[api]\napi_url = \"https://file.example.com/api/\"\ntimeout_ms = 9000\n"),
        );
        assert_eq!(config.api_url, "https://file.example.com/api");
        assert_eq!(config.timeout, Duration::from_millis(9000));
        assert_eq!(config.source, ConfigSource::ConfigFile);
    }

    #[test]
    fn test_blank_env_and_bad_timeout_fall_through() {
        let config = resolve_config(Some("   ".to_string()), Some("soon".to_string()), None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.source, ConfigSource::Default);
        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let config = resolve_config(None, Some("0".to_string()), None);
        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn test_zero_env_timeout_keeps_file_timeout() {
        let config = resolve_config(None, Some("0".to_string()), file("[api]\ntimeout_ms = 9000\n"));
        assert_eq!(config.timeout, Duration::from_millis(9000));
    }

    #[test]
    fn test_example_config_parses() {
        let parsed: ConfigFile = toml::from_str(&generate_example_config()).unwrap();
        assert!(parsed.api.is_some());
    }
}
