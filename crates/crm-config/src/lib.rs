use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crm_core::query::{BirthdayMode, QueryParams, SortConfig, SortDirection, SortKey};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const APP_DIR: &str = "crm-dash";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/clientes/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_ADMIN_TIMEOUT_SECS: u64 = 900;
pub const DEFAULT_USER_AGENT: &str = "crm-dash";
pub const MAX_TIMEOUT_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub list: ListConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Data generation can take minutes on the backend.
    pub admin_timeout_secs: u64,
    pub user_agent: String,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn admin_timeout(&self) -> Duration {
        Duration::from_secs(self.admin_timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct ListConfig {
    pub fallback: FallbackMode,
    pub sort: SortKey,
    pub direction: SortDirection,
    pub birthdays: BirthdayMode,
}

impl ListConfig {
    pub fn initial_query(&self) -> QueryParams {
        QueryParams::default()
            .with_birthdays(self.birthdays)
            .with_sort(SortConfig::new(self.sort, self.direction))
    }
}

/// What to show when the customer endpoint fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    Fixtures,
    Fail,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: default_base_url(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
                admin_timeout_secs: DEFAULT_ADMIN_TIMEOUT_SECS,
                user_agent: DEFAULT_USER_AGENT.to_string(),
            },
            list: ListConfig {
                fallback: FallbackMode::Fixtures,
                sort: SortKey::Name,
                direction: SortDirection::Asc,
                birthdays: BirthdayMode::All,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid api base_url {value}: {reason}")]
    InvalidBaseUrl { value: String, reason: String },
    #[error("invalid {field} value: {value} (expected 1..={max})", max = MAX_TIMEOUT_SECS)]
    InvalidTimeout { field: &'static str, value: u64 },
    #[error("invalid user_agent: cannot be empty")]
    EmptyUserAgent,
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api: Option<ApiFile>,
    list: Option<ListFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ApiFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
    admin_timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListFile {
    fallback: Option<FallbackMode>,
    sort: Option<SortKey>,
    direction: Option<SortDirection>,
    birthdays: Option<BirthdayMode>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

/// Validates a base URL and makes sure it ends with `/` so endpoint paths
/// can be joined onto it.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        reason,
    };
    let mut url = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base url is valid")
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(api) = parsed.api {
        if let Some(raw) = api.base_url {
            config.api.base_url = parse_base_url(&raw)?;
        }
        if let Some(secs) = api.timeout_secs {
            config.api.timeout_secs = validate_timeout("timeout_secs", secs)?;
        }
        if let Some(secs) = api.connect_timeout_secs {
            config.api.connect_timeout_secs = validate_timeout("connect_timeout_secs", secs)?;
        }
        if let Some(secs) = api.admin_timeout_secs {
            config.api.admin_timeout_secs = validate_timeout("admin_timeout_secs", secs)?;
        }
        if let Some(agent) = api.user_agent {
            let agent = agent.trim();
            if agent.is_empty() {
                return Err(ConfigError::EmptyUserAgent);
            }
            config.api.user_agent = agent.to_string();
        }
    }

    if let Some(list) = parsed.list {
        if let Some(fallback) = list.fallback {
            config.list.fallback = fallback;
        }
        if let Some(sort) = list.sort {
            config.list.sort = sort;
        }
        if let Some(direction) = list.direction {
            config.list.direction = direction;
        }
        if let Some(birthdays) = list.birthdays {
            config.list.birthdays = birthdays;
        }
    }

    Ok(config)
}

fn validate_timeout(field: &'static str, value: u64) -> Result<u64> {
    if value == 0 || value > MAX_TIMEOUT_SECS {
        return Err(ConfigError::InvalidTimeout { field, value });
    }
    Ok(value)
}
