use std::fmt;
use std::path::{Path, PathBuf};

use config::{Environment, File, FileStoredFormat, Format, Map, Value, ValueKind};
use directories::BaseDirs;
use ini::{Ini, ParseOption};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Name of the config file looked up in every candidate location
pub const CONFIG_FILE_NAME: &str = "m2sh.ini";

/// Prefix of the environment variables overriding file values
pub const ENV_PREFIX: &str = "MM";

const SYSTEM_CONFIG_PATH: &str = "/etc/m2sh/m2sh.ini";

/// Keys read from the unnamed section of the config file
const FILE_KEYS: [&str; 3] = ["url", "username", "password"];

/// INI reader taking values verbatim from the unnamed section only.
///
/// Backslashes are not escapes; named sections are skipped.
#[derive(Debug, Clone, Copy)]
struct DefaultSectionIni;

impl Format for DefaultSectionIni {
    fn parse(
        &self,
        uri: Option<&String>,
        text: &str,
    ) -> Result<Map<String, Value>, Box<dyn std::error::Error + Send + Sync>> {
        let options = ParseOption {
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, options)?;
        let section = ini.general_section();

        Ok(FILE_KEYS
            .iter()
            .filter_map(|key| {
                section.get(key).map(|value| {
                    (
                        key.to_string(),
                        Value::new(uri, ValueKind::String(value.to_string())),
                    )
                })
            })
            .collect())
    }
}

impl FileStoredFormat for DefaultSectionIni {
    fn file_extensions(&self) -> &'static [&'static str] {
        &["ini"]
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{env} (or {key} in config file) must be set")]
    MissingField {
        key: &'static str,
        env: &'static str,
    },

    #[error("error reading config file {}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },

    #[error("invalid configuration")]
    Invalid(#[source] config::ConfigError),
}

/// Connection settings for the Mattermost server
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server base URL, e.g. https://chat.example.com
    pub url: String,
    pub username: String,
    /// May stay empty; the password is then asked for interactively
    pub password: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "***" };
        f.debug_struct("Config")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &password)
            .finish()
    }
}

/// Where configuration values come from.
///
/// `env` is `None` for the real process environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub search_paths: Vec<PathBuf>,
    pub env: Option<Map<String, String>>,
}

impl ConfigSources {
    /// Sources of a normal run: the default search paths and the process environment
    pub fn discover() -> Self {
        let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
        Self {
            search_paths: search_paths(home.as_deref()),
            env: None,
        }
    }

    /// First candidate path that exists
    pub fn find_config_file(&self) -> Option<&Path> {
        self.search_paths
            .iter()
            .map(PathBuf::as_path)
            .find(|path| path.exists())
    }
}

/// Candidate config file locations, highest priority first
pub fn search_paths(home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".").join(CONFIG_FILE_NAME)];
    if let Some(home) = home {
        paths.push(home.join(format!(".{CONFIG_FILE_NAME}")));
        paths.push(home.join(".config").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(SYSTEM_CONFIG_PATH));
    paths
}

impl Config {
    /// Load configuration from the default file locations and `MM_*` variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&ConfigSources::discover())
    }

    /// Merge defaults, the first existing config file and the environment.
    ///
    /// Only one file is ever read. A variable that is set overrides the file
    /// value even when it is empty.
    pub fn load_from(sources: &ConfigSources) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("url", "")
            .and_then(|b| b.set_default("username", ""))
            .and_then(|b| b.set_default("password", ""))
            .map_err(ConfigError::Invalid)?;

        if let Some(path) = sources.find_config_file() {
            debug!("Using config file {}", path.display());
            let file = config::Config::builder()
                .add_source(
                    File::new(&path.to_string_lossy(), DefaultSectionIni).required(true),
                )
                .build()
                .map_err(|source| ConfigError::File {
                    path: path.to_path_buf(),
                    source,
                })?;
            builder = builder.add_source(file);
        }

        let env = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .source(sources.env.clone());

        builder
            .add_source(env)
            .build()
            .and_then(|built| built.try_deserialize::<Config>())
            .map_err(ConfigError::Invalid)
    }

    /// Check that the fields that cannot be prompted for are present
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::MissingField {
                key: "url",
                env: "MM_URL",
            });
        }
        if self.username.is_empty() {
            return Err(ConfigError::MissingField {
                key: "username",
                env: "MM_USERNAME",
            });
        }
        Ok(())
    }
}
