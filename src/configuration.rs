use crate::format::{to_json, Formattable, FormattingError, OutputFormat};
use crate::hydroshare::DEFAULT_API_URL;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;
use url::Url;

pub const DEFAULT_APPLICATION_ID: &str = "hstools";
pub const DEFAULT_CONFIGURATION_FILE_NAME: &str = "config.yml";
pub const CONFIG_DIR_ENV: &str = "HSTOOLS_CONFIG_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("failed to resolve the configuration directory")]
    FailedToFindConfigurationDirectory,
    #[error("failed to load configuration data, because of: {cause}")]
    FailedToLoadData {
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("failed to write configuration data to file, because of: {cause}")]
    FailedToWriteData {
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("invalid API URL {url:?}: {cause}")]
    InvalidApiUrl { url: String, cause: url::ParseError },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Configuration {
    /// Base URL of the HydroShare REST API
    #[serde(skip_serializing_if = "Option::is_none")]
    api_url: Option<String>,
    /// Override for `~/.hs_auth`
    #[serde(skip_serializing_if = "Option::is_none")]
    oauth_credentials: Option<PathBuf>,
    /// Override for `~/.hs_auth_basic`
    #[serde(skip_serializing_if = "Option::is_none")]
    basic_credentials: Option<PathBuf>,
    /// Download directory used when neither the command line nor the
    /// environment names one
    #[serde(skip_serializing_if = "Option::is_none")]
    download_dir: Option<PathBuf>,
}

impl Configuration {
    pub fn api_url(&self) -> Result<Url, ConfigurationError> {
        let url = self.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        Url::parse(url).map_err(|cause| ConfigurationError::InvalidApiUrl {
            url: url.to_string(),
            cause,
        })
    }

    pub fn set_api_url(&mut self, url: &Url) {
        self.api_url = Some(url.to_string());
    }

    pub fn oauth_credentials(&self) -> Option<&Path> {
        self.oauth_credentials.as_deref()
    }

    pub fn set_oauth_credentials(&mut self, path: Option<PathBuf>) {
        self.oauth_credentials = path;
    }

    pub fn basic_credentials(&self) -> Option<&Path> {
        self.basic_credentials.as_deref()
    }

    pub fn set_basic_credentials(&mut self, path: Option<PathBuf>) {
        self.basic_credentials = path;
    }

    pub fn download_dir(&self) -> Option<&Path> {
        self.download_dir.as_deref()
    }

    pub fn set_download_dir(&mut self, path: Option<PathBuf>) {
        self.download_dir = path;
    }

    pub fn get_default_configuration_file_path() -> Result<PathBuf, ConfigurationError> {
        if let Ok(config_dir_str) = std::env::var(CONFIG_DIR_ENV) {
            let mut config_path = PathBuf::from(config_dir_str);
            config_path.push(DEFAULT_CONFIGURATION_FILE_NAME);
            return Ok(config_path);
        }

        match config_dir() {
            Some(configuration_directory) => {
                let mut default_config_file_path = configuration_directory;
                default_config_file_path.push(DEFAULT_APPLICATION_ID);
                default_config_file_path.push(DEFAULT_CONFIGURATION_FILE_NAME);

                Ok(default_config_file_path)
            }
            None => Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }
    }

    /// Load default configuration, creating a default one if none exists
    pub fn load_or_create_default() -> Result<Configuration, ConfigurationError> {
        let default_file_path = Configuration::get_default_configuration_file_path()?;
        debug!(
            "Loading or creating configuration from {}...",
            default_file_path.display()
        );

        if !default_file_path.exists() {
            debug!("Configuration file not found, creating default configuration");
            let default_config = Configuration::default();
            default_config.save(&default_file_path)?;
            return Ok(default_config);
        }

        Configuration::load_from_file(&default_file_path)
    }

    pub fn load_from_file(path: &Path) -> Result<Configuration, ConfigurationError> {
        let configuration = fs::read_to_string(path)
            .map_err(|cause| ConfigurationError::FailedToLoadData {
                cause: Box::new(cause),
            })?;

        // an empty file is a valid, default configuration
        if configuration.trim().is_empty() {
            return Ok(Configuration::default());
        }

        serde_yaml::from_str(&configuration).map_err(|cause| ConfigurationError::FailedToLoadData {
            cause: Box::new(cause),
        })
    }

    pub fn write(&self, writer: Box<dyn Write>) -> Result<(), ConfigurationError> {
        serde_yaml::to_writer(writer, self)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigurationError> {
        // first check if the parent directory exists and try to create it if not
        match path.parent() {
            Some(parent) => {
                fs::create_dir_all(parent)
                    .map_err(|_| ConfigurationError::FailedToFindConfigurationDirectory)?;
            }
            None => return Err(ConfigurationError::FailedToFindConfigurationDirectory),
        }

        let file = File::create(path)
            .map_err(|e| ConfigurationError::FailedToWriteData { cause: Box::new(e) })?;
        self.write(Box::new(file))
    }

    pub fn save_to_default(&self) -> Result<(), ConfigurationError> {
        self.save(&Self::get_default_configuration_file_path()?)
    }
}

impl Formattable for Configuration {
    fn format(&self, f: &OutputFormat) -> Result<String, FormattingError> {
        match f {
            OutputFormat::Json(options) => to_json(self, options),
            OutputFormat::Yaml(_) | OutputFormat::Plain(_) => Ok(serde_yaml::to_string(self)?),
            OutputFormat::Csv(_) => Err(FormattingError::UnsupportedOutputFormat(f.to_string())),
        }
    }
}
