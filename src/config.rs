use color_eyre::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::http::DEFAULT_BLOCK_PATH;
use crate::navigator::{MountConfig, parse_block_codes};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub viewer: ViewerConfig,
    pub logging: LoggingConfig,
}

/// Block API connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub block_path: String,
    pub timeout_secs: u64,
}

/// Which proposal and blocks to show
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub proposal_code: String,
    pub blocks: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_block: Option<String>,
}

/// Log file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

/// Values given on the command line. They win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub proposal_code: Option<String>,
    pub blocks: Option<String>,
    pub initial_block: Option<String>,
    pub base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            block_path: DEFAULT_BLOCK_PATH.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "blockview=info".to_string(),
            directory: None,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Config {
    /// Loads configuration from disk or creates default if not found
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Config::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Loads an explicit configuration file, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|error| {
            color_eyre::eyre::eyre!("Could not read config {}: {}", path.display(), error)
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Returns the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory for log files when none is configured
    pub fn default_log_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_local_dir().to_path_buf())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "blockview")
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine config directory"))
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(proposal_code) = overrides.proposal_code {
            self.viewer.proposal_code = proposal_code;
        }
        if let Some(blocks) = overrides.blocks {
            self.viewer.blocks = parse_block_codes(&blocks);
        }
        if let Some(initial_block) = overrides.initial_block {
            self.viewer.initial_block = Some(initial_block);
        }
        if let Some(base_url) = overrides.base_url {
            self.server.base_url = base_url;
        }
    }

    #[must_use]
    pub fn mount_config(&self) -> MountConfig {
        MountConfig {
            proposal_code: self.viewer.proposal_code.clone(),
            block_codes: self
                .viewer
                .blocks
                .iter()
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty())
                .collect(),
            initial_block: self.viewer.initial_block.clone(),
        }
    }
}
