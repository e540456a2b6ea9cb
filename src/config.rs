//! Category configuration loading.
//!
//! The category mapping is read once at startup from a TOML (or JSON) file
//! and turned into an immutable [`CategoryMap`]. A malformed file is fatal:
//! the engine refuses to start rather than guess at a mapping.
//!
//! # Configuration File Format
//!
//! ```toml
//! [categories]
//! DOCS = [".txt", ".pdf"]
//! IMAGES = ["jpg", "PNG"]
//! ```
//!
//! A `.json` file holding a flat object is accepted as well:
//!
//! ```json
//! { "DOCS": [".txt", ".pdf"], "IMAGES": [".jpg"] }
//! ```
//!
//! Categories keep the order they are written in: when an extension is
//! listed twice, the earlier category wins. A missing `OTHERS` category is
//! synthesized as empty.

use crate::error::ConfigError;
use crate::file_category::{CategoryMap, CategoryTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "filedock.toml";

/// Category configuration as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category name → list of extensions, in file order.
    #[serde(default)]
    pub categories: CategoryTable,
}

impl CategoryConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `filedock.toml` in the current directory
    /// 3. Look for `~/.config/filedock/config.toml` in home directory
    /// 4. Fall back to the built-in category table
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly provided file does not exist, or if
    /// any file found cannot be read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("filedock")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        debug!("no configuration file found, using built-in categories");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// Files ending in `.json` are parsed as a flat JSON object; anything
    /// else is parsed as TOML.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;

        info!(
            path = %path.display(),
            categories = config.categories.len(),
            "loaded category configuration"
        );
        Ok(config)
    }

    /// Parse the TOML form (`[categories]` table).
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Parse the JSON form (flat category → extensions object).
    pub fn from_json_str(content: &str) -> Result<Self, String> {
        let categories: CategoryTable =
            serde_json::from_str(content).map_err(|e| e.to_string())?;
        Ok(Self { categories })
    }

    /// Builds the immutable resolver from this configuration.
    pub fn into_category_map(self) -> CategoryMap {
        CategoryMap::from_table(&self.categories)
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            categories: CategoryMap::standard_table(),
        }
    }
}
