//! Run configuration loaded from `docflow.toml`
//!
//! Every field is optional in the file; missing fields take the defaults.
//!
//! ```toml
//! source_dir = "./src/python"
//! template_dir = "templates"
//! output_dir = "./out"
//! title = "Currency Converter Python Code - Documentation"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::doc::{DEFAULT_TEMPLATE, DEFAULT_TITLE};

/// Conventional config file name looked up in the working directory
pub const CONFIG_FILE: &str = "docflow.toml";

/// Directories, file names and labels for one run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory scanned (non-recursively) for sources
    pub source_dir: PathBuf,
    /// Directory the HTML template is loaded from
    pub template_dir: PathBuf,
    /// Directory both artifacts are written into; created if missing
    pub output_dir: PathBuf,
    pub template_name: String,
    pub html_file: String,
    pub text_file: String,
    /// Source file extension without the dot
    pub extension: String,
    /// Heading of the plain-text report
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("./src/python"),
            template_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("./out"),
            template_name: DEFAULT_TEMPLATE.to_string(),
            html_file: "api_docs.html".to_string(),
            text_file: "api_docs.txt".to_string(),
            extension: "py".to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Errors loading a config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse config from a TOML string
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join(&self.html_file)
    }

    #[must_use]
    pub fn text_path(&self) -> PathBuf {
        self.output_dir.join(&self.text_file)
    }
}
