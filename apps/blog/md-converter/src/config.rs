//! Configuration for the markdown converter

use core_config::{ConfigError, FromEnv, env_or_default};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the markdown sources
    pub source_dir: PathBuf,
    /// Directory receiving the rendered HTML
    pub output_dir: PathBuf,
}

impl FromEnv for Config {
    /// Reads from environment variables with defaults:
    /// - PAGES_DIR: defaults to "pages"
    /// - HTML_PAGES_DIR: defaults to "html-pages"
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            source_dir: env_or_default("PAGES_DIR", "pages").into(),
            output_dir: env_or_default("HTML_PAGES_DIR", "html-pages").into(),
        })
    }
}
