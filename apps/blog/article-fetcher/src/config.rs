//! Configuration for the article fetcher

use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or_default, env_required};
use devto_client::{Account, DEFAULT_BASE_URL};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_ACCOUNT: &str = "junedang";
const DEFAULT_DOCS_DIR: &str = "docs";
const DEFAULT_HTML_DIR: &str = "html-pages";
const DEFAULT_CONCURRENCY: usize = 8;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct Config {
    /// Credential sent with the listing request
    pub api_key: String,
    /// Owner of the articles to download
    pub account: Account,
    pub base_url: String,
    /// Markdown bodies land here as `<slug>.md`
    pub docs_dir: PathBuf,
    /// HTML bodies land here as `<slug>.html`
    pub html_dir: PathBuf,
    /// Maximum number of articles processed at once
    pub concurrency: usize,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("account", &self.account)
            .field("base_url", &self.base_url)
            .field("docs_dir", &self.docs_dir)
            .field("html_dir", &self.html_dir)
            .field("concurrency", &self.concurrency)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl FromEnv for Config {
    /// Reads from environment variables:
    /// - API_KEY: required, must be non-empty
    /// - DEVTO_USERNAME: defaults to "junedang"
    /// - DEVTO_API_URL: defaults to https://dev.to
    /// - DOCS_DIR / HTML_PAGES_DIR: default to "docs" / "html-pages"
    /// - FETCH_CONCURRENCY: defaults to 8
    /// - REQUEST_TIMEOUT_SECS: defaults to 30
    fn from_env() -> Result<Self, ConfigError> {
        let config = Config {
            api_key: env_required("API_KEY")?,
            account: Account::new(env_or_default("DEVTO_USERNAME", DEFAULT_ACCOUNT)),
            base_url: env_or_default("DEVTO_API_URL", DEFAULT_BASE_URL),
            docs_dir: env_or_default("DOCS_DIR", DEFAULT_DOCS_DIR).into(),
            html_dir: env_or_default("HTML_PAGES_DIR", DEFAULT_HTML_DIR).into(),
            concurrency: env_parse_or_default("FETCH_CONCURRENCY", DEFAULT_CONCURRENCY)?,
            request_timeout: Duration::from_secs(env_parse_or_default(
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
        };

        config.validate()?;
        Ok(config)
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.account.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "DEVTO_USERNAME".to_string(),
                details: "account name must not be empty".to_string(),
            });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                key: "FETCH_CONCURRENCY".to_string(),
                details: "must be at least 1".to_string(),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "REQUEST_TIMEOUT_SECS".to_string(),
                details: "must be at least 1 second".to_string(),
            });
        }
        Ok(())
    }
}
