//! dev.to HTTP client
//!
//! Two endpoints are used:
//! - `GET /api/articles?username=<account>` with the `api-key` header
//! - `GET /api/articles/<account>/<slug>`, sent without credentials

use crate::error::{Error, ErrorContext, Result};
use crate::types::{Account, ArticleDetail, ArticleSummary, Slug};
use reqwest::header::HeaderValue;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Public Forem instance used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "https://dev.to";

const API_KEY_HEADER: &str = "api-key";

/// Connection settings for [`DevToClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            user_agent: concat!("devto-client/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Per-article endpoint payload; the slug we asked for is authoritative.
#[derive(Debug, Deserialize)]
struct ArticleBody {
    body_markdown: String,
    body_html: String,
}

/// dev.to API client. Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct DevToClient {
    client: reqwest::Client,
    base_url: String,
    api_key: HeaderValue,
}

impl DevToClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(Error::Build)?;

        let mut api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| Error::InvalidApiKey)?;
        api_key.set_sensitive(true);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn listing_url(&self, account: &Account) -> String {
        format!(
            "{}/api/articles?username={}",
            self.base_url,
            urlencoding::encode(account)
        )
    }

    fn article_url(&self, account: &Account, slug: &Slug) -> String {
        format!(
            "{}/api/articles/{}/{}",
            self.base_url,
            urlencoding::encode(account),
            urlencoding::encode(slug)
        )
    }

    /// List the articles published by `account`.
    ///
    /// The credential is attached as the `api-key` header.
    pub async fn list_articles(&self, account: &Account) -> Result<Vec<ArticleSummary>> {
        let url = self.listing_url(account);
        debug!(%url, "Listing articles");

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, self.api_key.clone())
            .send()
            .await
            .with_url(&url)?;

        if !response.status().is_success() {
            return Err(Error::Status {
                url,
                status: response.status(),
            });
        }

        let body = response.bytes().await.with_url(&url)?;
        serde_json::from_slice(&body).with_url(&url)
    }

    /// Fetch one article's markdown and HTML bodies.
    ///
    /// No credential is sent: the per-article endpoint is public.
    pub async fn fetch_article(&self, account: &Account, slug: &Slug) -> Result<ArticleDetail> {
        let url = self.article_url(account, slug);
        debug!(%url, "Fetching article");

        let response = self.client.get(&url).send().await.with_url(&url)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                slug: slug.to_string(),
            });
        }

        if !response.status().is_success() {
            return Err(Error::Status {
                url,
                status: response.status(),
            });
        }

        let body = response.bytes().await.with_url(&url)?;
        let ArticleBody {
            body_markdown,
            body_html,
        } = serde_json::from_slice(&body).with_url(&url)?;

        Ok(ArticleDetail {
            slug: slug.clone(),
            body_markdown,
            body_html,
        })
    }
}
