//! Where articles come from
//!
//! The fetcher talks to this trait rather than to the HTTP client directly,
//! so the orchestration can be exercised without a network.

use async_trait::async_trait;
use devto_client::{Account, ArticleDetail, ArticleSummary, DevToClient, Slug};

#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// List every article owned by `account`
    async fn list_articles(&self, account: &Account) -> devto_client::Result<Vec<ArticleSummary>>;

    /// Fetch the full markdown and HTML bodies of one article
    async fn fetch_article(
        &self,
        account: &Account,
        slug: &Slug,
    ) -> devto_client::Result<ArticleDetail>;
}

#[async_trait]
impl ArticleSource for DevToClient {
    async fn list_articles(&self, account: &Account) -> devto_client::Result<Vec<ArticleSummary>> {
        DevToClient::list_articles(self, account).await
    }

    async fn fetch_article(
        &self,
        account: &Account,
        slug: &Slug,
    ) -> devto_client::Result<ArticleDetail> {
        DevToClient::fetch_article(self, account, slug).await
    }
}
