//! Article Fetcher
//!
//! Lists an account's articles, then downloads and saves every article in
//! its own task. Tasks run concurrently up to a fixed limit and are all
//! joined before [`ArticleFetcher::run`] returns, so the caller always gets
//! a complete per-article outcome.

use devto_client::{Account, Slug};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::source::ArticleSource;
use crate::storage::{ArticleFormat, ArticleStore};

/// Step at which an article failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Fetch,
    Save,
    /// The article's task panicked or could not start
    Task,
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureStage::Fetch => "fetch",
            FailureStage::Save => "save",
            FailureStage::Task => "task",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct ArticleFailure {
    pub slug: Slug,
    pub stage: FailureStage,
    pub error: String,
}

impl ArticleFailure {
    fn new(slug: Slug, stage: FailureStage, error: impl ToString) -> Self {
        Self {
            slug,
            stage,
            error: error.to_string(),
        }
    }
}

/// Result of a fetch run
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// Number of articles returned by the listing call
    pub listed: usize,
    /// Articles whose markdown and HTML were both written, sorted by slug
    pub saved: Vec<Slug>,
    /// Articles that produced an error, sorted by slug
    pub failed: Vec<ArticleFailure>,
    pub duration_ms: u64,
}

impl FetchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.saved.len() == self.listed
    }
}

/// Listing the account's articles failed; nothing was fetched or written.
#[derive(Error, Debug)]
#[error("failed to list articles for {account}")]
pub struct ListingError {
    pub account: Account,
    #[source]
    pub source: devto_client::Error,
}

pub struct ArticleFetcher {
    source: Arc<dyn ArticleSource>,
    store: ArticleStore,
    account: Account,
    concurrency: usize,
}

impl ArticleFetcher {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        store: ArticleStore,
        account: Account,
        concurrency: usize,
    ) -> Self {
        Self {
            source,
            store,
            account,
            concurrency: concurrency.max(1),
        }
    }

    /// Download every article of the configured account.
    ///
    /// A listing failure aborts the run. Per-article failures are collected
    /// in the report and never affect sibling articles.
    pub async fn run(&self) -> Result<FetchReport, ListingError> {
        let start = Instant::now();

        let summaries = self
            .source
            .list_articles(&self.account)
            .await
            .map_err(|source| {
                error!(account = %self.account, error = %source, "Failed to list articles");
                ListingError {
                    account: self.account.clone(),
                    source,
                }
            })?;

        info!(
            account = %self.account,
            count = summaries.len(),
            "Getting articles"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut join_set: JoinSet<Result<Slug, ArticleFailure>> = JoinSet::new();
        let mut in_flight: HashMap<tokio::task::Id, Slug> = HashMap::new();

        for summary in summaries {
            let slug = summary.slug;
            let source = Arc::clone(&self.source);
            let store = self.store.clone();
            let account = self.account.clone();
            let semaphore = Arc::clone(&semaphore);
            let task_slug = slug.clone();

            let handle = join_set.spawn(async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return Err(ArticleFailure::new(
                        task_slug,
                        FailureStage::Task,
                        "concurrency limiter closed",
                    ));
                };
                process_article(source.as_ref(), &store, &account, task_slug).await
            });
            in_flight.insert(handle.id(), slug);
        }

        let mut report = FetchReport {
            listed: in_flight.len(),
            ..FetchReport::default()
        };

        while let Some(joined) = join_set.join_next_with_id().await {
            match joined {
                Ok((id, outcome)) => {
                    in_flight.remove(&id);
                    match outcome {
                        Ok(slug) => report.saved.push(slug),
                        Err(failure) => report.failed.push(failure),
                    }
                }
                Err(join_error) => {
                    let slug = in_flight
                        .remove(&join_error.id())
                        .unwrap_or_else(|| Slug::new("<unknown>"));
                    error!(%slug, error = %join_error, "Article task did not complete");
                    report
                        .failed
                        .push(ArticleFailure::new(slug, FailureStage::Task, join_error));
                }
            }
        }

        report.saved.sort();
        report.failed.sort_by(|a, b| a.slug.cmp(&b.slug));
        report.duration_ms = start.elapsed().as_millis() as u64;

        Ok(report)
    }
}

/// Fetch one article and write both of its bodies.
///
/// Both writes are attempted even if the first one fails.
async fn process_article(
    source: &dyn ArticleSource,
    store: &ArticleStore,
    account: &Account,
    slug: Slug,
) -> Result<Slug, ArticleFailure> {
    info!(%slug, "Fetching article");

    let detail = match source.fetch_article(account, &slug).await {
        Ok(detail) => detail,
        Err(e) => {
            error!(%slug, error = %e, "Failed to fetch article");
            return Err(ArticleFailure::new(slug, FailureStage::Fetch, e));
        }
    };

    let mut write_errors = Vec::new();
    for (content, format) in [
        (&detail.body_markdown, ArticleFormat::Markdown),
        (&detail.body_html, ArticleFormat::Html),
    ] {
        info!(%slug, %format, "Saving article");
        if let Err(e) = store.save(&slug, content, format).await {
            warn!(%slug, %format, error = %e, "Failed to save article");
            write_errors.push(e.to_string());
        }
    }

    if write_errors.is_empty() {
        Ok(slug)
    } else {
        Err(ArticleFailure::new(
            slug,
            FailureStage::Save,
            write_errors.join("; "),
        ))
    }
}
