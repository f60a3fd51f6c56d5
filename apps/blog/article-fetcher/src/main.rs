//! Article Fetcher
//!
//! Downloads every article of one dev.to account and stores each article's
//! markdown body in the docs directory and its rendered HTML body in the
//! HTML pages directory.
//!
//! With no arguments everything comes from the environment (see
//! [`config::Config`]); flags override individual settings.

use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use devto_client::{Account, ClientConfig, DevToClient};
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

mod config;
mod fetcher;
mod source;
mod storage;

use config::Config;
use fetcher::{ArticleFetcher, FetchReport, ListingError};
use storage::ArticleStore;

#[derive(Parser, Debug)]
#[command(name = "article-fetcher")]
#[command(about = "Download a dev.to author's articles as markdown and HTML files")]
struct Cli {
    /// Account whose articles are downloaded [env: DEVTO_USERNAME]
    #[arg(short, long)]
    account: Option<String>,

    /// Directory for `<slug>.md` files [env: DOCS_DIR]
    #[arg(long)]
    docs_dir: Option<PathBuf>,

    /// Directory for `<slug>.html` files [env: HTML_PAGES_DIR]
    #[arg(long)]
    html_dir: Option<PathBuf>,

    /// API base URL [env: DEVTO_API_URL]
    #[arg(long)]
    api_url: Option<String>,

    /// Maximum number of articles processed at once [env: FETCH_CONCURRENCY]
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,
}

impl Cli {
    /// Apply command-line overrides on top of the environment configuration.
    fn apply(self, mut config: Config) -> Result<Config> {
        if let Some(account) = self.account {
            config.account = Account::new(account);
        }
        if let Some(dir) = self.docs_dir {
            config.docs_dir = dir;
        }
        if let Some(dir) = self.html_dir {
            config.html_dir = dir;
        }
        if let Some(url) = self.api_url {
            config.base_url = url;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();
    let config = Config::from_env().wrap_err("Invalid fetcher configuration")?;
    let config = cli.apply(config)?;
    info!(?config, "Starting article fetch");

    let client = DevToClient::new(
        ClientConfig::new(config.api_key.clone())
            .with_base_url(config.base_url.clone())
            .with_timeout(config.request_timeout),
    )?;
    let store = ArticleStore::new(config.docs_dir.clone(), config.html_dir.clone());
    let fetcher = ArticleFetcher::new(
        Arc::new(client),
        store,
        config.account.clone(),
        config.concurrency,
    );

    let outcome = fetcher.run().await;
    if let Ok(report) = &outcome {
        log_report(report);
    }

    Ok(exit_code(&outcome))
}

/// Per-article failures are reported but leave the exit status clean; only a
/// failed listing call fails the run.
fn fails_run(outcome: &std::result::Result<FetchReport, ListingError>) -> bool {
    outcome.is_err()
}

fn exit_code(outcome: &std::result::Result<FetchReport, ListingError>) -> ExitCode {
    if fails_run(outcome) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn log_report(report: &FetchReport) {
    for failure in &report.failed {
        warn!(
            slug = %failure.slug,
            stage = %failure.stage,
            error = %failure.error,
            "Article not saved"
        );
    }
    if report.is_complete() {
        info!(
            listed = report.listed,
            saved = report.saved.len(),
            duration_ms = report.duration_ms,
            "Fetch complete"
        );
    } else {
        warn!(
            listed = report.listed,
            saved = report.saved.len(),
            failed = report.failed.len(),
            duration_ms = report.duration_ms,
            "Fetch finished with failures"
        );
    }
}
