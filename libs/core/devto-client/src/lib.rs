//! dev.to API client
//!
//! A small client for the public Forem articles API used by the blog tools:
//! - listing the articles owned by an account (credentialed)
//! - fetching a single article's markdown and HTML bodies
//!
//! Domain identifiers are newtypes so a slug can never be passed where an
//! account is expected.

mod client;
mod error;
mod types;

pub use client::{ClientConfig, DEFAULT_BASE_URL, DevToClient};
pub use error::{Error, Result};
pub use types::{Account, ArticleDetail, ArticleSummary, Slug};

pub use reqwest::StatusCode;
