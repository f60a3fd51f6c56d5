//! Domain types using the Newtype pattern

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Article slug - short identifier used in URLs and as an output file stem
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the slug can be used verbatim as a file name stem inside an
    /// output directory without escaping it.
    pub fn is_safe_file_stem(&self) -> bool {
        let s = self.0.as_str();
        !s.is_empty()
            && s != "."
            && s != ".."
            && !s.contains(['/', '\\', '\0'])
    }
}

impl Deref for Slug {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account - the username that owns the articles
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account(String);

impl Account {
    /// Create an account from a username, stripping a leading `@`
    pub fn new(username: impl Into<String>) -> Self {
        let username = username.into();
        let trimmed = username.trim();
        let clean = trimmed.strip_prefix('@').unwrap_or(trimmed);
        Self(clean.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Account {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the article listing. Only the slug is needed downstream;
/// the remaining listing fields are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub slug: Slug,
    #[serde(default)]
    pub title: Option<String>,
}

/// Full article content as returned by the per-article endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDetail {
    pub slug: Slug,
    pub body_markdown: String,
    pub body_html: String,
}
