//! On-disk article store
//!
//! Markdown and HTML bodies live in two separate directories, one file per
//! slug. Writes are whole-file overwrites, so re-running the fetcher with
//! unchanged remote content leaves identical files behind.

use devto_client::Slug;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Which body of an article is being saved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleFormat {
    Markdown,
    Html,
}

impl ArticleFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ArticleFormat::Markdown => "md",
            ArticleFormat::Html => "html",
        }
    }
}

impl std::fmt::Display for ArticleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("slug {0:?} cannot be used as a file name")]
    UnsafeSlug(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct ArticleStore {
    docs_dir: PathBuf,
    html_dir: PathBuf,
}

impl ArticleStore {
    pub fn new(docs_dir: impl Into<PathBuf>, html_dir: impl Into<PathBuf>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            html_dir: html_dir.into(),
        }
    }

    fn dir_for(&self, format: ArticleFormat) -> &Path {
        match format {
            ArticleFormat::Markdown => &self.docs_dir,
            ArticleFormat::Html => &self.html_dir,
        }
    }

    /// Destination path for one body of an article.
    pub fn path_for(&self, slug: &Slug, format: ArticleFormat) -> Result<PathBuf, StorageError> {
        if !slug.is_safe_file_stem() {
            return Err(StorageError::UnsafeSlug(slug.to_string()));
        }
        Ok(self
            .dir_for(format)
            .join(format!("{}.{}", slug, format.extension())))
    }

    /// Write `content` verbatim, replacing any existing file.
    ///
    /// Output directories are expected to exist already.
    pub async fn save(
        &self,
        slug: &Slug,
        content: &str,
        format: ArticleFormat,
    ) -> Result<PathBuf, StorageError> {
        let path = self.path_for(slug, format)?;
        debug!(%slug, %format, path = %path.display(), "Saving article");

        tokio::fs::write(&path, content)
            .await
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(root: &Path) -> ArticleStore {
        let docs = root.join("docs");
        let html = root.join("html-pages");
        std::fs::create_dir_all(&docs).unwrap();
        std::fs::create_dir_all(&html).unwrap();
        ArticleStore::new(docs, html)
    }

    #[test]
    fn test_path_for_picks_directory_and_extension() {
        let store = ArticleStore::new("docs", "html-pages");
        let slug = Slug::new("intro");
        assert_eq!(
            store.path_for(&slug, ArticleFormat::Markdown).unwrap(),
            PathBuf::from("docs/intro.md")
        );
        assert_eq!(
            store.path_for(&slug, ArticleFormat::Html).unwrap(),
            PathBuf::from("html-pages/intro.html")
        );
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let store = ArticleStore::new("docs", "html-pages");
        let err = store
            .path_for(&Slug::new("../escape"), ArticleFormat::Markdown)
            .unwrap_err();
        assert!(matches!(err, StorageError::UnsafeSlug(_)));
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let slug = Slug::new("intro");

        store
            .save(&slug, "first version", ArticleFormat::Markdown)
            .await
            .unwrap();
        let path = store
            .save(&slug, "# Hi", ArticleFormat::Markdown)
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Hi");
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArticleStore::new(dir.path().join("nope"), dir.path().join("nope-html"));

        let err = store
            .save(&Slug::new("intro"), "<h1>Hi</h1>", ArticleFormat::Html)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Write { .. }));
        assert!(!dir.path().join("nope").exists());
    }
}
