//! Directory converter
//!
//! Reads each markdown file from a source directory, renders it and writes
//! the HTML next to the other pages in the output directory. Files are
//! processed one after another; a failing file is recorded and skipped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::renderer::MarkdownRenderer;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to list {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file name {0:?} is not valid UTF-8")]
    FileName(PathBuf),
}

/// A source markdown file loaded into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownFile {
    pub name: String,
    pub content: String,
}

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: ConvertError,
}

#[derive(Debug, Default)]
pub struct ConversionReport {
    /// Output files written, in processing order
    pub converted: Vec<PathBuf>,
    pub failed: Vec<FileFailure>,
}

/// Output file name for a source file: the first `.md` becomes `.html`.
pub fn output_name(name: &str) -> String {
    name.replacen(".md", ".html", 1)
}

pub struct Converter {
    source_dir: PathBuf,
    output_dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl Converter {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Regular files directly inside the source directory, sorted by name.
    ///
    /// Subdirectories are skipped; there is no recursion.
    pub fn list_files(&self) -> Result<Vec<PathBuf>, ConvertError> {
        let list_err = |source| ConvertError::List {
            path: self.source_dir.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.source_dir).map_err(list_err)? {
            let entry = entry.map_err(list_err)?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            } else {
                debug!(path = %path.display(), "Skipping non-file entry");
            }
        }
        files.sort();
        Ok(files)
    }

    fn read(&self, path: &Path) -> Result<MarkdownFile, ConvertError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ConvertError::FileName(path.to_path_buf()))?
            .to_string();
        let bytes = fs::read(path).map_err(|source| ConvertError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        // Invalid UTF-8 sequences become U+FFFD rather than failing the file.
        let content = String::from_utf8_lossy(&bytes).into_owned();
        Ok(MarkdownFile { name, content })
    }

    /// Write rendered HTML for the source file `name`, replacing any
    /// existing output.
    pub fn write_output(&self, name: &str, html: &str) -> Result<PathBuf, ConvertError> {
        let path = self.output_dir.join(output_name(name));
        fs::write(&path, html).map_err(|source| ConvertError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    fn convert_file(&self, path: &Path) -> Result<PathBuf, ConvertError> {
        let file = self.read(path)?;
        let html = self.renderer.render(&file.content);
        self.write_output(&file.name, &html)
    }

    /// Convert every file in the source directory.
    ///
    /// Only a failure to list the source directory aborts the run.
    pub fn convert_all(&self) -> Result<ConversionReport, ConvertError> {
        let files = self.list_files()?;
        info!(
            count = files.len(),
            source = %self.source_dir.display(),
            "Converting markdown files"
        );

        let mut report = ConversionReport::default();
        for path in files {
            match self.convert_file(&path) {
                Ok(output) => {
                    debug!(input = %path.display(), output = %output.display(), "Converted");
                    report.converted.push(output);
                }
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "Failed to convert file");
                    report.failed.push(FileFailure { path, error });
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dirs {
        _root: tempfile::TempDir,
        pages: PathBuf,
        html: PathBuf,
    }

    fn dirs() -> Dirs {
        let root = tempfile::tempdir().unwrap();
        let pages = root.path().join("pages");
        let html = root.path().join("html-pages");
        fs::create_dir_all(&pages).unwrap();
        fs::create_dir_all(&html).unwrap();
        Dirs {
            _root: root,
            pages,
            html,
        }
    }

    #[test]
    fn test_output_name_replaces_first_md_only() {
        assert_eq!(output_name("a.md"), "a.html");
        assert_eq!(output_name("notes.md.md"), "notes.html.md");
        assert_eq!(output_name("readme.txt"), "readme.txt");
        assert_eq!(output_name("x.mdx"), "x.htmlx");
    }

    #[test]
    fn test_bold_file_is_rendered() {
        let d = dirs();
        fs::write(d.pages.join("a.md"), "**bold**").unwrap();

        let report = Converter::new(&d.pages, &d.html).convert_all().unwrap();

        assert_eq!(report.converted, vec![d.html.join("a.html")]);
        assert!(report.failed.is_empty());
        assert_eq!(
            fs::read_to_string(d.html.join("a.html")).unwrap(),
            "<p><strong>bold</strong></p>\n"
        );
    }

    #[test]
    fn test_every_markdown_file_gets_html() {
        let d = dirs();
        for name in ["one.md", "two.md", "three.md"] {
            fs::write(d.pages.join(name), format!("# {name}")).unwrap();
        }

        let report = Converter::new(&d.pages, &d.html).convert_all().unwrap();

        assert_eq!(report.converted.len(), 3);
        for stem in ["one", "two", "three"] {
            let html = fs::read_to_string(d.html.join(format!("{stem}.html"))).unwrap();
            assert!(html.starts_with("<h1>"), "unexpected output for {stem}: {html}");
        }
    }

    #[test]
    fn test_subdirectories_are_skipped() {
        let d = dirs();
        fs::create_dir(d.pages.join("drafts.md")).unwrap();
        fs::write(d.pages.join("post.md"), "text").unwrap();

        let converter = Converter::new(&d.pages, &d.html);
        assert_eq!(converter.list_files().unwrap(), vec![d.pages.join("post.md")]);

        let report = converter.convert_all().unwrap();
        assert_eq!(report.converted.len(), 1);
        assert!(!d.html.join("drafts.html").exists());
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let d = dirs();
        fs::write(d.pages.join("cafe.md"), b"# Caf\xe9").unwrap();

        let report = Converter::new(&d.pages, &d.html).convert_all().unwrap();

        assert!(report.failed.is_empty());
        assert_eq!(report.converted, vec![d.html.join("cafe.html")]);
        assert_eq!(
            fs::read_to_string(d.html.join("cafe.html")).unwrap(),
            "<h1>Caf\u{FFFD}</h1>\n"
        );
    }

    #[test]
    fn test_failing_file_does_not_stop_others() {
        let d = dirs();
        fs::write(d.pages.join("bad.md"), "blocked").unwrap();
        fs::write(d.pages.join("good.md"), "fine").unwrap();
        // A directory sitting at the output path makes the write fail.
        fs::create_dir(d.html.join("bad.html")).unwrap();

        let report = Converter::new(&d.pages, &d.html).convert_all().unwrap();

        assert_eq!(report.converted, vec![d.html.join("good.html")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, d.pages.join("bad.md"));
        assert!(matches!(report.failed[0].error, ConvertError::Write { .. }));
        assert!(d.html.join("bad.html").is_dir());
    }

    #[test]
    fn test_missing_source_dir_is_fatal() {
        let d = dirs();
        let err = Converter::new(d.pages.join("absent"), &d.html)
            .convert_all()
            .unwrap_err();
        assert!(matches!(err, ConvertError::List { .. }));
    }

    #[test]
    fn test_missing_output_dir_is_per_file_failure() {
        let d = dirs();
        fs::write(d.pages.join("a.md"), "x").unwrap();

        let report = Converter::new(&d.pages, d.html.join("absent"))
            .convert_all()
            .unwrap();

        assert!(report.converted.is_empty());
        assert!(matches!(report.failed[0].error, ConvertError::Write { .. }));
    }

    #[test]
    fn test_rerun_overwrites_with_identical_content() {
        let d = dirs();
        fs::write(d.pages.join("a.md"), "- item\n").unwrap();
        let converter = Converter::new(&d.pages, &d.html);

        converter.convert_all().unwrap();
        let first = fs::read_to_string(d.html.join("a.html")).unwrap();
        converter.convert_all().unwrap();

        assert_eq!(fs::read_to_string(d.html.join("a.html")).unwrap(), first);
        assert_eq!(fs::read_dir(&d.html).unwrap().count(), 1);
    }
}
