//! Markdown Converter
//!
//! Renders every markdown page in the pages directory to an HTML file in the
//! HTML pages directory.

use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

mod config;
mod converter;
mod renderer;

use config::Config;
use converter::{ConversionReport, Converter};

#[derive(Parser, Debug)]
#[command(name = "md-converter")]
#[command(about = "Render a directory of markdown files to HTML")]
struct Cli {
    /// Directory with markdown sources [env: PAGES_DIR]
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Directory for rendered HTML [env: HTML_PAGES_DIR]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Exit with a failure status if any file could not be converted
    #[arg(long)]
    strict: bool,
}

impl Cli {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(source) = &self.source {
            config.source_dir = source.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        config
    }
}

fn main() -> Result<ExitCode> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();
    let config = cli.apply(Config::from_env()?);

    let converter = Converter::new(&config.source_dir, &config.output_dir);
    let report = converter
        .convert_all()
        .wrap_err("Markdown conversion aborted")?;

    for failure in &report.failed {
        error!(path = %failure.path.display(), error = %failure.error, "File not converted");
    }
    info!(
        converted = report.converted.len(),
        failed = report.failed.len(),
        output = %config.output_dir.display(),
        "Conversion complete"
    );

    Ok(exit_code(cli.strict, &report))
}

/// Per-file failures only fail the process under `--strict`.
fn fails_run(strict: bool, report: &ConversionReport) -> bool {
    strict && !report.failed.is_empty()
}

fn exit_code(strict: bool, report: &ConversionReport) -> ExitCode {
    if fails_run(strict, report) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{ConvertError, FileFailure};

    fn report_with_failure() -> ConversionReport {
        ConversionReport {
            converted: vec![PathBuf::from("html-pages/good.html")],
            failed: vec![FileFailure {
                path: PathBuf::from("pages/bad.md"),
                error: ConvertError::FileName(PathBuf::from("pages/bad.md")),
            }],
        }
    }

    fn base_config() -> Config {
        Config {
            source_dir: "pages".into(),
            output_dir: "html-pages".into(),
        }
    }

    #[test]
    fn test_no_arguments_keeps_environment_config() {
        let cli = Cli::try_parse_from(["md-converter"]).unwrap();
        assert!(!cli.strict);
        assert_eq!(cli.apply(base_config()), base_config());
    }

    #[test]
    fn test_flags_override_dirs() {
        let cli =
            Cli::try_parse_from(["md-converter", "-s", "in", "-o", "out", "--strict"]).unwrap();
        let config = cli.apply(base_config());
        assert!(cli.strict);
        assert_eq!(config.source_dir, PathBuf::from("in"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_strict_run_with_failures_fails() {
        assert!(fails_run(true, &report_with_failure()));
    }

    #[test]
    fn test_lenient_run_with_failures_succeeds() {
        assert!(!fails_run(false, &report_with_failure()));
    }

    #[test]
    fn test_strict_run_without_failures_succeeds() {
        let report = ConversionReport {
            converted: vec![PathBuf::from("html-pages/a.html")],
            failed: Vec::new(),
        };
        assert!(!fails_run(true, &report));
    }
}
