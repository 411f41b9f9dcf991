//! docflow CLI - Generate documentation for a directory of Python sources

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use docflow_core::config::CONFIG_FILE;
use docflow_core::{Config, DocflowError, Pipeline, RunLog, RunReport};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docflow")]
#[command(version = docflow_core::VERSION)]
#[command(about = "Static documentation generator for Python sources", long_about = None)]
struct Cli {
    /// Config file (defaults to ./docflow.toml when present)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Directory containing the Python sources
    #[arg(long)]
    source: Option<PathBuf>,

    /// Directory containing the HTML template
    #[arg(long)]
    templates: Option<PathBuf>,

    /// Directory the documentation is written to
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Heading of the plain-text report
    #[arg(long)]
    title: Option<String>,

    /// Show per-file debug output
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    /// Resolve the config file, then apply flag overrides
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None if Path::new(CONFIG_FILE).is_file() => Config::load(Path::new(CONFIG_FILE))?,
            None => Config::default(),
        };

        if let Some(source) = &self.source {
            config.source_dir.clone_from(source);
        }
        if let Some(templates) = &self.templates {
            config.template_dir.clone_from(templates);
        }
        if let Some(output) = &self.output {
            config.output_dir.clone_from(output);
        }
        if let Some(title) = &self.title {
            config.title.clone_from(title);
        }
        Ok(config)
    }

    fn filter(&self) -> EnvFilter {
        if self.verbose {
            return EnvFilter::new("debug");
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli.config().context("Failed to load configuration")?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(cli.filter())
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();

    let mut log = RunLog::new();
    let outcome = tracing::subscriber::with_default(subscriber, || Pipeline::run(&config, &mut log));

    match outcome {
        Ok(RunReport::NothingToDocument) => Ok(ExitCode::SUCCESS),
        Ok(RunReport::Rendered { html, text, .. }) => {
            for path in [html, text].into_iter().flatten() {
                println!("Wrote {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        // Already reported through the run log
        Err(DocflowError::Precondition { .. }) => Ok(ExitCode::FAILURE),
        Err(e) => Err(e.into()),
    }
}
