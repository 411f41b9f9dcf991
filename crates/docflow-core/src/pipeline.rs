//! End-to-end documentation run
//!
//! A run has four sequential phases: the source directory check, the
//! template directory check, extraction, and rendering. The checks halt the
//! run on failure. Extraction failures are isolated per file. Rendering runs
//! both renderers independently, so one artifact can fail without the other.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::doc::{document_file, Declaration, HtmlRenderer, Renderer, TextRenderer};
use crate::error::DocflowError;
use crate::log::RunLog;
use crate::source::SourceLoader;

/// Outcome of a run that passed its preconditions
#[derive(Debug)]
pub enum RunReport {
    /// No declarations were found; nothing was written
    NothingToDocument,
    /// Both renderers ran
    Rendered {
        declarations: usize,
        html: Result<PathBuf, DocflowError>,
        text: Result<PathBuf, DocflowError>,
    },
}

impl RunReport {
    /// Whether every artifact was written
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            Self::Rendered {
                html: Ok(_),
                text: Ok(_),
                ..
            }
        )
    }
}

/// Orchestrates a documentation run
pub struct Pipeline;

impl Pipeline {
    /// Run every phase for `config`, reporting progress to `log`
    pub fn run(config: &Config, log: &mut RunLog) -> Result<RunReport, DocflowError> {
        Self::require_dir("Source directory", &config.source_dir, log)?;
        Self::require_dir("Template directory", &config.template_dir, log)?;

        let declarations = Self::extract(config, log);
        if declarations.is_empty() {
            log.warn("No code found for documentation.");
            return Ok(RunReport::NothingToDocument);
        }

        let html_renderer = HtmlRenderer::new(&config.template_dir, config.template_name.as_str());
        let text_renderer = TextRenderer::new(config.title.as_str());
        let html = Self::emit(&html_renderer, &declarations, &config.html_path(), log);
        let text = Self::emit(&text_renderer, &declarations, &config.text_path(), log);

        let written = usize::from(html.is_ok()) + usize::from(text.is_ok());
        log.info(format!(
            "Documented {} declarations; {written} of 2 artifacts written to {}.",
            declarations.len(),
            config.output_dir.display()
        ));

        Ok(RunReport::Rendered {
            declarations: declarations.len(),
            html,
            text,
        })
    }

    fn require_dir(what: &'static str, path: &Path, log: &mut RunLog) -> Result<(), DocflowError> {
        if path.is_dir() {
            return Ok(());
        }
        let err = DocflowError::Precondition {
            what,
            path: path.to_path_buf(),
        };
        log.error(format!("{err}."));
        Err(err)
    }

    /// Load, parse and extract every source file, in file name order
    pub fn extract(config: &Config, log: &mut RunLog) -> Vec<Declaration> {
        let loader = SourceLoader::new(config.extension.as_str());
        let mut declarations = Vec::new();
        for file in loader.load(&config.source_dir, log) {
            match document_file(&file) {
                Ok(found) => {
                    tracing::debug!(file = %file.name, declarations = found.len(), "extracted");
                    declarations.extend(found);
                }
                Err(e) => log.failure(&e),
            }
        }
        declarations
    }

    /// Render one artifact and write it to `path`
    fn emit(
        renderer: &dyn Renderer,
        declarations: &[Declaration],
        path: &Path,
        log: &mut RunLog,
    ) -> Result<PathBuf, DocflowError> {
        let result = renderer
            .render(declarations)
            .and_then(|content| write_artifact(path, &content));
        match &result {
            Ok(_) => log.info(format!("{} documentation generated.", renderer.artifact())),
            Err(e) => log.error(format!(
                "{} documentation failed: {e}",
                renderer.artifact()
            )),
        }
        result
    }
}

fn write_artifact(path: &Path, content: &str) -> Result<PathBuf, DocflowError> {
    let write_err = |source: std::io::Error| DocflowError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, content).map_err(write_err)?;
    Ok(path.to_path_buf())
}
