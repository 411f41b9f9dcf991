//! Error types for documentation runs

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while generating documentation
///
/// File-scoped errors (`Read`, `Decode`, `Syntax`) skip one source file.
/// Renderer-scoped errors (`Template`, `Render`, `Write`) drop one artifact.
/// `Precondition` halts the run.
#[derive(Error, Debug)]
pub enum DocflowError {
    #[error("could not read file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read file {}: stream did not contain valid UTF-8", path.display())]
    Decode { path: PathBuf },

    #[error("syntax error in {file}: {message} (line {line}, column {column})")]
    Syntax {
        file: String,
        line: u32,
        column: u32,
        message: String,
    },

    #[error("template '{name}' could not be loaded: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("{artifact} documentation could not be rendered: {reason}")]
    Render { artifact: &'static str, reason: String },

    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{what} '{}' not found", path.display())]
    Precondition { what: &'static str, path: PathBuf },
}
