//! docflow core library
//!
//! Statically documents a directory of Python sources: files are parsed
//! into a structural tree, function and class declarations are
//! extracted (recognizing web route decorations), and two reports are
//! rendered, one through an HTML template and one as plain text.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Syntax tree for parsed sources
pub mod ast;

/// Run configuration
pub mod config;

/// Declaration extraction, summaries and renderers
pub mod doc;

/// Error types
pub mod error;

/// Explicit run log
pub mod log;

/// Python parser
pub mod parser;

/// Phase sequencing for a full run
pub mod pipeline;

/// Source file discovery and reading
pub mod source;

pub use config::{Config, ConfigError};
pub use doc::{Declaration, DeclarationKind, DeclarationType};
pub use error::DocflowError;
pub use log::{LogRecord, RunLog};
pub use pipeline::{Pipeline, RunReport};
