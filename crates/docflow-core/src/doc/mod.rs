//! Documentation extraction and rendering
//!
//! A parsed [`Module`] is flattened into [`Declaration`] records by
//! [`DocExtractor`]. Renderers turn the full declaration list into one output
//! artifact each.

mod extractor;
mod html;
mod summarize;
mod text;
mod types;

pub use extractor::{cleandoc, DocExtractor};
pub use html::{HtmlRenderer, DEFAULT_TEMPLATE};
pub use summarize::{error_handling, summarize, Category};
pub use text::{TextRenderer, DEFAULT_TITLE};
pub use types::{Declaration, DeclarationKind, DeclarationType};

use crate::ast::{LineIndex, Module};
use crate::error::DocflowError;
use crate::parser::Parser;
use crate::source::SourceFile;

/// A component that turns declarations into one output document
pub trait Renderer {
    /// Human-readable artifact name used in log lines
    fn artifact(&self) -> &'static str;

    /// Render the complete document
    fn render(&self, declarations: &[Declaration]) -> Result<String, DocflowError>;
}

/// Parse a loaded source file, reporting the first error with its position
pub fn parse_source(file: &SourceFile) -> Result<Module, DocflowError> {
    Parser::parse_module(&file.text).map_err(|errors| {
        let index = LineIndex::new(&file.text);
        let (location, message) = errors.first().map_or_else(
            || (index.location(0), String::from("invalid syntax")),
            |error| (index.location(error.span.start), error.to_string()),
        );
        DocflowError::Syntax {
            file: file.name.clone(),
            line: location.line,
            column: location.column,
            message,
        }
    })
}

/// Parse and extract one file
pub fn document_file(file: &SourceFile) -> Result<Vec<Declaration>, DocflowError> {
    let module = parse_source(file)?;
    Ok(DocExtractor::extract(&module, &file.text, &file.name))
}
