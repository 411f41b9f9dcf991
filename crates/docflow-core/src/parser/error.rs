//! Parser error types for Python sources

use crate::ast::Span;
use thiserror::Error;

/// A parser error with location information
#[derive(Debug, Clone)]
pub struct ParseError {
    /// The kind of error
    pub kind: ParseErrorKind,
    /// Source location where the error occurred
    pub span: Span,
}

impl ParseError {
    /// Create a new parse error
    #[must_use]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for ParseError {}

/// The kind of parse error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("invalid syntax")]
    InvalidSyntax,

    /// The grammar recovered by assuming a token that is not in the source
    #[error("expected {0}")]
    Missing(String),

    #[error("too many nested expressions, limit is {limit}")]
    TooDeeplyNested { limit: usize },

    #[error("invalid string literal: {0}")]
    InvalidString(String),

    #[error("cannot mix bytes and nonbytes literals")]
    MixedBytesAndStr,

    #[error("python grammar could not be loaded: {0}")]
    Language(String),
}
