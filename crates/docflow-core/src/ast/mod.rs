//! Structural tree for parsed Python source
//!
//! The tree keeps only the node kinds the documentation pipeline inspects as
//! dedicated variants. Everything else is an [`OtherNode`] labelled with its
//! grammar kind name that still owns its children, so a walk reaches every
//! nested definition. All nodes carry a [`Span`] into the original source text.

mod node;
mod span;
mod visit;

pub use node::*;
pub use span::{LineIndex, Location, Span};
pub use visit::Walk;

/// A trait for tree nodes that have associated source location information
pub trait Spanned {
    /// Returns the source span of this node
    fn span(&self) -> Span;
}

/// An identifier with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    /// The identifier name
    pub name: String,
    /// Source location
    pub span: Span,
}

impl Ident {
    /// Create a new identifier
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span
    }
}

/// A parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// Top-level statements in source order
    pub body: Vec<Node>,
    pub span: Span,
}

impl Module {
    #[must_use]
    pub fn new(body: Vec<Node>, span: Span) -> Self {
        Self { body, span }
    }

    /// Depth-first pre-order traversal over every node in the file
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.body)
    }
}

impl Spanned for Module {
    fn span(&self) -> Span {
        self.span
    }
}
