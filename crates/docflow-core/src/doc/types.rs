//! Types for representing extracted declarations

use serde::Serialize;

/// Whether a declaration came from a `def` or a `class`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Function,
    Class,
}

/// The type tag shown in rendered documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationType {
    /// A function decorated as a web route
    FlaskRoute,
    Function,
    Class,
}

impl DeclarationType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FlaskRoute => "flask_route",
            Self::Function => "function",
            Self::Class => "class",
        }
    }
}

impl std::fmt::Display for DeclarationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One documented function or class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    /// File name of the originating source, e.g. `currency.py`
    pub source_file: String,
    /// Cleaned docstring, if the body starts with one
    pub docstring: Option<String>,
    /// Path argument of the route decoration; always `None` for classes
    pub route_path: Option<String>,
    /// Verbatim source from the `def`/`class` keyword to the end of the body
    pub source_text: String,
}

impl Declaration {
    /// Derived type tag; an empty route path counts as no route
    #[must_use]
    pub fn declaration_type(&self) -> DeclarationType {
        match self.kind {
            DeclarationKind::Class => DeclarationType::Class,
            DeclarationKind::Function if self.non_empty_route().is_some() => {
                DeclarationType::FlaskRoute
            }
            DeclarationKind::Function => DeclarationType::Function,
        }
    }

    /// Docstring only when it has content
    #[must_use]
    pub fn non_empty_docstring(&self) -> Option<&str> {
        self.docstring.as_deref().filter(|doc| !doc.is_empty())
    }

    /// Route path only when it has content
    #[must_use]
    pub fn non_empty_route(&self) -> Option<&str> {
        self.route_path.as_deref().filter(|path| !path.is_empty())
    }
}
