//! Plain-text documentation report

use crate::error::DocflowError;

use super::summarize::{error_handling, summarize};
use super::types::{Declaration, DeclarationType};
use super::Renderer;

/// Default report heading
pub const DEFAULT_TITLE: &str = "Currency Converter Python Code - Documentation";

const TITLE_RULE_WIDTH: usize = 45;
const SEPARATOR_WIDTH: usize = 40;

/// Renders declarations as a line-oriented plain-text report
#[derive(Debug, Clone)]
pub struct TextRenderer {
    title: String,
}

impl TextRenderer {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    fn push_declaration(lines: &mut Vec<String>, decl: &Declaration) {
        let kind = decl.declaration_type();

        lines.push(format!("Name: {}", decl.name));
        lines.push(format!("Location: {}", decl.source_file));
        if let Some(path) = decl.non_empty_route() {
            lines.push(format!("API Endpoint: {path}"));
        }
        lines.push(format!("Type: {kind}"));
        if let Some(doc) = decl.non_empty_docstring() {
            lines.push("Docstring:".to_string());
            lines.extend(split_lines(doc).map(|line| format!("  - {line}")));
        }
        lines.push("Functionality Highlight:".to_string());
        lines.push(format!("  {}", summarize(&decl.source_text)));
        lines.push("Error Handling Highlight:".to_string());
        lines.push(format!("  {}", error_handling(&decl.source_text)));
        lines.push("Use Cases:".to_string());
        lines.extend(use_cases(kind).iter().map(|case| format!("  - {case}")));
        lines.push("-".repeat(SEPARATOR_WIDTH));
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

impl Renderer for TextRenderer {
    fn artifact(&self) -> &'static str {
        "Plain English"
    }

    fn render(&self, declarations: &[Declaration]) -> Result<String, DocflowError> {
        let mut lines = vec![format!(
            "{}\n{}\n",
            self.title,
            "=".repeat(TITLE_RULE_WIDTH)
        )];
        for decl in declarations {
            Self::push_declaration(&mut lines, decl);
        }
        Ok(lines.join("\n"))
    }
}

fn use_cases(kind: DeclarationType) -> &'static [&'static str] {
    match kind {
        DeclarationType::FlaskRoute => &[
            "Converts user input currency amounts using live exchange rates.",
            "Handles numeric validation and API integration.",
        ],
        DeclarationType::Function => &["Logic for currency conversion or backend calculation."],
        DeclarationType::Class => &["Structuring code and implementing reusable components."],
    }
}

/// Split on every line boundary Python's `str.splitlines` recognizes
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some((index, ch)) = rest.char_indices().find(|&(_, ch)| is_line_boundary(ch)) else {
            let line = rest;
            rest = "";
            return Some(line);
        };
        let line = &rest[..index];
        let mut next = index + ch.len_utf8();
        if ch == '\r' && rest[next..].starts_with('\n') {
            next += 1;
        }
        rest = &rest[next..];
        Some(line)
    })
}

const fn is_line_boundary(ch: char) -> bool {
    matches!(
        ch,
        '\n' | '\r' | '\x0B' | '\x0C' | '\x1C' | '\x1D' | '\x1E' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}
