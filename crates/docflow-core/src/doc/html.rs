//! HTML documentation through a file-system template

use std::path::Path;

use minijinja::{context, path_loader, Environment};
use serde::Serialize;

use crate::error::DocflowError;

use super::summarize::{error_handling, summarize};
use super::types::{Declaration, DeclarationType};
use super::Renderer;

/// Default template file name
pub const DEFAULT_TEMPLATE: &str = "api_doc_template.html";

/// Renders declarations through a minijinja template
///
/// The template receives one sequence named `docs`. Each element exposes
/// `name`, `path`, `doc`, `type`, `file`, `code`, `summary` and
/// `error_handling`. Templates ending in `.html` are auto-escaped.
pub struct HtmlRenderer {
    env: Environment<'static>,
    template_name: String,
}

/// Template-facing view of one declaration
#[derive(Debug, Serialize)]
struct DeclarationView<'a> {
    name: &'a str,
    path: Option<&'a str>,
    doc: Option<&'a str>,
    #[serde(rename = "type")]
    kind: DeclarationType,
    file: &'a str,
    code: &'a str,
    summary: &'static str,
    error_handling: &'static str,
}

impl<'a> From<&'a Declaration> for DeclarationView<'a> {
    fn from(decl: &'a Declaration) -> Self {
        Self {
            name: &decl.name,
            path: decl.non_empty_route(),
            doc: decl.docstring.as_deref(),
            kind: decl.declaration_type(),
            file: &decl.source_file,
            code: &decl.source_text,
            summary: summarize(&decl.source_text),
            error_handling: error_handling(&decl.source_text),
        }
    }
}

impl HtmlRenderer {
    /// Create a renderer loading `template_name` from `template_dir`
    pub fn new(template_dir: impl AsRef<Path>, template_name: impl Into<String>) -> Self {
        let mut env = Environment::new();
        env.set_loader(path_loader(template_dir.as_ref().to_path_buf()));
        Self {
            env,
            template_name: template_name.into(),
        }
    }
}

impl std::fmt::Debug for HtmlRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlRenderer")
            .field("template_name", &self.template_name)
            .finish_non_exhaustive()
    }
}

impl Renderer for HtmlRenderer {
    fn artifact(&self) -> &'static str {
        "HTML"
    }

    fn render(&self, declarations: &[Declaration]) -> Result<String, DocflowError> {
        let template =
            self.env
                .get_template(&self.template_name)
                .map_err(|source| DocflowError::Template {
                    name: self.template_name.clone(),
                    source,
                })?;
        let docs: Vec<DeclarationView<'_>> = declarations.iter().map(Into::into).collect();
        template
            .render(context! { docs => docs })
            .map_err(|e| DocflowError::Render {
                artifact: self.artifact(),
                reason: e.to_string(),
            })
    }
}
