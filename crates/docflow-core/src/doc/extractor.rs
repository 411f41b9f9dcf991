//! Extraction of declarations from the structural tree

use crate::ast::{Module, Node, NodeKind};

use super::types::{Declaration, DeclarationKind};

/// Extracts documentation records from a parsed module
pub struct DocExtractor;

impl DocExtractor {
    /// Collect every function and class in the module, at any depth
    ///
    /// Declarations come out in depth-first pre-order, so a method follows
    /// its class and a nested function follows its parent. `async def`
    /// functions are not documented, though definitions nested inside them
    /// are.
    #[must_use]
    pub fn extract(module: &Module, source: &str, file_name: &str) -> Vec<Declaration> {
        module
            .walk()
            .filter_map(|node| Self::declaration(node, source, file_name))
            .collect()
    }

    fn declaration(node: &Node, source: &str, file_name: &str) -> Option<Declaration> {
        let (name, kind, body, route_path) = match &node.kind {
            NodeKind::Function(function) if !function.is_async => (
                &function.name,
                DeclarationKind::Function,
                &function.body,
                route_path(&function.decorators),
            ),
            NodeKind::Class(class) => (&class.name, DeclarationKind::Class, &class.body, None),
            _ => return None,
        };

        Some(Declaration {
            name: name.name.clone(),
            kind,
            source_file: file_name.to_string(),
            docstring: docstring(body),
            route_path,
            source_text: source
                .get(node.span.as_range())
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// Route path from a decorator list
///
/// Every `@<obj>.route(...)` decoration overrides the previous one. The path
/// is kept only when the first positional argument is a string constant.
fn route_path(decorators: &[Node]) -> Option<String> {
    let mut path = None;
    for decorator in decorators {
        let NodeKind::Call(call) = &decorator.kind else {
            continue;
        };
        let NodeKind::Member(member) = &call.callee.kind else {
            continue;
        };
        if member.attr.name != "route" {
            continue;
        }
        path = call
            .args
            .first()
            .and_then(Node::as_str_constant)
            .map(str::to_string);
    }
    path
}

fn docstring(body: &[Node]) -> Option<String> {
    let first = body.first()?;
    if !first.is("expression_statement") {
        return None;
    }
    match first.children().as_slice() {
        [expr] => expr.as_str_constant().map(cleandoc),
        _ => None,
    }
}

/// Clean up docstring indentation
///
/// Tabs expand to 8-column stops. The first line loses its leading spaces,
/// the remaining lines lose their common indentation, and blank lines at
/// either end are dropped.
#[must_use]
pub fn cleandoc(doc: &str) -> String {
    let mut lines: Vec<String> = doc.split('\n').map(expand_tabs).collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let content = line.trim_start_matches(' ');
            (!content.is_empty()).then(|| line.len() - content.len())
        })
        .min();

    if let Some(first) = lines.first_mut() {
        *first = first.trim_start_matches(' ').to_string();
    }
    if let Some(margin) = margin {
        for line in lines.iter_mut().skip(1) {
            *line = line.chars().skip(margin).collect();
        }
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|line| line.is_empty()).count();
    lines.drain(..leading);
    lines.join("\n")
}

fn expand_tabs(line: &str) -> String {
    const TAB_SIZE: usize = 8;
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for ch in line.chars() {
        match ch {
            '\t' => {
                let width = TAB_SIZE - column % TAB_SIZE;
                out.extend(std::iter::repeat(' ').take(width));
                column += width;
            }
            '\r' => {
                out.push(ch);
                column = 0;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    out
}
