//! Parser for Python source files
//!
//! tree-sitter-python builds the concrete syntax tree. A tree containing
//! error or missing nodes fails the file; otherwise it is lowered into the
//! tagged [`crate::ast`] tree with byte ranges kept as spans.
//!
//! # Example
//!
//! ```
//! use docflow_core::parser::Parser;
//!
//! let source = "@app.route('/convert')\ndef convert():\n    return 1\n";
//! let module = Parser::parse_module(source).expect("valid python");
//! assert_eq!(module.body.len(), 1);
//!
//! assert!(Parser::parse_module("def broken(:\n").is_err());
//! ```

mod error;
mod strings;

pub use error::{ParseError, ParseErrorKind};

use tree_sitter::{Node as SyntaxNode, Tree};

use crate::ast::{
    CallExpr, ClassNode, Constant, FunctionNode, Ident, Keyword, MemberAccess, Module, Node,
    NodeKind, Span,
};
use strings::Literal;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Deepest nesting lowered before a file is rejected
pub const MAX_DEPTH: usize = 256;

const BOM: char = '\u{feff}';

/// The Python parser
pub struct Parser<'src> {
    /// Source text after any byte order mark
    text: &'src str,
    /// Byte length of the skipped byte order mark, added to every span
    offset: usize,
}

impl<'src> Parser<'src> {
    /// Create a new parser from source code
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let text = source.strip_prefix(BOM).unwrap_or(source);
        Self {
            text,
            offset: source.len() - text.len(),
        }
    }

    /// Parse an entire module (source file)
    ///
    /// Any syntax error fails the whole file. Errors are returned in source
    /// order.
    pub fn parse_module(source: &str) -> Result<Module, Vec<ParseError>> {
        let parser = Parser::new(source);
        let tree = parser.tree().map_err(|e| vec![e])?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(parser.syntax_errors(root));
        }
        let body = parser.lower_children(root, 0).map_err(|e| vec![e])?;
        Ok(Module::new(body, Span::from_range(0..source.len())))
    }

    fn tree(&self) -> ParseResult<Tree> {
        let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&language).map_err(|e| {
            ParseError::new(ParseErrorKind::Language(e.to_string()), Span::default())
        })?;
        parser
            .parse(self.text, None)
            .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidSyntax, self.whole()))
    }

    // =========================================================================
    // Error collection
    // =========================================================================

    /// Every error and missing node, outermost first, ordered by position
    fn syntax_errors(&self, root: SyntaxNode<'_>) -> Vec<ParseError> {
        let mut errors = Vec::new();
        let mut cursor = root.walk();
        'walk: loop {
            let node = cursor.node();
            let descend = if node.is_error() {
                errors.push(ParseError::new(ParseErrorKind::InvalidSyntax, self.span(node)));
                false
            } else if node.is_missing() {
                errors.push(ParseError::new(
                    ParseErrorKind::Missing(expected(node)),
                    self.span(node),
                ));
                false
            } else {
                node.has_error()
            };
            if descend && cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    break 'walk;
                }
            }
        }
        if errors.is_empty() {
            errors.push(ParseError::new(ParseErrorKind::InvalidSyntax, self.whole()));
        }
        errors.sort_by_key(|e| e.span.start);
        errors
    }

    // =========================================================================
    // Lowering
    // =========================================================================

    fn lower(&self, node: SyntaxNode<'_>, depth: usize) -> ParseResult<Node> {
        let span = self.span(node);
        if depth > MAX_DEPTH {
            return Err(ParseError::new(
                ParseErrorKind::TooDeeplyNested { limit: MAX_DEPTH },
                span,
            ));
        }
        let kind = match node.kind() {
            "decorated_definition" => return self.decorated(node, depth),
            "function_definition" => return self.function(node, Vec::new(), depth),
            "class_definition" => return self.class(node, Vec::new(), depth),
            "parenthesized_expression" => match first_named(node) {
                Some(inner) => return self.lower(inner, depth + 1),
                None => return Err(self.invalid(node)),
            },
            "string" | "concatenated_string" => return self.string(node),
            "identifier" => return Ok(Node::name(self.ident(node))),
            "call" => NodeKind::Call(self.call(node, depth)?),
            "attribute" => NodeKind::Member(MemberAccess {
                value: Box::new(self.lower(self.field(node, "object")?, depth + 1)?),
                attr: self.ident(self.field(node, "attribute")?),
            }),
            "integer" | "float" => NodeKind::Constant(Constant::Number(self.text(node).into())),
            "true" => NodeKind::Constant(Constant::Bool(true)),
            "false" => NodeKind::Constant(Constant::Bool(false)),
            "none" => NodeKind::Constant(Constant::None),
            "ellipsis" => NodeKind::Constant(Constant::Ellipsis),
            kind => return Ok(Node::other(kind, self.lower_children(node, depth)?, span)),
        };
        Ok(Node::new(kind, span))
    }

    /// Lower the named children of `node`, skipping comments
    fn lower_children(&self, node: SyntaxNode<'_>, depth: usize) -> ParseResult<Vec<Node>> {
        let mut cursor = node.walk();
        let lowered = node
            .named_children(&mut cursor)
            .filter(|child| !child.is_extra())
            .map(|child| self.lower(child, depth + 1))
            .collect();
        lowered
    }

    fn decorated(&self, node: SyntaxNode<'_>, depth: usize) -> ParseResult<Node> {
        let mut decorators = Vec::new();
        let mut cursor = node.walk();
        for decorator in node.named_children(&mut cursor) {
            if decorator.kind() != "decorator" {
                continue;
            }
            let expression = first_named(decorator).ok_or_else(|| self.invalid(decorator))?;
            decorators.push(self.lower(expression, depth + 1)?);
        }

        let definition = self.field(node, "definition")?;
        match definition.kind() {
            "function_definition" => self.function(definition, decorators, depth),
            "class_definition" => self.class(definition, decorators, depth),
            _ => Err(self.invalid(definition)),
        }
    }

    fn function(
        &self,
        node: SyntaxNode<'_>,
        decorators: Vec<Node>,
        depth: usize,
    ) -> ParseResult<Node> {
        let mut cursor = node.walk();
        let is_async = node.children(&mut cursor).any(|child| child.kind() == "async");
        let params = match node.child_by_field_name("parameters") {
            Some(parameters) => self.lower_children(parameters, depth)?,
            None => Vec::new(),
        };
        let returns = node
            .child_by_field_name("return_type")
            .map(|annotation| self.lower(annotation, depth + 1))
            .transpose()?
            .map(Box::new);

        let function = FunctionNode {
            name: self.ident(self.field(node, "name")?),
            is_async,
            decorators,
            params,
            returns,
            body: self.lower_children(self.field(node, "body")?, depth)?,
        };
        Ok(Node::new(NodeKind::Function(function), self.definition_span(node)))
    }

    fn class(&self, node: SyntaxNode<'_>, decorators: Vec<Node>, depth: usize) -> ParseResult<Node> {
        let (bases, keywords) = match node.child_by_field_name("superclasses") {
            Some(list) => self.arguments(list, depth)?,
            None => (Vec::new(), Vec::new()),
        };
        let class = ClassNode {
            name: self.ident(self.field(node, "name")?),
            decorators,
            bases,
            keywords,
            body: self.lower_children(self.field(node, "body")?, depth)?,
        };
        Ok(Node::new(NodeKind::Class(class), self.definition_span(node)))
    }

    fn call(&self, node: SyntaxNode<'_>, depth: usize) -> ParseResult<CallExpr> {
        let callee = Box::new(self.lower(self.field(node, "function")?, depth + 1)?);
        let arguments = self.field(node, "arguments")?;
        let (args, keywords) = if arguments.kind() == "argument_list" {
            self.arguments(arguments, depth)?
        } else {
            // f(x for x in xs)
            (vec![self.lower(arguments, depth + 1)?], Vec::new())
        };
        Ok(CallExpr {
            callee,
            args,
            keywords,
        })
    }

    /// Split an argument list into positional arguments and keywords
    fn arguments(
        &self,
        list: SyntaxNode<'_>,
        depth: usize,
    ) -> ParseResult<(Vec<Node>, Vec<Keyword>)> {
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        let mut cursor = list.walk();
        for argument in list.named_children(&mut cursor).filter(|a| !a.is_extra()) {
            match argument.kind() {
                "keyword_argument" => keywords.push(Keyword {
                    arg: Some(self.ident(self.field(argument, "name")?)),
                    value: self.lower(self.field(argument, "value")?, depth + 1)?,
                }),
                "dictionary_splat" => {
                    let mapping = first_named(argument).ok_or_else(|| self.invalid(argument))?;
                    keywords.push(Keyword {
                        arg: None,
                        value: self.lower(mapping, depth + 1)?,
                    });
                }
                _ => args.push(self.lower(argument, depth + 1)?),
            }
        }
        Ok((args, keywords))
    }

    /// A string literal or an implicit concatenation of several
    fn string(&self, node: SyntaxNode<'_>) -> ParseResult<Node> {
        let span = self.span(node);
        let parts = if node.kind() == "concatenated_string" {
            let mut cursor = node.walk();
            let parts: Vec<_> = node
                .named_children(&mut cursor)
                .filter(|part| !part.is_extra())
                .collect();
            parts
        } else {
            vec![node]
        };

        let mut value: Option<Literal> = None;
        for part in parts {
            let literal = strings::decode(self.text(part))
                .map_err(|kind| ParseError::new(kind, self.span(part)))?;
            value = Some(match (value, literal) {
                (None, literal) => literal,
                (Some(Literal::Text(mut text)), Literal::Text(more)) => {
                    text.push_str(&more);
                    Literal::Text(text)
                }
                (Some(Literal::Bytes(mut bytes)), Literal::Bytes(more)) => {
                    bytes.extend(more);
                    Literal::Bytes(bytes)
                }
                (Some(Literal::Bytes(_)), _) | (Some(_), Literal::Bytes(_)) => {
                    return Err(ParseError::new(ParseErrorKind::MixedBytesAndStr, span));
                }
                (Some(_), _) => Literal::Formatted,
            });
        }

        let kind = match value {
            Some(Literal::Text(text)) => NodeKind::Constant(Constant::Str(text)),
            Some(Literal::Bytes(bytes)) => NodeKind::Constant(Constant::Bytes(bytes)),
            Some(Literal::Formatted) => return Ok(Node::other("formatted_string", Vec::new(), span)),
            None => return Err(self.invalid(node)),
        };
        Ok(Node::new(kind, span))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn field<'tree>(
        &self,
        node: SyntaxNode<'tree>,
        name: &'static str,
    ) -> ParseResult<SyntaxNode<'tree>> {
        node.child_by_field_name(name).ok_or_else(|| {
            ParseError::new(ParseErrorKind::Missing(name.replace('_', " ")), self.span(node))
        })
    }

    fn ident(&self, node: SyntaxNode<'_>) -> Ident {
        Ident::new(self.text(node), self.span(node))
    }

    fn text(&self, node: SyntaxNode<'_>) -> &'src str {
        self.text.get(node.byte_range()).unwrap_or_default()
    }

    fn span(&self, node: SyntaxNode<'_>) -> Span {
        Span::from_range(node.start_byte() + self.offset..node.end_byte() + self.offset)
    }

    fn whole(&self) -> Span {
        Span::from_range(self.offset..self.offset + self.text.len())
    }

    /// From the `def`, `async` or `class` keyword to the last token of the
    /// body, leaving out trailing comments
    fn definition_span(&self, node: SyntaxNode<'_>) -> Span {
        Span::from_range(node.start_byte() + self.offset..content_end(node) + self.offset)
    }

    fn invalid(&self, node: SyntaxNode<'_>) -> ParseError {
        ParseError::new(ParseErrorKind::InvalidSyntax, self.span(node))
    }
}

fn first_named(node: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    let mut cursor = node.walk();
    let child = node
        .named_children(&mut cursor)
        .find(|child| !child.is_extra());
    child
}

/// End of the last non-comment token under `node`
fn content_end(node: SyntaxNode<'_>) -> usize {
    let mut last = node;
    loop {
        let mut cursor = last.walk();
        let child = last
            .children(&mut cursor)
            .filter(|child| !child.is_extra())
            .last();
        match child {
            Some(child) => last = child,
            None => return last.end_byte(),
        }
    }
}

/// How a missing node reads in an error message: `':'` or `identifier`
fn expected(node: SyntaxNode<'_>) -> String {
    if node.is_named() {
        node.kind().replace('_', " ")
    } else {
        format!("'{}'", node.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Module {
        match Parser::parse_module(source) {
            Ok(module) => module,
            Err(errors) => panic!("parse failed: {errors:?}"),
        }
    }

    fn parse_err(source: &str) -> ParseErrorKind {
        match Parser::parse_module(source) {
            Ok(module) => panic!("expected failure, parsed {module:?}"),
            Err(errors) => errors[0].kind.clone(),
        }
    }

    fn function(node: &Node) -> &FunctionNode {
        match &node.kind {
            NodeKind::Function(function) => function,
            other => panic!("expected function, got {other:?}"),
        }
    }

    fn other_kind(node: &Node) -> &'static str {
        match &node.kind {
            NodeKind::Other(other) => other.kind,
            other => panic!("expected other node, got {other:?}"),
        }
    }

    fn first_value(source: &str) -> Node {
        let module = parse(source);
        // expression_statement > assignment > (name, value)
        let NodeKind::Other(statement) = &module.body[0].kind else {
            panic!("expected a statement");
        };
        let NodeKind::Other(assignment) = &statement.children[0].kind else {
            panic!("expected an assignment");
        };
        assignment.children[1].clone()
    }

    #[test]
    fn parse_simple_function() {
        let source = "def add(a, b=1, *args, c, **kw) -> int:\n    return a + b\n";
        let module = parse(source);
        let add = function(&module.body[0]);
        assert_eq!(add.name.name, "add");
        assert!(!add.is_async);
        assert_eq!(add.params.len(), 5);
        assert!(add.returns.is_some());
        assert_eq!(&source[module.body[0].span.as_range()], source.trim_end());
    }

    #[test]
    fn function_span_excludes_decorators_and_trailing_comments() {
        let source = "@app.route('/x')\nasync def view():\n    pass\n    # trailing\n\nx = 1\n";
        let module = parse(source);
        let view = &module.body[0];
        assert!(function(view).is_async);
        assert_eq!(function(view).decorators.len(), 1);
        assert_eq!(&source[view.span.as_range()], "async def view():\n    pass");
    }

    #[test]
    fn decorator_is_member_call() {
        let module = parse("@app.route(\"/convert\", methods=['POST'])\ndef convert(): pass\n");
        let convert = function(&module.body[0]);
        let NodeKind::Call(call) = &convert.decorators[0].kind else {
            panic!("decorator should be a call");
        };
        let NodeKind::Member(member) = &call.callee.kind else {
            panic!("callee should be a member access");
        };
        assert_eq!(member.attr.name, "route");
        assert_eq!(call.args[0].as_str_constant(), Some("/convert"));
        assert_eq!(call.keywords[0].arg.as_ref().map(|k| k.name.as_str()), Some("methods"));
    }

    #[test]
    fn class_with_bases_and_nested_definitions() {
        let source = "class Converter(Base, metaclass=Meta):\n    \"\"\"Doc.\"\"\"\n    def rate(self):\n        def inner(): pass\n        return inner\n";
        let module = parse(source);
        let NodeKind::Class(class) = &module.body[0].kind else {
            panic!("expected class");
        };
        assert_eq!(class.name.name, "Converter");
        assert_eq!(class.bases.len(), 1);
        assert_eq!(class.keywords.len(), 1);
        assert_eq!(class.body.len(), 2);
        let names: Vec<_> = module
            .walk()
            .filter_map(|node| match &node.kind {
                NodeKind::Function(f) => Some(f.name.name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["rate", "inner"]);
    }

    #[test]
    fn recent_syntax_parses() {
        let source = "\
type Alias = list[int]

def first[T](items: list[T]) -> T:
    return items[0]

class Box[T]:
    pass

label = f\"{data[\"name\"]}\"

match command:
    case [x, *rest]:
        pass

if (n := 10) > 5:
    pass

try:
    pass
except* OSError:
    pass
";
        let module = parse(source);
        assert_eq!(module.body.len(), 7);
        assert_eq!(function(&module.body[1]).name.name, "first");
        assert!(matches!(&module.body[2].kind, NodeKind::Class(c) if c.name.name == "Box"));
        assert_eq!(other_kind(&module.body[4]), "match_statement");
    }

    #[test]
    fn parentheses_are_transparent() {
        let module = parse("@app.route((\"/a\"))\ndef a(): pass\n");
        let NodeKind::Call(call) = &function(&module.body[0]).decorators[0].kind else {
            panic!("decorator should be a call");
        };
        assert_eq!(call.args[0].as_str_constant(), Some("/a"));
    }

    #[test]
    fn string_literals() {
        assert_eq!(
            first_value("x = 'con' \"cat\" '''enated'''\n").as_str_constant(),
            Some("concatenated")
        );
        assert_eq!(first_value("x = 'tab\\there'\n").as_str_constant(), Some("tab\there"));
        assert_eq!(
            first_value("x = b'a' b'b'\n").kind,
            NodeKind::Constant(Constant::Bytes(b"ab".to_vec()))
        );
        assert_eq!(other_kind(&first_value("x = 'a' f'{b}'\n")), "formatted_string");
        assert_eq!(parse_err("x = b'a' 'b'\n"), ParseErrorKind::MixedBytesAndStr);
    }

    #[test]
    fn byte_order_mark_is_skipped() {
        let source = "\u{feff}def f():\n    pass\n";
        let module = parse(source);
        assert_eq!(module.body[0].span.start, 3);
        assert_eq!(&source[module.body[0].span.as_range()], "def f():\n    pass");
    }

    #[test]
    fn deep_nesting_is_an_error() {
        let depth = 1000;
        let source = format!("x = {}1{}\n", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(
            parse_err(&source),
            ParseErrorKind::TooDeeplyNested { limit: MAX_DEPTH }
        );

        let shallow = format!("x = {}1{}\n", "(".repeat(100), ")".repeat(100));
        assert!(Parser::parse_module(&shallow).is_ok());
    }

    #[test]
    fn syntax_errors() {
        for source in ["def f(:\n    pass\n", "x = )\n", "class\n", "def broken(:\n"] {
            assert!(Parser::parse_module(source).is_err(), "{source:?} should fail");
        }
    }

    #[test]
    fn errors_are_ordered() {
        let errors = Parser::parse_module("x = (\ndef ok(): pass\ny = )\n").unwrap_err();
        assert!(!errors.is_empty());
        assert!(errors.windows(2).all(|w| w[0].span.start <= w[1].span.start));
    }
}
