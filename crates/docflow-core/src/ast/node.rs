//! Node definitions

use super::{Ident, Span, Spanned};

/// One node of the structural tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    #[must_use]
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Shorthand for an [`OtherNode`] without a name
    #[must_use]
    pub fn other(kind: &'static str, children: Vec<Node>, span: Span) -> Self {
        Self::new(
            NodeKind::Other(OtherNode {
                kind,
                ident: None,
                children,
            }),
            span,
        )
    }

    /// Shorthand for an [`OtherNode`] carrying an identifier
    #[must_use]
    pub fn named(kind: &'static str, ident: Ident, children: Vec<Node>, span: Span) -> Self {
        Self::new(
            NodeKind::Other(OtherNode {
                kind,
                ident: Some(ident),
                children,
            }),
            span,
        )
    }

    /// A bare name reference (`x`)
    #[must_use]
    pub fn name(ident: Ident) -> Self {
        let span = ident.span;
        Self::named("identifier", ident, Vec::new(), span)
    }

    /// Direct children in traversal order
    ///
    /// Functions yield decorators, parameters, the return annotation, then the
    /// body. Classes yield decorators, bases, keyword values, then the body.
    #[must_use]
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Function(function) => function
                .decorators
                .iter()
                .chain(&function.params)
                .chain(function.returns.as_deref())
                .chain(&function.body)
                .collect(),
            NodeKind::Class(class) => class
                .decorators
                .iter()
                .chain(&class.bases)
                .chain(class.keywords.iter().map(|k| &k.value))
                .chain(&class.body)
                .collect(),
            NodeKind::Call(call) => std::iter::once(call.callee.as_ref())
                .chain(&call.args)
                .chain(call.keywords.iter().map(|k| &k.value))
                .collect(),
            NodeKind::Member(member) => vec![member.value.as_ref()],
            NodeKind::Constant(_) => Vec::new(),
            NodeKind::Other(other) => other.children.iter().collect(),
        }
    }

    /// The string value when this node is a text constant
    #[must_use]
    pub fn as_str_constant(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Constant(Constant::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// Whether this node is an [`OtherNode`] of the given kind
    #[must_use]
    pub fn is(&self, kind: &str) -> bool {
        matches!(&self.kind, NodeKind::Other(other) if other.kind == kind)
    }
}

impl Spanned for Node {
    fn span(&self) -> Span {
        self.span
    }
}

/// The tagged variants of the tree
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `def` or `async def`
    Function(FunctionNode),
    /// `class`
    Class(ClassNode),
    /// A call expression
    Call(CallExpr),
    /// Attribute access: `value.attr`
    Member(MemberAccess),
    /// A literal constant
    Constant(Constant),
    /// Any other statement or expression
    Other(OtherNode),
}

/// A function definition
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    pub name: Ident,
    pub is_async: bool,
    /// Decorator expressions, outermost first
    pub decorators: Vec<Node>,
    /// Parameters, including `*args`, `**kwargs` and separators
    pub params: Vec<Node>,
    /// Return annotation
    pub returns: Option<Box<Node>>,
    pub body: Vec<Node>,
}

/// A class definition
#[derive(Debug, Clone, PartialEq)]
pub struct ClassNode {
    pub name: Ident,
    pub decorators: Vec<Node>,
    /// Positional base expressions
    pub bases: Vec<Node>,
    /// Keyword arguments in the class header (`metaclass=...`)
    pub keywords: Vec<Keyword>,
    pub body: Vec<Node>,
}

/// A call expression: `callee(args, name=value, **mapping)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Node>,
    /// Positional arguments, including `*iterable` splats
    pub args: Vec<Node>,
    pub keywords: Vec<Keyword>,
}

/// A keyword argument; `arg` is `None` for `**mapping`
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub arg: Option<Ident>,
    pub value: Node,
}

/// Attribute access
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccess {
    pub value: Box<Node>,
    pub attr: Ident,
}

/// Literal constants
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// Text literal after escape processing and implicit concatenation
    Str(String),
    Bytes(Vec<u8>),
    /// Numeric literal kept as written
    Number(String),
    Bool(bool),
    None,
    Ellipsis,
}

/// A node the pipeline does not inspect directly
#[derive(Debug, Clone, PartialEq)]
pub struct OtherNode {
    /// Grammar kind name, e.g. `if_statement` or `binary_operator`
    pub kind: &'static str,
    /// The name this node binds or references, if any
    pub ident: Option<Ident>,
    /// Child nodes in source order
    pub children: Vec<Node>,
}
