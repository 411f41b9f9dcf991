//! Tree traversal

use super::Node;

/// Depth-first pre-order iterator over a node list and all descendants
#[derive(Debug, Clone)]
pub struct Walk<'ast> {
    stack: Vec<&'ast Node>,
}

impl<'ast> Walk<'ast> {
    #[must_use]
    pub fn new(roots: &'ast [Node]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'ast> Iterator for Walk<'ast> {
    type Item = &'ast Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().into_iter().rev());
        Some(node)
    }
}
