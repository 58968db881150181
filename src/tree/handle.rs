//! Long-lived node handles.
//!
//! A [`NodeHandle`] is the caller-facing identity of a syntax node. The
//! underlying [`SyntaxNode`] is replaced wholesale on every edit; the handle
//! survives as long as the reconciler can find the node's counterpart in
//! each fresh tree. Once detached, a handle stays dead forever.

use std::cell::RefCell;
use std::rc::Rc;

use text_size::TextRange;

use crate::error::{Error, Result};
use crate::parser::ast::AstNode;
use crate::parser::{SyntaxKind, SyntaxNode};

/// Binding state of a handle. The registry is the only writer.
#[derive(Debug, Clone)]
pub(crate) enum BindState {
    /// Attached to a node in the buffer's current tree.
    Bound(SyntaxNode),
    /// The node was removed, kind-changed, or explicitly forgotten.
    Detached,
}

#[derive(Debug)]
pub(crate) struct HandleData {
    pub(crate) state: RefCell<BindState>,
}

/// A rebindable reference to exactly one syntax node.
///
/// Handles are cheap to clone; clones share identity. Two handles compare
/// equal only if they are the same registry entry, never by node content.
#[derive(Debug, Clone)]
pub struct NodeHandle {
    data: Rc<HandleData>,
}

impl PartialEq for NodeHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for NodeHandle {}

impl NodeHandle {
    pub(crate) fn new(node: SyntaxNode) -> Self {
        Self {
            data: Rc::new(HandleData {
                state: RefCell::new(BindState::Bound(node)),
            }),
        }
    }

    /// Whether this handle is still attached to the tree.
    pub fn is_alive(&self) -> bool {
        matches!(&*self.data.state.borrow(), BindState::Bound(_))
    }

    /// The current syntax node behind this handle.
    pub fn node(&self) -> Result<SyntaxNode> {
        match &*self.data.state.borrow() {
            BindState::Bound(node) => Ok(node.clone()),
            BindState::Detached => Err(Error::StaleNode),
        }
    }

    /// The node's kind tag.
    pub fn kind(&self) -> Result<SyntaxKind> {
        Ok(self.node()?.kind())
    }

    /// The node's full range, leading and interior trivia included.
    pub fn range(&self) -> Result<TextRange> {
        Ok(self.node()?.text_range())
    }

    /// The node's range with leading and trailing trivia stripped.
    pub fn trimmed_range(&self) -> Result<TextRange> {
        let node = self.node()?;
        Ok(trimmed_range(&node))
    }

    /// The node's full text.
    pub fn text(&self) -> Result<String> {
        Ok(self.node()?.text().to_string())
    }

    /// View this handle through a typed AST lens.
    ///
    /// Returns `Ok(None)` when the node is alive but of a different kind.
    pub fn cast<N: AstNode>(&self) -> Result<Option<N>> {
        Ok(N::cast(self.node()?))
    }

    pub(crate) fn rebind_to(&self, node: SyntaxNode) {
        *self.data.state.borrow_mut() = BindState::Bound(node);
    }

    pub(crate) fn detach(&self) {
        *self.data.state.borrow_mut() = BindState::Detached;
    }
}

/// Compute a node's range excluding leading and trailing trivia tokens.
pub(crate) fn trimmed_range(node: &SyntaxNode) -> TextRange {
    let significant: Vec<_> = node
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia())
        .collect();
    match (significant.first(), significant.last()) {
        (Some(first), Some(last)) => {
            TextRange::new(first.text_range().start(), last.text_range().end())
        }
        _ => node.text_range(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn detached_handle_reports_stale() {
        let root = parse("let a = 1;").syntax();
        let handle = NodeHandle::new(root.clone());
        assert!(handle.is_alive());
        assert_eq!(handle.kind().unwrap(), SyntaxKind::SOURCE_FILE);

        handle.detach();
        assert!(!handle.is_alive());
        assert_eq!(handle.node().unwrap_err(), Error::StaleNode);
        assert_eq!(handle.text().unwrap_err(), Error::StaleNode);
    }

    #[test]
    fn clones_share_identity() {
        let root = parse("let a = 1;").syntax();
        let handle = NodeHandle::new(root);
        let clone = handle.clone();
        assert_eq!(handle, clone);

        handle.detach();
        assert!(!clone.is_alive());
    }

    #[test]
    fn trimmed_range_strips_trivia() {
        let root = parse("  let a = 1;  ").syntax();
        // SOURCE_FILE covers everything; trimming drops the padding
        assert_eq!(root.text_range(), TextRange::new(0.into(), 14.into()));
        assert_eq!(trimmed_range(&root), TextRange::new(2.into(), 12.into()));
    }
}
