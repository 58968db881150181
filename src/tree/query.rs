//! Read-only structural queries over handles.
//!
//! Everything here walks the current tree through the registry; nothing is
//! cached and nothing ever triggers a reparse. Siblings in particular are
//! recomputed by scanning the parent's child list on every call — an edit
//! would invalidate any cached answer immediately, so there is no cache to
//! begin with.

use text_size::{TextRange, TextSize};

use crate::error::Result;
use crate::parser::SyntaxNode;

use super::FileBuffer;
use super::handle::NodeHandle;

/// How range containment treats a position equal to the range end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndBound {
    /// `start <= pos < end`
    #[default]
    Exclusive,
    /// `start <= pos <= end`
    Inclusive,
}

/// Check whether `pos` falls inside `range` under the given end bound.
pub fn contains_offset(range: TextRange, pos: TextSize, end_bound: EndBound) -> bool {
    if pos < range.start() {
        return false;
    }
    match end_bound {
        EndBound::Exclusive => pos < range.end(),
        EndBound::Inclusive => pos <= range.end(),
    }
}

/// Lazy walk from a node up to the root.
pub struct Ancestors<'a> {
    buffer: &'a FileBuffer,
    current: Option<SyntaxNode>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeHandle;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current.take()?;
        self.current = node.parent();
        Some(self.buffer.handle(&node))
    }
}

impl FileBuffer {
    /// Handles for a node's direct child nodes, in document order.
    pub fn children(&self, handle: &NodeHandle) -> Result<Vec<NodeHandle>> {
        let node = handle.node()?;
        Ok(node.children().map(|child| self.handle(&child)).collect())
    }

    /// The node's parent, or `None` for the root.
    pub fn parent(&self, handle: &NodeHandle) -> Result<Option<NodeHandle>> {
        let node = handle.node()?;
        Ok(node.parent().map(|parent| self.handle(&parent)))
    }

    /// Lazy iterator over the node's ancestors, starting with the parent.
    pub fn ancestors(&self, handle: &NodeHandle) -> Result<Ancestors<'_>> {
        let node = handle.node()?;
        Ok(Ancestors {
            buffer: self,
            current: node.parent(),
        })
    }

    /// The next sibling node, found by scanning the parent's child list for
    /// this node and stepping one past it.
    pub fn next_sibling(&self, handle: &NodeHandle) -> Result<Option<NodeHandle>> {
        self.sibling_at(handle, 1)
    }

    /// The previous sibling node.
    pub fn prev_sibling(&self, handle: &NodeHandle) -> Result<Option<NodeHandle>> {
        self.sibling_at(handle, -1)
    }

    fn sibling_at(&self, handle: &NodeHandle, step: isize) -> Result<Option<NodeHandle>> {
        let node = handle.node()?;
        let Some(parent) = node.parent() else {
            return Ok(None);
        };
        let siblings: Vec<_> = parent.children().collect();
        let index = siblings
            .iter()
            .position(|sibling| sibling == &node)
            .expect("node not found under its own parent");
        let target = index as isize + step;
        if target < 0 {
            return Ok(None);
        }
        Ok(siblings.get(target as usize).map(|n| self.handle(n)))
    }

    /// The deepest node containing `pos`, or `None` when `pos` is outside
    /// the file.
    pub fn descendant_at(&self, pos: TextSize, end_bound: EndBound) -> Option<NodeHandle> {
        let root = self.root();
        if !contains_offset(root.text_range(), pos, end_bound) {
            return None;
        }
        let mut current = root;
        loop {
            let next = current
                .children()
                .find(|child| contains_offset(child.text_range(), pos, end_bound));
            match next {
                Some(child) => current = child,
                None => return Some(self.handle(&current)),
            }
        }
    }

    /// The smallest node whose range covers `range` entirely.
    pub fn covering_node(&self, range: TextRange) -> NodeHandle {
        let mut current = self.root();
        loop {
            let next = current
                .children()
                .find(|child| child.text_range().contains_range(range));
            match next {
                Some(child) => current = child,
                None => return self.handle(&current),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::FileId;
    use crate::parser::SyntaxKind;

    fn buffer(text: &str) -> FileBuffer {
        FileBuffer::new(FileId::new(0), text)
    }

    fn find(buffer: &FileBuffer, kind: SyntaxKind) -> NodeHandle {
        let node = buffer
            .root()
            .descendants()
            .find(|n| n.kind() == kind)
            .unwrap();
        buffer.handle(&node)
    }

    #[test]
    fn children_and_parent() {
        let buffer = buffer("function f() { return 1; }");
        let root = buffer.root_handle();
        let children = buffer.children(&root).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind().unwrap(), SyntaxKind::FUNCTION_DECL);

        let parent = buffer.parent(&children[0]).unwrap().unwrap();
        assert_eq!(parent, root);
        assert_eq!(buffer.parent(&root).unwrap(), None);
    }

    #[test]
    fn ancestors_walk_to_root() {
        let buffer = buffer("function f() { return 1; }");
        let literal = find(&buffer, SyntaxKind::LITERAL);
        let kinds: Vec<_> = buffer
            .ancestors(&literal)
            .unwrap()
            .map(|h| h.kind().unwrap())
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::RETURN_STMT,
                SyntaxKind::BLOCK,
                SyntaxKind::FUNCTION_DECL,
                SyntaxKind::SOURCE_FILE,
            ]
        );
    }

    #[test]
    fn sibling_scan() {
        let buffer = buffer("let a = 1;\nlet b = 2;\nlet c = 3;\n");
        let root = buffer.root_handle();
        let stmts = buffer.children(&root).unwrap();
        assert_eq!(stmts.len(), 3);

        assert_eq!(
            buffer.next_sibling(&stmts[0]).unwrap(),
            Some(stmts[1].clone())
        );
        assert_eq!(
            buffer.prev_sibling(&stmts[2]).unwrap(),
            Some(stmts[1].clone())
        );
        assert_eq!(buffer.next_sibling(&stmts[2]).unwrap(), None);
        assert_eq!(buffer.prev_sibling(&stmts[0]).unwrap(), None);
    }

    #[test]
    fn descendant_at_finds_deepest() {
        let buffer = buffer("let a = 1;");
        // Offset 8 is the literal `1`
        let deepest = buffer.descendant_at(8.into(), EndBound::Exclusive).unwrap();
        assert_eq!(deepest.kind().unwrap(), SyntaxKind::LITERAL);

        assert!(buffer.descendant_at(99.into(), EndBound::Exclusive).is_none());
    }

    #[test]
    fn end_bound_controls_boundary() {
        let range = TextRange::new(2.into(), 5.into());
        assert!(!contains_offset(range, 5.into(), EndBound::Exclusive));
        assert!(contains_offset(range, 5.into(), EndBound::Inclusive));
        assert!(!contains_offset(range, 1.into(), EndBound::Inclusive));
    }

    #[test]
    fn covering_node_for_range() {
        let buffer = buffer("function f() { return 1; }");
        let covering = buffer.covering_node(TextRange::new(15.into(), 24.into()));
        assert_eq!(covering.kind().unwrap(), SyntaxKind::RETURN_STMT);
    }
}
