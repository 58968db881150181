//! The mutable per-file state: current text, current root, handle registry.

use crate::base::{FileId, LineIndex};
use crate::parser::ast::{AstNode, SourceFile};
use crate::parser::{Parse, SyntaxError, SyntaxNode, parse};

use super::handle::NodeHandle;
use super::registry::NodeRegistry;

/// Owns the current text and syntax tree of one logical file.
///
/// All reads go through `&self`; every text mutation goes through the edit
/// operations (`insert_text`, `remove_range`, `replace_text`, ...), which
/// take `&mut self` and swap the root atomically. Holding an edit and a
/// concurrent query on the same buffer is therefore a compile error, which
/// is the whole re-entrancy story.
#[derive(Debug)]
pub struct FileBuffer {
    file_id: FileId,
    text: String,
    root: SyntaxNode,
    errors: Vec<SyntaxError>,
    registry: NodeRegistry,
}

impl FileBuffer {
    /// Parse `text` and build a buffer around the result.
    pub fn new(file_id: FileId, text: impl Into<String>) -> Self {
        let text = text.into();
        let parsed = parse(&text);
        let buffer = Self {
            file_id,
            root: parsed.syntax(),
            errors: parsed.errors,
            text,
            registry: NodeRegistry::new(),
        };
        debug_assert_eq!(buffer.root.text(), buffer.text.as_str());
        buffer
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    /// The buffer's full current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The current root syntax node.
    pub fn root(&self) -> SyntaxNode {
        self.root.clone()
    }

    /// Parse errors from the most recent parse.
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The root as a typed source file.
    pub fn source_file(&self) -> Option<SourceFile> {
        SourceFile::cast(self.root())
    }

    /// A handle for the root node.
    pub fn root_handle(&self) -> NodeHandle {
        self.registry.get_or_create(&self.root)
    }

    /// A handle for an arbitrary node of the current tree.
    ///
    /// The node must come from this buffer's current root; handles taken
    /// against a stale tree will never be rebound by later edits.
    pub fn handle(&self, node: &SyntaxNode) -> NodeHandle {
        debug_assert!(
            node.ancestors().last().as_ref() == Some(&self.root),
            "handle requested for a node outside the current tree"
        );
        self.registry.get_or_create(node)
    }

    /// A handle for a typed AST node.
    pub fn handle_for<N: AstNode>(&self, node: &N) -> NodeHandle {
        self.handle(node.syntax())
    }

    /// Line/column index for the current text. Invalidated by every edit.
    pub fn line_index(&self) -> LineIndex {
        LineIndex::new(&self.text)
    }

    pub(crate) fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Swap in a fresh parse result. Only the edit engine calls this, and
    /// only after reconciliation has succeeded.
    pub(crate) fn commit(&mut self, text: String, parsed: Parse, root: SyntaxNode) {
        self.text = text;
        self.root = root;
        self.errors = parsed.errors;
        debug_assert_eq!(self.root.text(), self.text.as_str());
        debug_assert!(self.registry.is_consistent_under(&self.root));
    }
}
