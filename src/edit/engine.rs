//! Edit operations on a [`FileBuffer`].
//!
//! Every operation is normalized to one byte-range replacement, reparsed,
//! and reconciled. The buffer's root and text are swapped only after the
//! reconciler has produced a complete plan; any failure before that point
//! leaves the buffer exactly as it was.

use text_size::{TextRange, TextSize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::parser::ast::kind_has_name;
use crate::parser::{SyntaxKind, SyntaxNode, parse};
use crate::printer::{PrintSettings, Structure, print_structure};
use crate::text_utils::is_valid_identifier;
use crate::tree::{FileBuffer, NodeHandle, trimmed_range};

use super::reconcile::Reconciler;

/// One byte-range replacement, validated against the current text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDescriptor {
    pub start: TextSize,
    pub end: TextSize,
    pub replacement: String,
}

impl EditDescriptor {
    pub fn new(start: TextSize, end: TextSize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    /// The length delta this edit applies to trailing text.
    pub fn delta(&self) -> i64 {
        i64::from(u32::from(TextSize::of(self.replacement.as_str())))
            - i64::from(u32::from(self.end - self.start))
    }

    fn validate(&self, text: &str) -> Result<()> {
        let len = TextSize::of(text);
        let start = usize::from(self.start);
        let end = usize::from(self.end);
        if self.start > self.end
            || self.end > len
            || !text.is_char_boundary(start)
            || !text.is_char_boundary(end)
        {
            return Err(Error::InvalidRange {
                start: self.start,
                end: self.end,
                len,
            });
        }
        Ok(())
    }
}

impl FileBuffer {
    /// Insert `text` at `pos`.
    pub fn insert_text(&mut self, pos: TextSize, text: &str) -> Result<()> {
        self.apply_edit(EditDescriptor::new(pos, pos, text), &[])
    }

    /// Delete the bytes in `start..end`.
    pub fn remove_range(&mut self, start: TextSize, end: TextSize) -> Result<()> {
        self.apply_edit(EditDescriptor::new(start, end, ""), &[])
    }

    /// Replace the bytes in `start..end` with `text`.
    pub fn replace_text(&mut self, start: TextSize, end: TextSize, text: &str) -> Result<()> {
        self.apply_edit(EditDescriptor::new(start, end, text), &[])
    }

    /// Remove the node behind `handle` from the text.
    ///
    /// The node and all its descendants are passed to the reconciler as
    /// positively-removed, so their handles die even when surrounding
    /// trivia goes with them. When the node leads its parent's content the
    /// removal also swallows trailing spaces and tabs, which keeps the
    /// following sibling's indentation where it was.
    pub fn remove_node(&mut self, handle: &NodeHandle) -> Result<()> {
        let node = handle.node()?;
        let range = node.text_range();
        let mut end = usize::from(range.end());

        let leads_parent = node
            .parent()
            .is_some_and(|parent| trimmed_range(&parent).start() == trimmed_range(&node).start());
        if leads_parent {
            let bytes = self.text().as_bytes();
            while bytes.get(end).is_some_and(|&b| b == b' ' || b == b'\t') {
                end += 1;
            }
        }

        self.apply_edit(
            EditDescriptor::new(range.start(), TextSize::new(end as u32), ""),
            std::slice::from_ref(&node),
        )
    }

    /// Replace the declared name of the node behind `handle`.
    ///
    /// Works on any node that carries a NAME child (functions, lets,
    /// parameters) and on NAME / NAME_REF nodes directly. Only the
    /// identifier token's range is touched, so sibling handles survive
    /// with shifted offsets and the renamed node itself is rebound.
    pub fn rename(&mut self, handle: &NodeHandle, new_name: &str) -> Result<()> {
        if !is_valid_identifier(new_name) {
            return Err(Error::InvalidIdentifier(new_name.to_string()));
        }
        let node = handle.node()?;
        let ident_range = name_token_range(&node).ok_or(Error::NotSupported {
            kind: node.kind(),
            operation: "rename",
        })?;
        self.replace_text(ident_range.start(), ident_range.end(), new_name)
    }

    /// Print a declarative structure and insert its text at `pos`.
    pub fn insert_structure(
        &mut self,
        pos: TextSize,
        structure: &Structure,
        settings: &PrintSettings,
    ) -> Result<()> {
        let text = print_structure(structure, settings);
        self.insert_text(pos, &text)
    }

    /// Release `handle` and every cached handle below it without editing
    /// any text. The nodes stay in the tree; asking for them again later
    /// produces fresh handles.
    pub fn forget(&mut self, handle: &NodeHandle) -> Result<()> {
        let node = handle.node()?;
        for descendant in node.descendants() {
            self.registry().invalidate(&descendant);
        }
        Ok(())
    }

    /// Normalize, validate, reparse, reconcile, and commit one edit.
    fn apply_edit(&mut self, edit: EditDescriptor, removed: &[SyntaxNode]) -> Result<()> {
        edit.validate(self.text())?;

        debug!(
            "[EDIT] {} {:?}..{:?} (+{} bytes) in {}",
            if edit.replacement.is_empty() { "remove" } else { "splice" },
            edit.start,
            edit.end,
            edit.replacement.len(),
            self.file_id(),
        );

        let mut new_text = String::with_capacity(
            self.text().len() - usize::from(edit.end - edit.start) + edit.replacement.len(),
        );
        new_text.push_str(&self.text()[..usize::from(edit.start)]);
        new_text.push_str(&edit.replacement);
        new_text.push_str(&self.text()[usize::from(edit.end)..]);

        let parsed = parse(&new_text);
        let new_root = parsed.syntax();

        let plan = Reconciler::new(
            &self.root(),
            &new_root,
            edit.start,
            edit.end,
            TextSize::of(edit.replacement.as_str()),
            removed,
        )
        .run()?;

        plan.apply(self.registry());
        self.commit(new_text, parsed, new_root);
        Ok(())
    }
}

/// The identifier token to retarget for a rename of `node`.
fn name_token_range(node: &SyntaxNode) -> Option<TextRange> {
    let name_node = match node.kind() {
        SyntaxKind::NAME | SyntaxKind::NAME_REF => node.clone(),
        kind if kind_has_name(kind) => node
            .children()
            .find(|child| child.kind() == SyntaxKind::NAME)?,
        _ => return None,
    };
    name_node
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == SyntaxKind::IDENT)
        .map(|t| t.text_range())
}

