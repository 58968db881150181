//! Shared fixtures for integration tests.
#![allow(dead_code)] // not every test crate uses every helper

use regraft::{FileBuffer, FileId, NodeHandle, SyntaxKind};

/// Build a single-file buffer around `text`.
pub fn buffer(text: &str) -> FileBuffer {
    FileBuffer::new(FileId::new(0), text)
}

/// Handle for the first node of `kind`, in document order.
pub fn handle_of(buffer: &FileBuffer, kind: SyntaxKind) -> NodeHandle {
    try_handle_of(buffer, kind)
        .unwrap_or_else(|| panic!("no {kind:?} node in {:?}", buffer.text()))
}

/// Handle for the nth node of `kind` (0-based), in document order.
pub fn nth_handle_of(buffer: &FileBuffer, kind: SyntaxKind, n: usize) -> NodeHandle {
    let node = buffer
        .root()
        .descendants()
        .filter(|node| node.kind() == kind)
        .nth(n)
        .unwrap_or_else(|| panic!("no {n}th {kind:?} node in {:?}", buffer.text()));
    buffer.handle(&node)
}

pub fn try_handle_of(buffer: &FileBuffer, kind: SyntaxKind) -> Option<NodeHandle> {
    buffer
        .root()
        .descendants()
        .find(|node| node.kind() == kind)
        .map(|node| buffer.handle(&node))
}

/// Handles for every node of the current tree.
pub fn all_handles(buffer: &FileBuffer) -> Vec<NodeHandle> {
    buffer
        .root()
        .descendants()
        .map(|node| buffer.handle(&node))
        .collect()
}
