//! Per-file registry mapping raw syntax nodes to their handles.
//!
//! This is the single place handle identity is decided: every lookup and
//! every rebind routes through here. The registry is owned by one
//! [`FileBuffer`](super::FileBuffer) and lives exactly as long as it does;
//! there is no process-wide cache.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

use super::handle::NodeHandle;
use crate::parser::SyntaxNode;

/// Node-to-handle map for one file.
///
/// Entries are created lazily on first visit and removed when reconciliation
/// decides a node has no live counterpart. At most one handle exists per
/// live node.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    entries: RefCell<FxHashMap<SyntaxNode, NodeHandle>>,
}

impl NodeRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Get the existing handle for a node, or create one.
    ///
    /// Idempotent per live node: repeated calls with the same node return
    /// the identical handle.
    pub(crate) fn get_or_create(&self, node: &SyntaxNode) -> NodeHandle {
        self.entries
            .borrow_mut()
            .entry(node.clone())
            .or_insert_with(|| NodeHandle::new(node.clone()))
            .clone()
    }

    /// The cached handle for a node, if one was ever requested.
    pub(crate) fn lookup(&self, node: &SyntaxNode) -> Option<NodeHandle> {
        self.entries.borrow().get(node).cloned()
    }

    /// Retarget a cached handle from `old` to `new`, keeping its identity.
    ///
    /// A node nobody ever asked a handle for has nothing to retarget.
    pub(crate) fn rebind(&self, old: &SyntaxNode, new: SyntaxNode) {
        let mut entries = self.entries.borrow_mut();
        if let Some(handle) = entries.remove(old) {
            handle.rebind_to(new.clone());
            entries.insert(new, handle);
        }
    }

    /// Permanently kill the handle cached for `node`, if any.
    ///
    /// The handle is marked detached before eviction so outstanding clones
    /// observe the death; the entry itself is gone, so the same text
    /// reappearing later produces a fresh handle, never a resurrection.
    pub(crate) fn invalidate(&self, node: &SyntaxNode) {
        if let Some(handle) = self.entries.borrow_mut().remove(node) {
            handle.detach();
        }
    }

    /// Number of live cached handles.
    pub fn live_count(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check that every cached entry is reachable under `root`.
    ///
    /// Used by debug assertions after a root swap.
    pub(crate) fn is_consistent_under(&self, root: &SyntaxNode) -> bool {
        self.entries
            .borrow()
            .keys()
            .all(|node| node.ancestors().last().as_ref() == Some(root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{SyntaxKind, parse};

    #[test]
    fn get_or_create_is_idempotent() {
        let root = parse("let a = 1;").syntax();
        let registry = NodeRegistry::new();

        let first = registry.get_or_create(&root);
        let second = registry.get_or_create(&root);
        assert_eq!(first, second);
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn rebind_keeps_identity() {
        let old_root = parse("let a = 1;").syntax();
        let new_root = parse("let a = 2;").syntax();
        let registry = NodeRegistry::new();

        let handle = registry.get_or_create(&old_root);
        registry.rebind(&old_root, new_root.clone());

        assert!(handle.is_alive());
        assert_eq!(handle.node().unwrap(), new_root);
        // Old key is gone; new key maps to the same handle
        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.lookup(&new_root), Some(handle));
    }

    #[test]
    fn invalidate_is_permanent() {
        let root = parse("let a = 1;").syntax();
        let registry = NodeRegistry::new();

        let handle = registry.get_or_create(&root);
        registry.invalidate(&root);
        assert!(!handle.is_alive());
        assert_eq!(registry.live_count(), 0);

        // Asking again for the same node yields a different handle
        let fresh = registry.get_or_create(&root);
        assert_ne!(fresh, handle);
        assert!(fresh.is_alive());
    }

    #[test]
    fn distinct_nodes_get_distinct_handles() {
        let root = parse("let a = 1;").syntax();
        let registry = NodeRegistry::new();

        let stmt = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::LET_STMT)
            .unwrap();
        let root_handle = registry.get_or_create(&root);
        let stmt_handle = registry.get_or_create(&stmt);
        assert_ne!(root_handle, stmt_handle);
        assert_eq!(registry.live_count(), 2);
    }
}
