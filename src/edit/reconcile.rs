//! Reconciliation of handles across a reparse.
//!
//! After an edit the parser produces an entirely fresh tree. This module
//! walks the old and new trees' flattened node sequences in lockstep and
//! decides, for every old node, whether it survived (rebind its handle),
//! vanished (invalidate it), or cannot be explained (abort the edit).
//!
//! The walk never mutates anything: it produces a [`ReconcilePlan`] that
//! the edit engine applies only after the whole traversal has succeeded,
//! so a failed reconciliation leaves the registry untouched.

use rustc_hash::FxHashSet;
use text_size::{TextRange, TextSize};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::parser::{SyntaxKind, SyntaxNode};
use crate::tree::NodeRegistry;

/// How many consecutive unexplained old-side mismatches are tolerated
/// before the edit is declared unreconcilable. Empirical; grammar changes
/// may warrant tuning.
const MAX_SKIP_TOLERANCE: usize = 8;

/// Kind substitutions that an edit at the boundary may legally cause.
/// `(old, new)` pairs: the old handle dies, but the walk continues instead
/// of failing. Extending the grammar usually means extending this table.
const KIND_SUBSTITUTIONS: &[(SyntaxKind, SyntaxKind)] = &[
    // Deleting a callee turns `f(x)` into the parenthesized `(x)`.
    (SyntaxKind::CALL_EXPR, SyntaxKind::PAREN_EXPR),
];

/// The outcome of a successful reconciliation walk.
#[derive(Debug, Default)]
pub(crate) struct ReconcilePlan {
    /// Old node → its counterpart in the new tree.
    rebinds: Vec<(SyntaxNode, SyntaxNode)>,
    /// Old nodes with no live counterpart.
    invalidations: Vec<SyntaxNode>,
}

impl ReconcilePlan {
    /// Apply the plan to a registry. Infallible by construction: the walk
    /// has already vetted every entry.
    pub(crate) fn apply(self, registry: &NodeRegistry) {
        for node in &self.invalidations {
            registry.invalidate(node);
        }
        for (old, new) in self.rebinds {
            registry.rebind(&old, new);
        }
    }

    #[cfg(test)]
    pub(crate) fn counts(&self) -> (usize, usize) {
        (self.rebinds.len(), self.invalidations.len())
    }
}

/// One reconciliation run over an edit.
pub(crate) struct Reconciler {
    /// Preorder sequences of both trees, nodes only.
    old_nodes: Vec<SyntaxNode>,
    new_nodes: Vec<SyntaxNode>,
    /// Edit window in old-tree coordinates.
    start: TextSize,
    old_end: TextSize,
    /// Window end in new-tree coordinates: `start + replacement length`.
    new_end: TextSize,
    /// Length delta the edit applies to everything at or after `old_end`.
    delta: i64,
    /// Nodes explicitly being removed (plus their descendants).
    removed: FxHashSet<SyntaxNode>,
}

impl Reconciler {
    pub(crate) fn new(
        old_root: &SyntaxNode,
        new_root: &SyntaxNode,
        start: TextSize,
        old_end: TextSize,
        replacement_len: TextSize,
        removed: &[SyntaxNode],
    ) -> Self {
        let delta = i64::from(u32::from(replacement_len)) - i64::from(u32::from(old_end - start));
        let mut flagged = FxHashSet::default();
        for node in removed {
            flagged.extend(node.descendants());
        }
        Self {
            old_nodes: old_root.descendants().collect(),
            new_nodes: new_root.descendants().collect(),
            start,
            old_end,
            new_end: start + replacement_len,
            delta,
            removed: flagged,
        }
    }

    /// Walk both sequences and build the rebind/invalidate plan.
    pub(crate) fn run(self) -> Result<ReconcilePlan> {
        debug!(
            "[RECONCILE] window {:?}..{:?} delta {} ({} old nodes, {} new nodes, {} flagged)",
            self.start,
            self.old_end,
            self.delta,
            self.old_nodes.len(),
            self.new_nodes.len(),
            self.removed.len(),
        );

        let mut plan = ReconcilePlan::default();
        let mut i = 0;
        let mut j = 0;
        let mut skips = 0usize;

        while i < self.old_nodes.len() {
            let old = &self.old_nodes[i];

            // Explicitly removed nodes die first, no questions asked.
            if self.removed.contains(old) {
                trace!("[RECONCILE] removed: {:?} {:?}", old.kind(), old.text_range());
                plan.invalidations.push(old.clone());
                i += 1;
                continue;
            }

            if let Some(new) = self.new_nodes.get(j) {
                if self.matches(old, new) {
                    trace!(
                        "[RECONCILE] rebind {:?} {:?} -> {:?}",
                        old.kind(),
                        old.text_range(),
                        new.text_range()
                    );
                    plan.rebinds.push((old.clone(), new.clone()));
                    i += 1;
                    j += 1;
                    skips = 0;
                    continue;
                }

                // Zero-width nodes carry no text and can never pair up.
                if new.text_range().is_empty() {
                    j += 1;
                    continue;
                }

                // An allow-listed kind substitution caused by the edit:
                // identity dies, the walk survives.
                if self.substitution_applies(old, new) {
                    trace!(
                        "[RECONCILE] substitution {:?} -> {:?} at {:?}",
                        old.kind(),
                        new.kind(),
                        old.text_range()
                    );
                    plan.invalidations.push(old.clone());
                    i += 1;
                    j += 1;
                    skips = 0;
                    continue;
                }

                // Freshly inserted content has no old counterpart. Skip it
                // unless the old node's expected position sorts strictly
                // before it, in which case the old side must move first.
                if self.is_fresh(new)
                    && !self
                        .expected_range(old)
                        .is_some_and(|expected| preorder_before(expected, new.text_range()))
                {
                    j += 1;
                    continue;
                }
            }

            // Old content inside the replaced range is an implicit removal.
            if self.in_old_window(old) {
                trace!(
                    "[RECONCILE] replaced: {:?} {:?}",
                    old.kind(),
                    old.text_range()
                );
                plan.invalidations.push(old.clone());
                i += 1;
                continue;
            }

            // Grouping nodes may vanish once the edit took their children.
            if self.elision_applies(old) {
                trace!("[RECONCILE] elided: {:?} {:?}", old.kind(), old.text_range());
                plan.invalidations.push(old.clone());
                i += 1;
                continue;
            }

            // Unexplained mismatch: tolerate a bounded run of them.
            skips += 1;
            if skips > MAX_SKIP_TOLERANCE {
                return Err(Error::Reconcile(format!(
                    "gave up after {} unmatched nodes near {:?} (at {:?} {:?})",
                    skips,
                    self.start,
                    old.kind(),
                    old.text_range(),
                )));
            }
            trace!(
                "[RECONCILE] skip {}/{}: {:?} {:?}",
                skips,
                MAX_SKIP_TOLERANCE,
                old.kind(),
                old.text_range()
            );
            plan.invalidations.push(old.clone());
            i += 1;
        }

        // Whatever is left on the new side must be freshly inserted.
        while let Some(new) = self.new_nodes.get(j) {
            if new.text_range().is_empty() || self.is_fresh(new) {
                j += 1;
                continue;
            }
            return Err(Error::Reconcile(format!(
                "unexpected {:?} at {:?} in reparsed tree",
                new.kind(),
                new.text_range(),
            )));
        }

        debug!(
            "[RECONCILE] done: {} rebound, {} invalidated",
            plan.rebinds.len(),
            plan.invalidations.len()
        );
        Ok(plan)
    }

    // =========================================================================
    // Matching rules
    // =========================================================================

    /// An old and a new node are the same node iff their kinds agree and
    /// both endpoints sit where the edit says they must.
    fn matches(&self, old: &SyntaxNode, new: &SyntaxNode) -> bool {
        old.kind() == new.kind()
            && self.endpoint_ok(old.text_range().start(), new.text_range().start())
            && self.endpoint_ok(old.text_range().end(), new.text_range().end())
    }

    /// Where may an old endpoint legally reappear in the new tree?
    ///
    /// - at or before the edit start: unchanged;
    /// - at or after the edit end: shifted by exactly `delta`;
    /// - strictly inside the window: only at its identical old position,
    ///   which is what lets an idempotent replacement keep every handle.
    ///
    /// For an insertion both boundary cases can apply at once — inserted
    /// text may attach to either side of the boundary.
    fn endpoint_ok(&self, old: TextSize, new: TextSize) -> bool {
        if old <= self.start && new == old {
            return true;
        }
        if old >= self.old_end && Some(new) == shift(old, self.delta) {
            return true;
        }
        old > self.start && old < self.old_end && new == old
    }

    /// Where this old node's counterpart would sit in the new tree, taking
    /// the late (shifted) option on an insertion boundary. `None` when the
    /// shift would go negative, which only happens for doomed nodes.
    fn expected_range(&self, old: &SyntaxNode) -> Option<TextRange> {
        let range = old.text_range();
        let start = if range.start() >= self.old_end {
            shift(range.start(), self.delta)?
        } else {
            range.start()
        };
        let end = if range.end() >= self.old_end {
            shift(range.end(), self.delta)?
        } else {
            range.end()
        };
        (start <= end).then(|| TextRange::new(start, end))
    }

    /// New content strictly inside the new-side window.
    fn is_fresh(&self, new: &SyntaxNode) -> bool {
        let range = new.text_range();
        range.start() >= self.start && range.end() <= self.new_end
    }

    /// Old content strictly inside the replaced range.
    fn in_old_window(&self, old: &SyntaxNode) -> bool {
        let range = old.text_range();
        range.start() >= self.start && range.end() <= self.old_end
    }

    /// A grouping node may be elided when everything significant under it
    /// was taken by the edit.
    fn elision_applies(&self, old: &SyntaxNode) -> bool {
        old.kind().is_grouping()
            && old
                .children()
                .all(|child| self.in_old_window(&child) || self.removed.contains(&child))
    }

    /// A tolerated kind substitution at a position the edit explains.
    fn substitution_applies(&self, old: &SyntaxNode, new: &SyntaxNode) -> bool {
        KIND_SUBSTITUTIONS
            .iter()
            .any(|&(from, to)| old.kind() == from && new.kind() == to)
            && self.endpoint_ok(old.text_range().start(), new.text_range().start())
            && self.endpoint_ok(old.text_range().end(), new.text_range().end())
    }
}

/// Shift an offset by a signed delta, refusing to go negative.
fn shift(offset: TextSize, delta: i64) -> Option<TextSize> {
    let shifted = i64::from(u32::from(offset)) + delta;
    u32::try_from(shifted).ok().map(TextSize::new)
}

/// Document preorder: earlier start wins; on ties the longer node (the
/// ancestor) comes first.
fn preorder_before(a: TextRange, b: TextRange) -> bool {
    a.start() < b.start() || (a.start() == b.start() && a.end() > b.end())
}
