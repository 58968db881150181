//! Error types for buffer edits and handle operations.

use text_size::TextSize;
use thiserror::Error;

use crate::parser::SyntaxKind;

/// Errors surfaced by edit operations and handle accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An edit range that does not fit the current buffer text. Rejected
    /// before the parser ever runs.
    #[error("invalid edit range {start:?}..{end:?} for buffer of length {len:?}")]
    InvalidRange {
        start: TextSize,
        end: TextSize,
        len: TextSize,
    },

    /// A rename target that is not a lexically valid identifier. Rejected
    /// before the parser ever runs.
    #[error("not a valid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// The handle was invalidated by an earlier edit or an explicit forget.
    /// A dead handle is never resurrected, even if identical text reappears.
    #[error("node handle is detached; the node was removed or forgotten")]
    StaleNode,

    /// The fresh parse could not be matched against the previous tree. The
    /// triggering edit was rolled back and the buffer is unchanged.
    #[error("could not reconcile reparse result: {0}")]
    Reconcile(String),

    /// The node does not support the requested operation. Recoverable by
    /// choosing a different operation.
    #[error("{operation} is not supported for {kind:?}")]
    NotSupported {
        kind: SyntaxKind,
        operation: &'static str,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
