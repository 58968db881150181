//! # regraft
//!
//! Incremental source editing over a lossless syntax tree with
//! identity-preserving node handles.
//!
//! Every edit reparses the whole file — parsing is cheap and the tree is
//! immutable — but the handles callers hold are never casually thrown
//! away: a reconciliation pass matches the fresh tree against the old one
//! and rebinds every handle whose node survived, invalidating exactly the
//! ones whose nodes are gone.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! printer   → declarative structures rendered to insertable text
//!   ↓
//! edit      → edit engine, reconciler
//!   ↓
//! tree      → FileBuffer, NodeHandle, NodeRegistry, structural queries
//!   ↓
//! parser    → logos lexer, recursive-descent parser, typed AST layer
//!   ↓
//! base      → primitives (FileId, TextRange, LineIndex)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → tree → edit → printer)
// ============================================================================

/// Foundation types: FileId, TextRange, LineIndex
pub mod base;

/// Parser: logos lexer, recursive-descent parser, typed AST
pub mod parser;

/// Buffers, handles, registry, and structural queries
pub mod tree;

/// Edit engine and reconciler
pub mod edit;

/// Structural printer for declarative inserts
pub mod printer;

/// Error types
pub mod error;

/// Text helpers (identifier validation)
pub mod text_utils;

// Re-export the primary API surface
pub use base::{FileId, LineCol, LineIndex, TextRange, TextSize};
pub use edit::EditDescriptor;
pub use error::{Error, Result};
pub use parser::{Parse, SyntaxError, SyntaxKind, SyntaxNode, parse};
pub use printer::{FunctionStructure, PrintSettings, Structure, VariableStructure, print_structure};
pub use tree::{EndBound, FileBuffer, NodeHandle, NodeRegistry};
