//! Interned file identifiers.

/// Identifies one logical file for the lifetime of the process.
///
/// Buffers, parse results, and diagnostics all carry a `FileId` instead of a
/// path so that renames on disk do not invalidate in-memory state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u32);

impl FileId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "file({})", self.0)
    }
}
