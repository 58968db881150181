//! Byte offset to line/column conversion.
//!
//! Offsets are the native coordinate everywhere in this crate; `LineIndex`
//! exists at the edge for anything that reports positions to a human.

use text_size::{TextRange, TextSize};

/// A 0-indexed line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Maps byte offsets to line/column positions for one text snapshot.
///
/// Built eagerly from the text; invalid the moment the text changes, so a
/// fresh index must be taken after every edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the start of each line. Always starts with 0.
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(i as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Number of lines in the indexed text.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Total length of the indexed text.
    pub fn len(&self) -> TextSize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == TextSize::new(0)
    }

    /// Convert a byte offset into a line/column pair.
    ///
    /// Offsets past the end of the text clamp to the final position.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line];
        LineCol {
            line: line as u32,
            col: u32::from(offset) - u32::from(line_start),
        }
    }

    /// Convert a line/column pair back into a byte offset, if the line exists.
    pub fn offset(&self, line_col: LineCol) -> Option<TextSize> {
        let start = *self.line_starts.get(line_col.line as usize)?;
        Some(start + TextSize::new(line_col.col))
    }

    /// The range covered by a whole line, excluding its terminator.
    pub fn line_range(&self, line: u32) -> Option<TextRange> {
        let start = *self.line_starts.get(line as usize)?;
        let end = self
            .line_starts
            .get(line as usize + 1)
            .map(|&next| next - TextSize::new(1))
            .unwrap_or(self.len);
        Some(TextRange::new(start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_roundtrip() {
        let index = LineIndex::new("let a = 1;\nlet b = 2;\n");
        assert_eq!(index.line_count(), 3);

        let lc = index.line_col(TextSize::new(15));
        assert_eq!(lc, LineCol { line: 1, col: 4 });
        assert_eq!(index.offset(lc), Some(TextSize::new(15)));
    }

    #[test]
    fn offset_past_end_clamps() {
        let index = LineIndex::new("x");
        assert_eq!(index.line_col(TextSize::new(99)), LineCol { line: 0, col: 1 });
    }

    #[test]
    fn empty_text() {
        let index = LineIndex::new("");
        assert!(index.is_empty());
        assert_eq!(index.line_col(TextSize::new(0)), LineCol { line: 0, col: 0 });
    }
}
