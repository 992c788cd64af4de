//! Offset to line/column lookup built once per scan.
//!
//! The scanner works in UTF-8 byte offsets because that is what the regex
//! engine reports. Output spans are expressed in character offsets with
//! zero-based line/column locations, so every committed span is translated
//! through a [`PositionIndex`]. Building the index is linear in the text
//! length and every lookup is a constant-time table read.

use crate::span::LineCol;

/// Marks bytes that fall inside a multi-byte character.
const INTERIOR: u32 = u32::MAX;

/// Monotonic byte offset to character offset and line/column table.
///
/// # Example
///
/// ```
/// use tmscan_core::{LineCol, PositionIndex};
///
/// let index = PositionIndex::new("é\nx");
/// assert_eq!(index.char_offset(2), Some(1));
/// assert_eq!(index.line_col(3), Some(LineCol::new(1, 0)));
/// assert_eq!(index.char_offset(1), None);
/// ```
#[derive(Debug, Clone)]
pub struct PositionIndex {
    /// Character offset for each byte boundary, [`INTERIOR`] elsewhere.
    byte_to_char: Vec<u32>,
    /// Line/column for each character offset, plus one past the end.
    char_positions: Vec<LineCol>,
}

impl PositionIndex {
    /// Builds the index for `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut byte_to_char = vec![INTERIOR; text.len().saturating_add(1)];
        let mut char_positions = Vec::with_capacity(text.len().saturating_add(1));
        let mut line = 0_u32;
        let mut column = 0_u32;

        for (char_offset, (byte_offset, ch)) in text.char_indices().enumerate() {
            if let Some(slot) = byte_to_char.get_mut(byte_offset) {
                *slot = saturating_u32(char_offset);
            }
            char_positions.push(LineCol::new(line, column));
            if ch == '\n' {
                line = line.saturating_add(1);
                column = 0;
            } else {
                column = column.saturating_add(1);
            }
        }

        let char_count = char_positions.len();
        if let Some(slot) = byte_to_char.last_mut() {
            *slot = saturating_u32(char_count);
        }
        char_positions.push(LineCol::new(line, column));

        Self {
            byte_to_char,
            char_positions,
        }
    }

    /// Returns the number of characters in the indexed text.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.char_positions.len().saturating_sub(1)
    }

    /// Converts a byte offset on a character boundary to a character offset.
    ///
    /// Returns `None` for offsets past the end of the text or inside a
    /// multi-byte character.
    #[must_use]
    pub fn char_offset(&self, byte_offset: usize) -> Option<usize> {
        self.byte_to_char
            .get(byte_offset)
            .copied()
            .filter(|offset| *offset != INTERIOR)
            .map(|offset| offset as usize)
    }

    /// Returns the line/column of a byte offset on a character boundary.
    #[must_use]
    pub fn line_col(&self, byte_offset: usize) -> Option<LineCol> {
        let char_offset = self.char_offset(byte_offset)?;
        self.char_positions.get(char_offset).copied()
    }
}

fn saturating_u32(value: usize) -> u32 {
    // Offsets will realistically never exceed u32::MAX.
    u32::try_from(value).unwrap_or(INTERIOR.saturating_sub(1))
}
