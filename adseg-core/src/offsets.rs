//! Byte/character offset conversion
//!
//! Every span in the pipeline is a byte range so the source can be sliced
//! directly. Thresholds are expressed in characters, so stages that compare
//! distances or lengths go through this map.

/// Lookup table from byte offsets to character offsets
#[derive(Debug, Clone)]
pub struct OffsetMap {
    /// Byte offset of every character, plus the total length as sentinel
    char_starts: Vec<usize>,
}

impl OffsetMap {
    /// Builds the table for `text`
    pub fn new(text: &str) -> Self {
        let mut char_starts = Vec::with_capacity(text.len() + 1);
        char_starts.extend(text.char_indices().map(|(i, _)| i));
        char_starts.push(text.len());
        Self { char_starts }
    }

    /// Number of characters in the text
    #[inline]
    pub fn char_len(&self) -> usize {
        self.char_starts.len() - 1
    }

    /// Character offset of the byte offset `byte`
    ///
    /// Offsets inside a multi-byte character resolve to that character.
    #[inline]
    pub fn char_offset(&self, byte: usize) -> usize {
        match self.char_starts.binary_search(&byte) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }

    /// Byte offset of the character offset `ch` (clamped to the text length)
    #[inline]
    pub fn byte_offset(&self, ch: usize) -> usize {
        self.char_starts[ch.min(self.char_len())]
    }

    /// Character distance between two byte offsets (`0` when `to <= from`)
    #[inline]
    pub fn char_distance(&self, from: usize, to: usize) -> usize {
        if to <= from {
            return 0;
        }
        self.char_offset(to) - self.char_offset(from)
    }
}
