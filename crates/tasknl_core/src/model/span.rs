//! Labeled character spans.
//!
//! # Invariants
//! - `0 <= start < end <= char_len(source)`.
//! - `text == source[start..end]` measured in characters.

use crate::model::label::EntityKind;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// One labeled substring of the interpreted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: EntityKind,
    pub text: String,
}

impl Span {
    /// Builds a span over `source`, returning `None` for empty or out-of-range offsets.
    pub fn from_source(source: &str, start: usize, end: usize, label: EntityKind) -> Option<Self> {
        let text = char_slice(source, start, end)?;
        if start >= end {
            return None;
        }
        Some(Self {
            start,
            end,
            label,
            text: text.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Offset-only view used in dataset records.
    pub fn annotation(&self) -> SlotAnnotation {
        SlotAnnotation {
            start: self.start,
            end: self.end,
            label: self.label,
        }
    }
}

/// Offset-only slot record, the JSONL training shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotAnnotation {
    pub start: usize,
    pub end: usize,
    pub label: EntityKind,
}

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Slices `text` by character offsets.
pub fn char_slice(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let begin = byte_offset(text, start)?;
    let finish = byte_offset(text, end)?;
    text.get(begin..finish)
}

/// Converts a byte range (as returned by `regex`/`str::find`) into a character range.
pub fn char_range(text: &str, bytes: Range<usize>) -> Range<usize> {
    let start = text[..bytes.start].chars().count();
    let len = text[bytes.start..bytes.end].chars().count();
    start..start + len
}

fn byte_offset(text: &str, char_index: usize) -> Option<usize> {
    if char_index == 0 {
        return Some(0);
    }
    text.char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(text.len()))
        .nth(char_index)
}

#[cfg(test)]
mod tests {
    use super::{char_range, char_slice, Span};
    use crate::model::label::EntityKind;

    #[test]
    fn char_slice_uses_character_offsets() {
        let text = "明天买菜 buy";
        assert_eq!(char_slice(text, 2, 4), Some("买菜"));
        assert_eq!(char_slice(text, 5, 8), Some("buy"));
        assert_eq!(char_slice(text, 0, 0), Some(""));
        assert_eq!(char_slice(text, 5, 9), None);
        assert_eq!(char_slice(text, 3, 2), None);
    }

    #[test]
    fn char_range_converts_byte_offsets() {
        let text = "明天买菜";
        let byte_start = text.find("买菜").unwrap();
        assert_eq!(char_range(text, byte_start..text.len()), 2..4);
    }

    #[test]
    fn from_source_rejects_empty_and_out_of_range() {
        assert!(Span::from_source("abc", 1, 1, EntityKind::Title).is_none());
        assert!(Span::from_source("abc", 1, 4, EntityKind::Title).is_none());
        let span = Span::from_source("abc", 1, 3, EntityKind::Title).unwrap();
        assert_eq!(span.text, "bc");
        assert_eq!(span.len(), 2);
    }
}
