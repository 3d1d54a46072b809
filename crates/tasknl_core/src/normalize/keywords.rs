//! Keyword tables for category/priority canonicalization.
//!
//! # Responsibility
//! - Hold the bilingual surface variants for each canonical value as data.
//! - Resolve a phrase to its canonical value by longest keyword first.
//!
//! # Invariants
//! - Candidate order is `(keyword length desc, table order asc)`; ties keep
//!   table order so the result is deterministic.
//! - ASCII keywords match case-insensitively on whole words only; CJK
//!   keywords match literally.

use crate::model::command::{Category, Priority};
use crate::normalize::datetime::find_phrase;
use std::ops::Range;

/// Canonical value with its surface variants.
#[derive(Debug, Clone, Copy)]
pub struct KeywordEntry<K: 'static> {
    pub canonical: K,
    pub variants: &'static [&'static str],
}

/// Ordered keyword table for one canonical vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct KeywordTable<K: 'static> {
    entries: &'static [KeywordEntry<K>],
}

/// Keyword located in text. `range` is a byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHit<K> {
    pub canonical: K,
    pub keyword: &'static str,
    pub range: Range<usize>,
}

pub static CATEGORY_KEYWORDS: KeywordTable<Category> = KeywordTable::new(&[
    KeywordEntry {
        canonical: Category::Work,
        variants: &["work", "office", "company", "工作", "上班", "公司"],
    },
    KeywordEntry {
        canonical: Category::Study,
        variants: &[
            "study", "learning", "homework", "学习", "复习", "看书", "作业",
        ],
    },
    KeywordEntry {
        canonical: Category::Personal,
        variants: &["personal", "life", "个人", "生活", "私事"],
    },
]);

pub static PRIORITY_KEYWORDS: KeywordTable<Priority> = KeywordTable::new(&[
    KeywordEntry {
        canonical: Priority::High,
        variants: &[
            "high",
            "high priority",
            "urgent",
            "优先级高",
            "紧急",
            "很急",
            "高优先级",
            "高",
        ],
    },
    KeywordEntry {
        canonical: Priority::Medium,
        variants: &[
            "medium",
            "medium priority",
            "normal",
            "优先级中",
            "一般",
            "普通",
            "中优先级",
            "中",
        ],
    },
    KeywordEntry {
        canonical: Priority::Low,
        variants: &[
            "low",
            "low priority",
            "not urgent",
            "优先级低",
            "不急",
            "低优先级",
            "低",
        ],
    },
]);

impl<K: Copy + 'static> KeywordTable<K> {
    pub const fn new(entries: &'static [KeywordEntry<K>]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [KeywordEntry<K>] {
        self.entries
    }

    /// All `(canonical, keyword)` pairs in match priority order.
    pub fn candidates(&self) -> Vec<(K, &'static str)> {
        let mut candidates: Vec<(K, &'static str)> = self
            .entries
            .iter()
            .flat_map(|entry| {
                entry
                    .variants
                    .iter()
                    .map(move |variant| (entry.canonical, *variant))
            })
            .collect();
        candidates.sort_by_key(|(_, keyword)| std::cmp::Reverse(keyword.chars().count()));
        candidates
    }

    /// Maps `text` to its canonical value, trying the longest keyword across
    /// all entries first.
    pub fn canonicalize(&self, text: &str) -> Option<K> {
        if text.trim().is_empty() {
            return None;
        }
        self.candidates()
            .into_iter()
            .find(|(_, keyword)| find_phrase(text, keyword).is_some())
            .map(|(canonical, _)| canonical)
    }

    /// Returns the first entry (in table order) with any keyword in `text`,
    /// trying that entry's longest keywords first.
    pub fn find_first_group(&self, text: &str) -> Option<KeywordHit<K>> {
        self.entries.iter().find_map(|entry| {
            let mut variants: Vec<&'static str> = entry.variants.to_vec();
            variants.sort_by_key(|variant| std::cmp::Reverse(variant.chars().count()));
            variants.into_iter().find_map(|keyword| {
                let start = find_phrase(text, keyword)?;
                Some(KeywordHit {
                    canonical: entry.canonical,
                    keyword,
                    range: start..start + keyword.len(),
                })
            })
        })
    }
}

/// Canonicalizes a category phrase.
pub fn canonical_category(text: &str) -> Option<Category> {
    CATEGORY_KEYWORDS.canonicalize(text)
}

/// Canonicalizes a priority phrase.
pub fn canonical_priority(text: &str) -> Option<Priority> {
    PRIORITY_KEYWORDS.canonicalize(text)
}

#[cfg(test)]
mod tests {
    use super::{KeywordEntry, KeywordTable, CATEGORY_KEYWORDS, PRIORITY_KEYWORDS};
    use crate::model::command::{Category, Priority};

    static CONFLICT_TABLE: KeywordTable<&str> = KeywordTable::new(&[
        KeywordEntry {
            canonical: "short",
            variants: &["高"],
        },
        KeywordEntry {
            canonical: "long",
            variants: &["优先级高"],
        },
    ]);

    #[test]
    fn candidates_are_sorted_longest_first_with_stable_ties() {
        let candidates = PRIORITY_KEYWORDS.candidates();
        let lengths: Vec<usize> = candidates
            .iter()
            .map(|(_, keyword)| keyword.chars().count())
            .collect();
        assert!(lengths.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(candidates[0], (Priority::Medium, "medium priority"));
    }

    #[test]
    fn longest_keyword_beats_earlier_shorter_entry() {
        assert_eq!(CONFLICT_TABLE.canonicalize("优先级高"), Some("long"));
        assert_eq!(CONFLICT_TABLE.canonicalize("很高"), Some("short"));
    }

    #[test]
    fn ascii_keywords_do_not_match_inside_words() {
        let hit = CATEGORY_KEYWORDS.find_first_group("finish homework").unwrap();
        assert_eq!(hit.canonical, Category::Study);
        assert_eq!(hit.keyword, "homework");
        assert!(PRIORITY_KEYWORDS.find_first_group("follow up").is_none());
        assert_eq!(CATEGORY_KEYWORDS.canonicalize("lifestyle magazine"), None);
    }

    #[test]
    fn find_first_group_respects_table_order() {
        let hit = PRIORITY_KEYWORDS.find_first_group("不急，优先级高").unwrap();
        assert_eq!(hit.canonical, Priority::High);
        assert_eq!(hit.keyword, "优先级高");
    }
}
