//! Rule-only slot tagging over raw text.
//!
//! # Responsibility
//! - Produce approximate spans without a learned model, for weak-label
//!   dataset construction and as a parser fallback.
//! - Share the entity vocabulary and value rules with the learned path.
//!
//! # Invariants
//! - Each entity kind is attempted independently; all candidates are kept.
//! - Output is sorted by `(start asc, length desc)` with exact
//!   `(start, end, label)` duplicates removed.
//! - Overlapping spans of different labels are all retained.

use crate::model::label::EntityKind;
use crate::model::span::{char_range, Span};
use crate::normalize::datetime::{find_due_date, find_id, find_phrase, find_time};
use crate::normalize::keywords::{CATEGORY_KEYWORDS, PRIORITY_KEYWORDS};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;

/// Leading action verbs stripped before guessing the title.
pub const ACTION_VERBS: &[&str] = &[
    "新增",
    "创建",
    "添加",
    "新建",
    "记一下",
    "帮我记",
    "加一条",
    "加个",
    "修改",
    "更新",
    "改成",
    "改为",
    "调整",
    "变更",
    "完成",
    "做完",
    "标记完成",
    "设为完成",
    "搞定",
    "重新打开",
    "撤销完成",
    "设为未完成",
    "改回未完成",
    "删除",
    "移除",
    "删掉",
    "去掉",
    "add",
    "create",
    "make",
    "note",
    "remind me to",
    "please add",
    "update",
    "change",
    "edit",
    "modify",
    "finish",
    "complete",
    "mark done",
    "reopen",
    "undo done",
    "mark not done",
    "delete",
    "remove",
    "drop",
];

/// Phrases marking an all-day task.
pub const ALLDAY_PHRASES: &[&str] = &["全天", "整天", "一整天", "all day"];

// Whitespace separates clauses in CJK text but words in ASCII text.
static CLAUSE_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[，,。.；;！!？?\s]+").expect("valid clause separator regex"));
static ASCII_CLAUSE_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[,.;!?]+\s*").expect("valid ascii clause separator regex"));

/// Heuristic span extractor.
#[derive(Debug, Clone)]
pub struct HeuristicSlotTagger {
    verbs: Vec<&'static str>,
    allday_phrases: Vec<&'static str>,
}

impl Default for HeuristicSlotTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicSlotTagger {
    pub fn new() -> Self {
        Self {
            verbs: longest_first(ACTION_VERBS),
            allday_phrases: longest_first(ALLDAY_PHRASES),
        }
    }

    /// Tags `text` with every entity kind the rules can find.
    pub fn tag(&self, text: &str) -> Vec<Span> {
        let mut candidates = Vec::new();
        let mut push = |range: Option<Range<usize>>, label: EntityKind| {
            let Some(bytes) = range else {
                return;
            };
            let chars = char_range(text, bytes);
            if let Some(span) = Span::from_source(text, chars.start, chars.end, label) {
                candidates.push(span);
            }
        };

        push(find_id(text).map(|hit| hit.range), EntityKind::Id);
        push(find_due_date(text).map(|hit| hit.range), EntityKind::Date);
        push(self.find_allday(text), EntityKind::AllDay);
        push(find_time(text).map(|hit| hit.range), EntityKind::Time);
        push(
            CATEGORY_KEYWORDS.find_first_group(text).map(|hit| hit.range),
            EntityKind::Category,
        );
        push(
            PRIORITY_KEYWORDS.find_first_group(text).map(|hit| hit.range),
            EntityKind::Priority,
        );
        push(self.guess_title(text), EntityKind::Title);

        order_and_dedup(candidates)
    }

    fn find_allday(&self, text: &str) -> Option<Range<usize>> {
        self.allday_phrases.iter().find_map(|phrase| {
            let start = find_phrase(text, phrase)?;
            Some(start..start + phrase.len())
        })
    }

    /// Guesses the title as the first clause left after stripping a leading
    /// action verb. Leading separators are skipped, so `删除 任务12` yields
    /// `任务12`.
    fn guess_title(&self, text: &str) -> Option<Range<usize>> {
        let body_start = text.len() - text.trim_start().len();
        let body = text.trim();
        let offset = body_start + self.verb_prefix_len(body);
        let rest = &text[offset..body_start + body.len()];

        let separators = if text.is_ascii() {
            &*ASCII_CLAUSE_SEPARATOR_RE
        } else {
            &*CLAUSE_SEPARATOR_RE
        };
        let boundaries = separators
            .find_iter(rest)
            .map(|separator| separator.range())
            .chain(std::iter::once(rest.len()..rest.len()));

        let mut clause_start = 0;
        for separator in boundaries {
            if separator.start > clause_start {
                return Some(offset + clause_start..offset + separator.start);
            }
            clause_start = clause_start.max(separator.end);
        }
        None
    }

    /// Byte length of a leading action verb plus the whitespace after it, or
    /// 0. ASCII verbs must end on a word boundary, so `add` leaves `address`
    /// intact.
    fn verb_prefix_len(&self, clause: &str) -> usize {
        for verb in &self.verbs {
            let Some(prefix) = clause.get(..verb.len()) else {
                continue;
            };
            if !prefix.eq_ignore_ascii_case(verb) {
                continue;
            }
            let rest = &clause[verb.len()..];
            let splits_word = verb.ends_with(|c: char| c.is_ascii_alphanumeric())
                && rest.starts_with(|c: char| c.is_ascii_alphanumeric());
            if !splits_word {
                return clause.len() - rest.trim_start().len();
            }
        }
        0
    }
}

/// Sorts by `(start asc, length desc)` and drops exact duplicates.
pub fn order_and_dedup(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by_key(|span| (span.start, std::cmp::Reverse(span.len())));
    let mut seen = HashSet::new();
    spans.retain(|span| seen.insert((span.start, span.end, span.label)));
    spans
}

fn longest_first(values: &[&'static str]) -> Vec<&'static str> {
    let mut sorted = values.to_vec();
    sorted.sort_by_key(|value| std::cmp::Reverse(value.chars().count()));
    sorted
}
