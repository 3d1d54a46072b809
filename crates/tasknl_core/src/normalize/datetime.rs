//! Date, time-of-day and task-id extraction.
//!
//! # Responsibility
//! - Resolve absolute and relative date phrases into `YYYY-MM-DD`.
//! - Resolve numeric and Chinese time-of-day phrases into 24-hour `HH:MM`.
//! - Locate task ids referenced by `ID`, `#`, `任务` and `task` markers.
//!
//! # Invariants
//! - Rules are tried in table order; the first valid hit wins.
//! - Out-of-range components are non-matches and fall through to the next rule.
//! - Nothing here returns an error or panics on arbitrary input.

use crate::normalize::numeral::parse_cn_number;
use chrono::{Datelike, Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

/// How one date rule recognizes its phrase.
#[derive(Debug)]
pub enum DateMatcher {
    /// Regex with `year?`, `month`, `day` groups. Missing year means current year.
    Calendar { regex: Regex },
    /// Literal phrase resolved as an offset from today.
    Relative {
        phrase: &'static str,
        offset_days: u64,
        ignore_case: bool,
    },
}

/// One entry of the ordered date rule table.
#[derive(Debug)]
pub struct DateRule {
    pub name: &'static str,
    pub matcher: DateMatcher,
}

/// Resolved date before the reference day is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    Calendar {
        year: Option<i32>,
        month: u32,
        day: u32,
    },
    Offset(u64),
}

impl DateValue {
    /// Formats as `YYYY-MM-DD` relative to `today`.
    pub fn to_iso(self, today: NaiveDate) -> Option<String> {
        match self {
            Self::Calendar { year, month, day } => {
                let year = year.unwrap_or_else(|| today.year());
                Some(format!("{year:04}-{month:02}-{day:02}"))
            }
            Self::Offset(days) => today
                .checked_add_days(Days::new(days))
                .map(|date| date.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Date phrase located in text. `range` is a byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateHit {
    pub rule: &'static str,
    pub range: Range<usize>,
    pub value: DateValue,
}

/// Time phrase located in text. `range` is a byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeHit {
    pub range: Range<usize>,
    pub value: String,
}

/// Task id located in text. `range` covers the digits only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdHit {
    pub range: Range<usize>,
    pub value: i64,
}

static DATE_RULES: Lazy<Vec<DateRule>> = Lazy::new(|| {
    vec![
        calendar_rule(
            "numeric",
            r"(?-u:\b)(?P<year>[0-9]{4})[-/.](?P<month>[0-9]{1,2})[-/.](?P<day>[0-9]{1,2})(?-u:\b)",
        ),
        calendar_rule(
            "zh_long",
            r"(?P<year>[0-9]{4})\s*年\s*(?P<month>[0-9]{1,2})\s*月\s*(?P<day>[0-9]{1,2})\s*日",
        ),
        calendar_rule(
            "zh_short",
            r"(?-u:\b)(?P<month>[0-9]{1,2})\s*月\s*(?P<day>[0-9]{1,2})\s*日",
        ),
        relative_rule("zh_in_three_days", "大后天", 3, false),
        relative_rule("zh_in_two_days", "后天", 2, false),
        relative_rule("zh_tomorrow", "明天", 1, false),
        relative_rule("zh_today", "今天", 0, false),
        relative_rule("en_in_two_days", "day after tomorrow", 2, true),
        relative_rule("en_tomorrow", "tomorrow", 1, true),
        relative_rule("en_today", "today", 0, true),
    ]
});

static NUMERIC_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u:\b)(?P<hour>[0-9]{1,2})\s*:\s*(?P<minute>[0-9]{2})(?-u:\b)")
        .expect("valid numeric time regex")
});

static ZH_TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?P<period>凌晨|早上|上午|中午|下午|晚上)?\s*",
        r"(?P<hour>[0-9]{1,2}|[零〇一二两三四五六七八九十]{1,3})\s*(?:点|时)\s*",
        r"(?P<minute>半|一刻|三刻|(?:[0-9]{1,2}|[零〇一二两三四五六七八九十]{1,3})\s*分?)?",
    ))
    .expect("valid chinese time regex")
});

static ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?-u:\b)ID[:=]?\s*([0-9]+)(?-u:\b)",
        r"(?-u:\b)id[:=]?\s*([0-9]+)(?-u:\b)",
        r"#([0-9]+)(?-u:\b)",
        r"任务\s*([0-9]+)(?-u:\b)",
        r"(?-u:\b)task\s*([0-9]+)(?-u:\b)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid id regex"))
    .collect()
});

fn calendar_rule(name: &'static str, pattern: &str) -> DateRule {
    DateRule {
        name,
        matcher: DateMatcher::Calendar {
            regex: Regex::new(pattern).expect("valid calendar date regex"),
        },
    }
}

fn relative_rule(
    name: &'static str,
    phrase: &'static str,
    offset_days: u64,
    ignore_case: bool,
) -> DateRule {
    DateRule {
        name,
        matcher: DateMatcher::Relative {
            phrase,
            offset_days,
            ignore_case,
        },
    }
}

/// Ordered date rule table; earlier rules take priority.
pub fn date_rules() -> &'static [DateRule] {
    DATE_RULES.as_slice()
}

impl DateRule {
    /// Returns this rule's first valid hit in `text`.
    pub fn find(&self, text: &str) -> Option<DateHit> {
        match &self.matcher {
            DateMatcher::Calendar { regex } => {
                let caps = regex.captures(text)?;
                let month = capture_number(&caps, "month")?;
                let day = capture_number(&caps, "day")?;
                if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
                    return None;
                }
                let year = match caps.name("year") {
                    Some(raw) => Some(raw.as_str().parse::<i32>().ok()?),
                    None => None,
                };
                let whole = caps.get(0)?;
                Some(DateHit {
                    rule: self.name,
                    range: whole.range(),
                    value: DateValue::Calendar { year, month, day },
                })
            }
            DateMatcher::Relative {
                phrase,
                offset_days,
                ignore_case,
            } => {
                let start = if *ignore_case {
                    find_phrase(text, phrase)?
                } else {
                    text.find(phrase)?
                };
                Some(DateHit {
                    rule: self.name,
                    range: start..start + phrase.len(),
                    value: DateValue::Offset(*offset_days),
                })
            }
        }
    }
}

/// Locates the highest-priority date phrase in `text`.
pub fn find_due_date(text: &str) -> Option<DateHit> {
    if text.trim().is_empty() {
        return None;
    }
    date_rules().iter().find_map(|rule| rule.find(text))
}

/// Resolves a date phrase against `today`.
pub fn extract_due_date_on(text: &str, today: NaiveDate) -> Option<String> {
    find_due_date(text)?.value.to_iso(today)
}

/// Resolves a date phrase against the local current date.
pub fn extract_due_date(text: &str) -> Option<String> {
    extract_due_date_on(text, Local::now().date_naive())
}

/// Locates a time-of-day phrase and resolves it to `HH:MM`.
///
/// A numeric `H:MM` match is tried first; when it is out of range the Chinese
/// pattern is tried instead.
pub fn find_time(text: &str) -> Option<TimeHit> {
    if text.trim().is_empty() {
        return None;
    }

    if let Some(caps) = NUMERIC_TIME_RE.captures(text) {
        let hour = capture_number(&caps, "hour")?;
        let minute = capture_number(&caps, "minute")?;
        if hour <= 23 && minute <= 59 {
            return Some(TimeHit {
                range: caps.get(0)?.range(),
                value: format!("{hour:02}:{minute:02}"),
            });
        }
    }

    let caps = ZH_TIME_RE.captures(text)?;
    let period = caps.name("period").map(|m| m.as_str()).unwrap_or_default();
    let mut hour = parse_cn_number(caps.name("hour")?.as_str())?;
    let minute = match caps.name("minute").map(|m| m.as_str().trim()) {
        None | Some("") => 0,
        Some("半") => 30,
        Some("一刻") => 15,
        Some("三刻") => 45,
        Some(token) => parse_cn_number(token.trim_end_matches('分'))?,
    };

    match period {
        "下午" | "晚上" | "中午" if (1..=11).contains(&hour) => hour += 12,
        "凌晨" if hour == 12 => hour = 0,
        _ => {}
    }

    if hour > 23 || minute > 59 {
        return None;
    }

    Some(TimeHit {
        range: trimmed_range(text, caps.get(0)?.range()),
        value: format!("{hour:02}:{minute:02}"),
    })
}

/// Resolves a time-of-day phrase to 24-hour `HH:MM`.
pub fn extract_time(text: &str) -> Option<String> {
    find_time(text).map(|hit| hit.value)
}

/// Locates the first task id, trying id patterns in priority order.
pub fn find_id(text: &str) -> Option<IdHit> {
    ID_PATTERNS.iter().find_map(|regex| {
        let digits = regex.captures(text)?.get(1)?;
        let value = digits.as_str().parse::<i64>().ok()?;
        Some(IdHit {
            range: digits.range(),
            value,
        })
    })
}

/// Returns the first task id referenced in `text`.
pub fn extract_id(text: &str) -> Option<i64> {
    find_id(text).map(|hit| hit.value)
}

/// ASCII-case-insensitive phrase search returning a byte offset.
///
/// A phrase edge that is an ASCII word character only matches on an ASCII
/// word boundary, so `work` never matches inside `homework`. CJK edges match
/// literally. ASCII lowercasing preserves byte offsets, so the result indexes
/// `haystack`.
pub(crate) fn find_phrase(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let haystack = haystack.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();
    let bounded_start = needle.starts_with(is_ascii_word);
    let bounded_end = needle.ends_with(is_ascii_word);

    haystack
        .match_indices(needle.as_str())
        .map(|(start, _)| start)
        .find(|&start| {
            let end = start + needle.len();
            (!bounded_start || !haystack[..start].ends_with(is_ascii_word))
                && (!bounded_end || !haystack[end..].starts_with(is_ascii_word))
        })
}

fn is_ascii_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn capture_number(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name)?.as_str().parse().ok()
}

fn trimmed_range(text: &str, range: Range<usize>) -> Range<usize> {
    let matched = &text[range.clone()];
    let leading = matched.len() - matched.trim_start().len();
    let trailing = matched.len() - matched.trim_end().len();
    if leading + trailing >= matched.len() {
        return range;
    }
    range.start + leading..range.end - trailing
}

#[cfg(test)]
mod tests {
    use super::{date_rules, extract_due_date_on, find_phrase, find_time, trimmed_range};
    use chrono::NaiveDate;

    #[test]
    fn relative_rules_list_longer_phrases_first() {
        let names: Vec<&str> = date_rules().iter().map(|rule| rule.name).collect();
        let position = |name: &str| names.iter().position(|n| *n == name).unwrap();
        assert!(position("zh_in_three_days") < position("zh_in_two_days"));
        assert!(position("zh_in_two_days") < position("zh_tomorrow"));
        assert!(position("zh_tomorrow") < position("zh_today"));
        assert!(position("en_in_two_days") < position("en_tomorrow"));
        assert!(position("en_tomorrow") < position("en_today"));
        assert!(position("zh_short") < position("zh_in_three_days"));
    }

    #[test]
    fn time_hit_range_excludes_surrounding_whitespace() {
        let text = "开会 3点 记得";
        let hit = find_time(text).unwrap();
        assert_eq!(&text[hit.range.clone()], "3点");
        assert_eq!(hit.value, "03:00");
    }

    #[test]
    fn trimmed_range_keeps_all_whitespace_match() {
        assert_eq!(trimmed_range("   ", 0..3), 0..3);
        assert_eq!(trimmed_range(" ab ", 0..4), 1..3);
    }

    #[test]
    fn phrase_search_keeps_byte_offsets() {
        assert_eq!(find_phrase("明天 Tomorrow", "tomorrow"), Some(7));
        assert_eq!(find_phrase("明天Tomorrow前", "tomorrow"), Some(6));
        assert_eq!(find_phrase("today", "tomorrow"), None);
    }

    #[test]
    fn phrase_search_requires_ascii_word_boundaries() {
        assert_eq!(find_phrase("finish homework", "work"), None);
        assert_eq!(find_phrase("homework, then work", "work"), Some(15));
        assert_eq!(find_phrase("follow up", "low"), None);
        assert_eq!(find_phrase("mark not done", "not done"), Some(5));
        assert_eq!(find_phrase("优先级高", "高"), Some(9));
    }

    #[test]
    fn english_relative_dates_need_whole_words() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 27).unwrap();
        assert_eq!(extract_due_date_on("todays agenda", today), None);
        assert_eq!(
            extract_due_date_on("due Today.", today).as_deref(),
            Some("2026-02-27")
        );
    }
}
