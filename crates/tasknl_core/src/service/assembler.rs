//! Spans + action -> structured command.
//!
//! # Responsibility
//! - Normalize each span into its patch/target field.
//! - Apply action-driven defaults and the full-text id fallback.
//!
//! # Invariants
//! - Always yields a structurally valid `Command`, even when nothing parses.
//! - A span whose value does not normalize leaves its field untouched.
//! - `confidence` is copied through unmodified.

use crate::model::command::{Action, Command};
use crate::model::label::EntityKind;
use crate::model::span::Span;
use crate::normalize::datetime::{extract_due_date_on, extract_id, extract_time};
use crate::normalize::keywords::{canonical_category, canonical_priority};
use chrono::{Local, NaiveDate};

/// Builds commands relative to a fixed reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandAssembler {
    today: NaiveDate,
}

impl CommandAssembler {
    /// Assembler resolving relative dates against `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Assembler resolving relative dates against the local current date.
    pub fn for_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Fills a command from spans in the order they occur in `spans`.
    pub fn assemble(&self, text: &str, action: Action, confidence: f64, spans: &[Span]) -> Command {
        let mut command = Command::new(action, confidence);
        for span in spans {
            self.apply_span(&mut command, span);
        }

        let patch = &mut command.patch;
        match action {
            Action::Done => patch.completed = Some(true),
            Action::Reopen => patch.completed = Some(false),
            Action::Add | Action::Update | Action::Remove => {}
        }

        let has_description = patch
            .description
            .as_deref()
            .is_some_and(|description| !description.is_empty());
        if action == Action::Add && !has_description {
            patch.description = Some(text.to_string());
        }

        if command.target.id.is_none() {
            command.target.id = extract_id(text);
        }

        command
    }

    fn apply_span(&self, command: &mut Command, span: &Span) {
        let patch = &mut command.patch;
        match span.label {
            EntityKind::Id => {
                let digits: String = span.text.chars().filter(|c| c.is_ascii_digit()).collect();
                if let Ok(id) = digits.parse::<i64>() {
                    command.target.id = Some(id);
                }
            }
            EntityKind::Date => {
                if let Some(date) = extract_due_date_on(&span.text, self.today) {
                    patch.due_date = Some(date);
                }
            }
            EntityKind::Time => {
                if let Some(time) = extract_time(&span.text) {
                    patch.due_time = Some(time);
                    patch.all_day = Some(false);
                }
            }
            EntityKind::AllDay => {
                patch.all_day = Some(true);
                patch.due_time = None;
            }
            EntityKind::Category => {
                if let Some(category) = canonical_category(&span.text) {
                    patch.category = Some(category);
                }
            }
            EntityKind::Priority => {
                if let Some(priority) = canonical_priority(&span.text) {
                    patch.priority = Some(priority);
                }
            }
            EntityKind::Title => patch.description = Some(span.text.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CommandAssembler;
    use crate::model::command::Action;
    use crate::model::label::EntityKind;
    use crate::model::span::Span;
    use chrono::NaiveDate;

    fn assembler() -> CommandAssembler {
        CommandAssembler::new(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
    }

    #[test]
    fn unparseable_id_span_is_ignored_and_full_text_fallback_applies() {
        let text = "改 ID 9";
        let spans = vec![Span::from_source(text, 0, 1, EntityKind::Id).unwrap()];
        let command = assembler().assemble(text, Action::Update, 0.5, &spans);
        assert_eq!(command.target.id, Some(9));
    }

    #[test]
    fn allday_after_time_clears_due_time() {
        let text = "3点 全天";
        let spans = vec![
            Span::from_source(text, 0, 2, EntityKind::Time).unwrap(),
            Span::from_source(text, 3, 5, EntityKind::AllDay).unwrap(),
        ];
        let command = assembler().assemble(text, Action::Update, 0.5, &spans);
        assert_eq!(command.patch.due_time, None);
        assert_eq!(command.patch.all_day, Some(true));
    }

    #[test]
    fn unparseable_time_leaves_all_day_unset() {
        let text = "一会儿";
        let spans = vec![Span::from_source(text, 0, 3, EntityKind::Time).unwrap()];
        let command = assembler().assemble(text, Action::Update, 0.5, &spans);
        assert_eq!(command.patch.due_time, None);
        assert_eq!(command.patch.all_day, None);
    }
}
