//! Structured command model.
//!
//! # Responsibility
//! - Define the `{action, target, task_patch, confidence}` output shape.
//! - Keep canonical category/priority vocabularies as closed enums.
//!
//! # Invariants
//! - Every patch field is nullable and serialized even when `None`.
//! - `confidence` is the classifier's raw top-1 probability, never rescaled.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Mutation requested by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Add,
    Update,
    Done,
    Reopen,
    Remove,
}

impl Action {
    /// Classifier output order: index `i` is class id `i`.
    pub const ALL: [Action; 5] = [
        Self::Add,
        Self::Update,
        Self::Done,
        Self::Reopen,
        Self::Remove,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Done => "done",
            Self::Reopen => "reopen",
            Self::Remove => "remove",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == normalized)
    }

    /// Maps a classifier class id to its action.
    pub fn from_class_id(id: usize) -> Option<Self> {
        Self::ALL.get(id).copied()
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Work,
    Study,
    Personal,
}

/// Canonical task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Task addressed by the command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: Option<i64>,
}

/// Field-level mutation. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub description: Option<String>,
    pub details: Option<String>,
    pub completed: Option<bool>,
    /// `YYYY-MM-DD`.
    pub due_date: Option<String>,
    /// 24-hour `HH:MM`.
    pub due_time: Option<String>,
    pub all_day: Option<bool>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub color: Option<String>,
}

impl TaskPatch {
    /// Returns whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Canonical structured command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub action: Action,
    pub target: Target,
    /// Serialized as `task_patch` to match the CRUD layer's schema.
    #[serde(rename = "task_patch")]
    pub patch: TaskPatch,
    pub confidence: f64,
}

impl Command {
    /// Creates a command with an empty target and patch.
    pub fn new(action: Action, confidence: f64) -> Self {
        Self {
            action,
            target: Target::default(),
            patch: TaskPatch::default(),
            confidence,
        }
    }
}
