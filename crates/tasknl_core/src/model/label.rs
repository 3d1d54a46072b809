//! Entity and BIO tag vocabulary.
//!
//! # Responsibility
//! - Define the seven slot entities and the 15-value BIO tagging vocabulary.
//! - Parse label strings into tagged variants once, at table construction.
//!
//! # Invariants
//! - `SLOT_LABELS[i]` is the canonical label for model output id `i`.
//! - A `LabelTable` never contains an unparsed or unknown label string.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot entity kinds, in canonical vocabulary order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityKind {
    Id,
    Date,
    Time,
    AllDay,
    Category,
    Priority,
    Title,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        Self::Id,
        Self::Date,
        Self::Time,
        Self::AllDay,
        Self::Category,
        Self::Priority,
        Self::Title,
    ];

    /// Stable wire name (`ID`, `DATE`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::AllDay => "ALLDAY",
            Self::Category => "CATEGORY",
            Self::Priority => "PRIORITY",
            Self::Title => "TITLE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == value.trim())
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One position in the BIO tagging scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BioTag {
    Outside,
    Begin(EntityKind),
    Inside(EntityKind),
}

impl BioTag {
    /// Parses `O`, `B-<ENTITY>` or `I-<ENTITY>`.
    pub fn parse(value: &str) -> Result<Self, LabelError> {
        let trimmed = value.trim();
        if trimmed == "O" {
            return Ok(Self::Outside);
        }
        let (prefix, entity) = trimmed
            .split_once('-')
            .ok_or_else(|| LabelError::UnknownLabel(trimmed.to_string()))?;
        let kind = EntityKind::parse(entity)
            .ok_or_else(|| LabelError::UnknownLabel(trimmed.to_string()))?;
        match prefix {
            "B" => Ok(Self::Begin(kind)),
            "I" => Ok(Self::Inside(kind)),
            _ => Err(LabelError::UnknownLabel(trimmed.to_string())),
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::Outside => "O".to_string(),
            Self::Begin(kind) => format!("B-{kind}"),
            Self::Inside(kind) => format!("I-{kind}"),
        }
    }
}

/// Canonical BIO label strings; index is the model output id.
pub const SLOT_LABELS: [&str; 15] = [
    "O",
    "B-ID",
    "I-ID",
    "B-DATE",
    "I-DATE",
    "B-TIME",
    "I-TIME",
    "B-ALLDAY",
    "I-ALLDAY",
    "B-CATEGORY",
    "I-CATEGORY",
    "B-PRIORITY",
    "I-PRIORITY",
    "B-TITLE",
    "I-TITLE",
];

/// Label table errors raised while building an id -> tag mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    UnknownLabel(String),
    DuplicateId(u32),
}

impl Display for LabelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLabel(value) => write!(f, "label is not in the BIO vocabulary: `{value}`"),
            Self::DuplicateId(id) => write!(f, "label id declared twice: {id}"),
        }
    }
}

impl Error for LabelError {}

/// Parsed id -> tag mapping supplied by the sequence-labeling collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    tags: BTreeMap<u32, BioTag>,
}

impl LabelTable {
    /// Table over `SLOT_LABELS` in canonical order.
    pub fn canonical() -> Self {
        let tags = SLOT_LABELS
            .iter()
            .enumerate()
            .filter_map(|(id, label)| BioTag::parse(label).ok().map(|tag| (id as u32, tag)))
            .collect();
        Self { tags }
    }

    /// Builds a table from `(id, label)` pairs, parsing each label once.
    pub fn from_labels<I, S>(labels: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = (u32, S)>,
        S: AsRef<str>,
    {
        let mut tags = BTreeMap::new();
        for (id, label) in labels {
            let tag = BioTag::parse(label.as_ref())?;
            if tags.insert(id, tag).is_some() {
                return Err(LabelError::DuplicateId(id));
            }
        }
        Ok(Self { tags })
    }

    pub fn get(&self, id: u32) -> Option<BioTag> {
        self.tags.get(&id).copied()
    }

    /// Reverse lookup used when building training targets.
    pub fn id_of(&self, tag: BioTag) -> Option<u32> {
        self.tags
            .iter()
            .find(|(_, candidate)| **candidate == tag)
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
