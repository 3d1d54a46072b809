//! Weak-label dataset bootstrap.
//!
//! # Responsibility
//! - Annotate `{text, action}` records with heuristic slots.
//! - Read/write the JSONL training shape `{text, action, slots}`.
//! - Build character-level BIO targets from slot annotations.
//!
//! # Invariants
//! - Records with empty text or action are skipped, never rejected.
//! - Slot offsets are character offsets; JSONL keeps non-ASCII text unescaped.

use crate::model::command::Action;
use crate::model::label::BioTag;
use crate::model::span::{char_len, SlotAnnotation};
use crate::slots::heuristic::HeuristicSlotTagger;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Unannotated input record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

/// Annotated training record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub text: String,
    pub action: String,
    #[serde(default)]
    pub slots: Vec<SlotAnnotation>,
}

/// Dataset IO/decoding errors.
#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    /// `line` is 1-based for JSONL input, `None` for whole-document JSON.
    Json {
        line: Option<usize>,
        source: serde_json::Error,
    },
}

impl Display for DatasetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Json {
                line: Some(line),
                source,
            } => write!(f, "invalid json at line {line}: {source}"),
            Self::Json { line: None, source } => write!(f, "invalid json: {source}"),
        }
    }
}

impl Error for DatasetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Semantic problems found by [`validate_record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    InvalidAction(String),
    InvalidSlot {
        index: usize,
        start: usize,
        end: usize,
    },
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAction(value) => write!(f, "invalid action: {value}"),
            Self::InvalidSlot { index, start, end } => {
                write!(f, "slot {index} has invalid range ({start}, {end})")
            }
        }
    }
}

impl Error for RecordError {}

/// Reads a JSON array of raw records.
pub fn read_raw_records<R: Read>(reader: R) -> Result<Vec<RawRecord>, DatasetError> {
    serde_json::from_reader(reader).map_err(|source| DatasetError::Json { line: None, source })
}

/// Annotates raw records, skipping those without text or action.
pub fn annotate_records(records: &[RawRecord], tagger: &HeuristicSlotTagger) -> Vec<SlotRecord> {
    records
        .iter()
        .filter_map(|record| {
            let text = record.text.as_deref().filter(|text| !text.is_empty())?;
            let action = record.action.as_deref().filter(|action| !action.is_empty())?;
            Some(SlotRecord {
                text: text.to_string(),
                action: action.to_string(),
                slots: tagger.tag(text).iter().map(|span| span.annotation()).collect(),
            })
        })
        .collect()
}

/// Writes one JSON object per line and returns the number of lines.
pub fn write_jsonl<W: Write>(writer: W, records: &[SlotRecord]) -> Result<usize, DatasetError> {
    let mut writer = BufWriter::new(writer);
    for record in records {
        serde_json::to_writer(&mut writer, record)
            .map_err(|source| DatasetError::Json { line: None, source })?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(records.len())
}

/// Reads JSONL records, skipping blank lines.
pub fn load_jsonl<R: BufRead>(reader: R) -> Result<Vec<SlotRecord>, DatasetError> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let record = serde_json::from_str(trimmed).map_err(|source| DatasetError::Json {
            line: Some(index + 1),
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Converts a JSON dataset file into annotated JSONL.
///
/// Creates the output's parent directory when missing. Returns the number of
/// records written.
pub fn build_dataset(input: &Path, output: &Path) -> Result<usize, DatasetError> {
    let raw = read_raw_records(BufReader::new(File::open(input)?))?;
    let annotated = annotate_records(&raw, &HeuristicSlotTagger::new());
    let skipped = raw.len() - annotated.len();
    if skipped > 0 {
        warn!(
            "event=dataset_build module=slots status=partial skipped_records={}",
            skipped
        );
    }

    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let written = write_jsonl(File::create(output)?, &annotated)?;

    info!(
        "event=dataset_build module=slots status=ok input_records={} written_records={}",
        raw.len(),
        written
    );
    Ok(written)
}

/// Checks a record's action and slot ranges against its text.
pub fn validate_record(record: &SlotRecord) -> Result<(), RecordError> {
    if Action::parse(&record.action).is_none() {
        return Err(RecordError::InvalidAction(record.action.clone()));
    }
    let text_len = char_len(&record.text);
    for (index, slot) in record.slots.iter().enumerate() {
        if slot.start >= slot.end || slot.end > text_len {
            return Err(RecordError::InvalidSlot {
                index,
                start: slot.start,
                end: slot.end,
            });
        }
    }
    Ok(())
}

/// Builds one BIO tag per character of `text`.
///
/// Invalid ranges are skipped; later slots overwrite earlier ones where they
/// overlap.
pub fn build_char_labels(text: &str, slots: &[SlotAnnotation]) -> Vec<BioTag> {
    let text_len = char_len(text);
    let mut labels = vec![BioTag::Outside; text_len];
    for slot in slots {
        if slot.start >= slot.end || slot.end > text_len {
            continue;
        }
        labels[slot.start] = BioTag::Begin(slot.label);
        for label in &mut labels[slot.start + 1..slot.end] {
            *label = BioTag::Inside(slot.label);
        }
    }
    labels
}

