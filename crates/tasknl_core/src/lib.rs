//! Core natural-language command interpretation for task mutations.
//! This crate owns span decoding, value normalization and command assembly.

pub mod config;
pub mod inference;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod service;
pub mod slots;

pub use config::{ConfigError, InterpreterConfig};
pub use inference::cache::ModelCache;
pub use inference::model::{
    IntentModel, IntentPrediction, ModelError, ModelLoader, SlotModel, SlotPrediction,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::command::{Action, Category, Command, Priority, Target, TaskPatch};
pub use model::label::{BioTag, EntityKind, LabelError, LabelTable, SLOT_LABELS};
pub use model::span::{SlotAnnotation, Span};
pub use normalize::datetime::{
    extract_due_date, extract_due_date_on, extract_id, extract_time, find_due_date, find_id,
    find_time,
};
pub use normalize::keywords::{
    canonical_category, canonical_priority, CATEGORY_KEYWORDS, PRIORITY_KEYWORDS,
};
pub use normalize::numeral::parse_cn_number;
pub use service::assembler::CommandAssembler;
pub use service::interpreter::{interpret_heuristic, CommandInterpreter, InterpretError};
pub use slots::dataset::{
    annotate_records, build_char_labels, build_dataset, load_jsonl, read_raw_records,
    validate_record, write_jsonl, DatasetError, RawRecord, RecordError, SlotRecord,
};
pub use slots::decoder::{decode_spans, DecodeError};
pub use slots::heuristic::HeuristicSlotTagger;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
