//! Slot span extraction.
//!
//! # Responsibility
//! - Decode learned BIO predictions into spans (`decoder`).
//! - Extract spans with rules only (`heuristic`) and bootstrap weak-label
//!   training data from them (`dataset`).

pub mod dataset;
pub mod decoder;
pub mod heuristic;
