//! Slot value normalization.
//!
//! # Responsibility
//! - Turn free-text slot phrases into canonical ISO dates/times and ids.
//! - Map category/priority phrases into the fixed canonical vocabularies.
//!
//! # Invariants
//! - Every function is pure and returns "no match" instead of failing.

pub mod datetime;
pub mod keywords;
pub mod numeral;
