//! Domain model for command interpretation.
//!
//! # Responsibility
//! - Define the entity/tag vocabulary shared by learned and heuristic paths.
//! - Define the canonical `Command` output consumed by the CRUD layer.
//!
//! # Invariants
//! - Span offsets are character offsets into the source text.
//! - A `Command` is built fresh per interpretation call and never persisted here.

pub mod command;
pub mod label;
pub mod span;
