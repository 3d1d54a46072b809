//! Seam to the external intent/slot model collaborators.
//!
//! # Responsibility
//! - Define the model handle and loader contracts.
//! - Memoize loaded handles per model directory behind an injected loader.
//!
//! # Invariants
//! - Nothing in this crate performs model inference itself.

pub mod cache;
pub mod model;
