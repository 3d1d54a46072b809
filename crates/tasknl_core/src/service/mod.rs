//! Use-case services.
//!
//! # Responsibility
//! - Compose decoded or heuristic spans into commands (`assembler`).
//! - Orchestrate model collaborators end to end (`interpreter`).
//!
//! # Invariants
//! - Services stay side-effect free apart from diagnostic logging.

pub mod assembler;
pub mod interpreter;
