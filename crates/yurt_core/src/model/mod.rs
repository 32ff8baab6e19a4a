//! Domain model for student records and relocation history.
//!
//! # Responsibility
//! - Define the canonical records shared by stores and the orchestrator.
//! - Keep request shapes separate from persisted rows.
//!
//! # Invariants
//! - Row identities are generated by storage and never reused.
//! - A student has at most one active relocation relation at a time.

pub mod address;
pub mod relation;
pub mod student;
