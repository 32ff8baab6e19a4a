//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for addresses, students
//!   and relocation relations.
//! - Isolate SQLite query details from orchestration.
//! - Group store handles under one atomic unit of work.
//!
//! # Invariants
//! - Stores perform no cross-entity validation; the orchestrator owns the
//!   relocation invariants.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod address_repo;
pub mod error;
pub mod relation_repo;
mod schema;
pub mod student_repo;
pub mod unit_of_work;
