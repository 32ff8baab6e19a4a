//! Student domain model.
//!
//! # Responsibility
//! - Define persisted student rows and the request shapes that create or
//!   replace them.
//!
//! # Invariants
//! - `identity_number` is unique across all students.
//! - `address_id` always points at an existing address row.
//! - `address_id` changes only through relocation, never through
//!   `StudentUpdate`.

use crate::model::address::{AddressCreateRequest, AddressId};
use serde::{Deserialize, Serialize};

/// Storage-generated student identity.
pub type StudentId = i64;

/// Persisted student row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    /// National identity number, expected to be 11 characters.
    pub identity_number: String,
    pub name: String,
    pub surname: String,
    pub school_name: String,
    pub phone_number: String,
    /// Current address reference. Mirrors the active relocation relation.
    pub address_id: AddressId,
}

/// Input for the student creation workflow.
///
/// Carries the initial address inline; the orchestrator creates it first and
/// attaches the generated id before inserting the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentCreateRequest {
    pub identity_number: String,
    pub name: String,
    pub surname: String,
    pub school_name: String,
    pub phone_number: String,
    pub address: AddressCreateRequest,
}

impl StudentCreateRequest {
    /// Builds the insert payload once the initial address exists.
    pub fn to_new_student(&self, address_id: AddressId) -> NewStudent {
        NewStudent {
            identity_number: self.identity_number.clone(),
            name: self.name.clone(),
            surname: self.surname.clone(),
            school_name: self.school_name.clone(),
            phone_number: self.phone_number.clone(),
            address_id,
        }
    }
}

/// Insert payload for the student store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub identity_number: String,
    pub name: String,
    pub surname: String,
    pub school_name: String,
    pub phone_number: String,
    pub address_id: AddressId,
}

/// Full replacement of a student's scalar fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentUpdate {
    pub identity_number: String,
    pub name: String,
    pub surname: String,
    pub school_name: String,
    pub phone_number: String,
}

/// One row of the per-school aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolStudentCount {
    pub school_name: String,
    pub student_count: u64,
}
