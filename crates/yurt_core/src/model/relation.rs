//! Relocation relation model.
//!
//! # Responsibility
//! - Record one address change event for a student.
//!
//! # Invariants
//! - `old_address_id` is `None` only for the student's first relation.
//! - A relation starts `Active` and may move to `Inactive` exactly once.
//! - `Inactive` is terminal; relations are never deleted.

use crate::model::address::AddressId;
use crate::model::student::StudentId;
use serde::{Deserialize, Serialize};

/// Storage-generated relation identity.
pub type RelationId = i64;

/// Lifecycle of one relocation relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationState {
    /// Points at the student's current address.
    Active,
    /// Superseded by a newer relation for the same student.
    Inactive,
}

/// Persisted relocation relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressStudentRelation {
    pub id: RelationId,
    pub student_id: StudentId,
    pub current_address_id: AddressId,
    pub old_address_id: Option<AddressId>,
    pub active: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl AddressStudentRelation {
    pub fn state(&self) -> RelationState {
        if self.active {
            RelationState::Active
        } else {
            RelationState::Inactive
        }
    }
}

/// Insert payload for the relation store. Always persisted as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRelation {
    pub student_id: StudentId,
    pub current_address_id: AddressId,
    pub old_address_id: Option<AddressId>,
}
