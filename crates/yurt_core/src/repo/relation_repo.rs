//! Relocation relation repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the per-student history of address changes.
//! - Answer "does this student have an active relation" and "which relation
//!   points at this address".
//!
//! # Invariants
//! - Relations are inserted active and never deleted.
//! - Deactivation is one-way; no API sets `is_active` back to 1.
//! - A second active relation for one student is rejected by the
//!   `idx_relations_one_active_per_student` partial unique index.

use crate::model::address::AddressId;
use crate::model::relation::{AddressStudentRelation, NewRelation, RelationId};
use crate::model::student::StudentId;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::{ensure_connection_ready, int_to_bool};
use rusqlite::{params, Connection, OptionalExtension, Row};

const RELATION_SELECT_SQL: &str = "SELECT
    id,
    student_id,
    current_address_id,
    old_address_id,
    is_active,
    created_at
FROM address_student_relations";

/// Repository interface for relocation relations.
pub trait RelationRepository {
    /// Inserts an active relation and returns the stored row.
    fn create_relation(&self, relation: &NewRelation) -> RepoResult<AddressStudentRelation>;
    fn exists_active_for_student(&self, student_id: StudentId) -> RepoResult<bool>;
    fn get_active_for_student(
        &self,
        student_id: StudentId,
    ) -> RepoResult<Option<AddressStudentRelation>>;
    /// Returns the active relation pointing at `address_id`, or the newest
    /// inactive one when none is active.
    fn get_by_current_address_id(
        &self,
        address_id: AddressId,
    ) -> RepoResult<Option<AddressStudentRelation>>;
    /// Flips one active relation to inactive.
    ///
    /// Returns `NotFound` when the relation is missing or already inactive.
    fn deactivate_relation(&self, id: RelationId) -> RepoResult<()>;
    /// Full history for one student, oldest first.
    fn list_for_student(&self, student_id: StudentId) -> RepoResult<Vec<AddressStudentRelation>>;
}

/// SQLite-backed relation repository.
pub struct SqliteRelationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRelationRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn from_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn get_relation(&self, id: RelationId) -> RepoResult<Option<AddressStudentRelation>> {
        let row = self
            .conn
            .query_row(
                &format!("{RELATION_SELECT_SQL} WHERE id = ?1;"),
                [id],
                RawRelation::from_row,
            )
            .optional()?;
        row.map(RawRelation::into_relation).transpose()
    }
}

impl RelationRepository for SqliteRelationRepository<'_> {
    fn create_relation(&self, relation: &NewRelation) -> RepoResult<AddressStudentRelation> {
        self.conn.execute(
            "INSERT INTO address_student_relations (
                student_id,
                current_address_id,
                old_address_id,
                is_active
            ) VALUES (?1, ?2, ?3, 1);",
            params![
                relation.student_id,
                relation.current_address_id,
                relation.old_address_id,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_relation(id)?
            .ok_or_else(|| RepoError::InvalidData(format!("relation {id} missing after insert")))
    }

    fn exists_active_for_student(&self, student_id: StudentId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM address_student_relations
                WHERE student_id = ?1 AND is_active = 1
            );",
            [student_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn get_active_for_student(
        &self,
        student_id: StudentId,
    ) -> RepoResult<Option<AddressStudentRelation>> {
        let row = self
            .conn
            .query_row(
                &format!("{RELATION_SELECT_SQL} WHERE student_id = ?1 AND is_active = 1;"),
                [student_id],
                RawRelation::from_row,
            )
            .optional()?;
        row.map(RawRelation::into_relation).transpose()
    }

    fn get_by_current_address_id(
        &self,
        address_id: AddressId,
    ) -> RepoResult<Option<AddressStudentRelation>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "{RELATION_SELECT_SQL}
                     WHERE current_address_id = ?1
                     ORDER BY is_active DESC, id DESC
                     LIMIT 1;"
                ),
                [address_id],
                RawRelation::from_row,
            )
            .optional()?;
        row.map(RawRelation::into_relation).transpose()
    }

    fn deactivate_relation(&self, id: RelationId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE address_student_relations
             SET is_active = 0
             WHERE id = ?1 AND is_active = 1;",
            [id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "active relation",
                id,
            });
        }

        Ok(())
    }

    fn list_for_student(&self, student_id: StudentId) -> RepoResult<Vec<AddressStudentRelation>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RELATION_SELECT_SQL} WHERE student_id = ?1 ORDER BY id ASC;"))?;
        let mut rows = stmt.query([student_id])?;
        let mut relations = Vec::new();
        while let Some(row) = rows.next()? {
            relations.push(RawRelation::from_row(row)?.into_relation()?);
        }
        Ok(relations)
    }
}

/// Row image before the `is_active` flag is checked.
struct RawRelation {
    id: RelationId,
    student_id: StudentId,
    current_address_id: AddressId,
    old_address_id: Option<AddressId>,
    is_active: i64,
    created_at: i64,
}

impl RawRelation {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            student_id: row.get("student_id")?,
            current_address_id: row.get("current_address_id")?,
            old_address_id: row.get("old_address_id")?,
            is_active: row.get("is_active")?,
            created_at: row.get("created_at")?,
        })
    }

    fn into_relation(self) -> RepoResult<AddressStudentRelation> {
        Ok(AddressStudentRelation {
            id: self.id,
            student_id: self.student_id,
            current_address_id: self.current_address_id,
            old_address_id: self.old_address_id,
            active: int_to_bool(self.is_active, "address_student_relations.is_active")?,
            created_at: self.created_at,
        })
    }
}
