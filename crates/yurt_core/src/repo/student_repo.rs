//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update APIs over `students` storage.
//! - Provide the equality lookups and per-school aggregate used by callers.
//!
//! # Invariants
//! - List queries are ordered by `id ASC` so results are stable.
//! - `update_student` never touches `address_id`; only `set_address_id` does.

use crate::model::address::AddressId;
use crate::model::student::{NewStudent, SchoolStudentCount, Student, StudentId, StudentUpdate};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::ensure_connection_ready;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    identity_number,
    name,
    surname,
    school_name,
    phone_number,
    address_id
FROM students";

/// Repository interface for student persistence.
pub trait StudentRepository {
    fn create_student(&self, student: &NewStudent) -> RepoResult<Student>;
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    fn get_student_by_identity_number(&self, identity_number: &str) -> RepoResult<Option<Student>>;
    /// Replaces scalar fields. Returns `NotFound` when no row matches.
    fn update_student(&self, id: StudentId, update: &StudentUpdate) -> RepoResult<Student>;
    /// Points the student at a new address. Returns `NotFound` when no row matches.
    fn set_address_id(&self, id: StudentId, address_id: AddressId) -> RepoResult<()>;
    fn list_students(&self) -> RepoResult<Vec<Student>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Student>>;
    fn find_by_name_and_surname(&self, name: &str, surname: &str) -> RepoResult<Vec<Student>>;
    fn find_by_school_name(&self, school_name: &str) -> RepoResult<Vec<Student>>;
    /// Returns one row per school, ordered by school name.
    fn school_list_with_counts(&self) -> RepoResult<Vec<SchoolStudentCount>>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn from_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_students<P: Params>(&self, filter: &str, params: P) -> RepoResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} {filter} ORDER BY id ASC;"))?;
        let mut rows = stmt.query(params)?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }

    fn query_one_student<P: Params>(&self, filter: &str, params: P) -> RepoResult<Option<Student>> {
        let student = self
            .conn
            .query_row(&format!("{STUDENT_SELECT_SQL} {filter};"), params, parse_student_row)
            .optional()?;
        Ok(student)
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn create_student(&self, student: &NewStudent) -> RepoResult<Student> {
        self.conn.execute(
            "INSERT INTO students (
                identity_number,
                name,
                surname,
                school_name,
                phone_number,
                address_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                student.identity_number.as_str(),
                student.name.as_str(),
                student.surname.as_str(),
                student.school_name.as_str(),
                student.phone_number.as_str(),
                student.address_id,
            ],
        )?;

        Ok(Student {
            id: self.conn.last_insert_rowid(),
            identity_number: student.identity_number.clone(),
            name: student.name.clone(),
            surname: student.surname.clone(),
            school_name: student.school_name.clone(),
            phone_number: student.phone_number.clone(),
            address_id: student.address_id,
        })
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        self.query_one_student("WHERE id = ?1", [id])
    }

    fn get_student_by_identity_number(&self, identity_number: &str) -> RepoResult<Option<Student>> {
        self.query_one_student("WHERE identity_number = ?1", [identity_number])
    }

    fn update_student(&self, id: StudentId, update: &StudentUpdate) -> RepoResult<Student> {
        let changed = self.conn.execute(
            "UPDATE students
             SET
                identity_number = ?1,
                name = ?2,
                surname = ?3,
                school_name = ?4,
                phone_number = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?6;",
            params![
                update.identity_number.as_str(),
                update.name.as_str(),
                update.surname.as_str(),
                update.school_name.as_str(),
                update.phone_number.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "student",
                id,
            });
        }

        self.get_student(id)?.ok_or(RepoError::NotFound {
            entity: "student",
            id,
        })
    }

    fn set_address_id(&self, id: StudentId, address_id: AddressId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE students
             SET
                address_id = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![address_id, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "student",
                id,
            });
        }

        Ok(())
    }

    fn list_students(&self) -> RepoResult<Vec<Student>> {
        self.query_students("", [])
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Student>> {
        self.query_students("WHERE name = ?1", [name])
    }

    fn find_by_name_and_surname(&self, name: &str, surname: &str) -> RepoResult<Vec<Student>> {
        self.query_students("WHERE name = ?1 AND surname = ?2", [name, surname])
    }

    fn find_by_school_name(&self, school_name: &str) -> RepoResult<Vec<Student>> {
        self.query_students("WHERE school_name = ?1", [school_name])
    }

    fn school_list_with_counts(&self) -> RepoResult<Vec<SchoolStudentCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT school_name, COUNT(*) AS student_count
             FROM students
             GROUP BY school_name
             ORDER BY school_name ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut schools = Vec::new();
        while let Some(row) = rows.next()? {
            let school_name: String = row.get("school_name")?;
            let count: i64 = row.get("student_count")?;
            let student_count = u64::try_from(count).map_err(|_| {
                RepoError::InvalidData(format!(
                    "negative student count `{count}` for school aggregate"
                ))
            })?;
            schools.push(SchoolStudentCount {
                school_name,
                student_count,
            });
        }
        Ok(schools)
    }
}

fn parse_student_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get("id")?,
        identity_number: row.get("identity_number")?,
        name: row.get("name")?,
        surname: row.get("surname")?,
        school_name: row.get("school_name")?,
        phone_number: row.get("phone_number")?,
        address_id: row.get("address_id")?,
    })
}
