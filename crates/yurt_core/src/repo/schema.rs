//! Connection readiness checks used by store constructors.

use crate::db::migrations::{current_user_version, latest_version};
use crate::repo::error::{RepoError, RepoResult};
use rusqlite::Connection;

/// Tables and the columns each store reads or writes.
const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    ("addresses", &["id", "city", "district", "street", "building", "postal_code"]),
    (
        "students",
        &[
            "id",
            "identity_number",
            "name",
            "surname",
            "school_name",
            "phone_number",
            "address_id",
            "updated_at",
        ],
    ),
    (
        "address_student_relations",
        &[
            "id",
            "student_id",
            "current_address_id",
            "old_address_id",
            "is_active",
            "created_at",
        ],
    ),
];

/// Rejects connections that did not go through `open_db*` bootstrap.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Maps SQLite's 0/1 integer flags, rejecting anything else.
pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!("invalid flag value `{other}` in {column}"))),
    }
}
