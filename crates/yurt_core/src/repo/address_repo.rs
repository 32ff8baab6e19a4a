//! Address repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist address rows and return their generated identity.
//!
//! # Invariants
//! - Address rows are insert-only.

use crate::model::address::{Address, AddressCreateRequest, AddressId};
use crate::repo::error::RepoResult;
use crate::repo::schema::ensure_connection_ready;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for address persistence.
pub trait AddressRepository {
    /// Inserts a new address and returns the stored row.
    fn create_address(&self, request: &AddressCreateRequest) -> RepoResult<Address>;
    fn get_address(&self, id: AddressId) -> RepoResult<Option<Address>>;
}

/// SQLite-backed address repository.
pub struct SqliteAddressRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAddressRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Skips readiness checks for connections already verified by the caller.
    pub(crate) fn from_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AddressRepository for SqliteAddressRepository<'_> {
    fn create_address(&self, request: &AddressCreateRequest) -> RepoResult<Address> {
        self.conn.execute(
            "INSERT INTO addresses (city, district, street, building, postal_code)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                request.city.as_str(),
                request.district.as_str(),
                request.street.as_str(),
                request.building.as_deref(),
                request.postal_code.as_deref(),
            ],
        )?;

        Ok(Address {
            id: self.conn.last_insert_rowid(),
            city: request.city.clone(),
            district: request.district.clone(),
            street: request.street.clone(),
            building: request.building.clone(),
            postal_code: request.postal_code.clone(),
        })
    }

    fn get_address(&self, id: AddressId) -> RepoResult<Option<Address>> {
        let address = self
            .conn
            .query_row(
                "SELECT id, city, district, street, building, postal_code
                 FROM addresses
                 WHERE id = ?1;",
                [id],
                parse_address_row,
            )
            .optional()?;
        Ok(address)
    }
}

fn parse_address_row(row: &Row<'_>) -> rusqlite::Result<Address> {
    Ok(Address {
        id: row.get("id")?,
        city: row.get("city")?,
        district: row.get("district")?,
        street: row.get("street")?,
        building: row.get("building")?,
        postal_code: row.get("postal_code")?,
    })
}
