//! Atomic unit of work over one SQLite transaction.
//!
//! # Responsibility
//! - Open an immediate (write-locking) transaction and hand out store
//!   handles bound to it.
//! - Make every write inside the unit visible together or not at all.
//!
//! # Invariants
//! - Dropping a unit without `commit()` rolls back every write made through it.
//! - Only one unit of work writes to a database file at a time; other
//!   connections wait up to the connection busy timeout when beginning.

use crate::repo::address_repo::SqliteAddressRepository;
use crate::repo::error::RepoResult;
use crate::repo::relation_repo::SqliteRelationRepository;
use crate::repo::schema::ensure_connection_ready;
use crate::repo::student_repo::SqliteStudentRepository;
use rusqlite::{Connection, DropBehavior, Transaction, TransactionBehavior};

/// One atomic grouping of store writes.
pub struct UnitOfWork<'conn> {
    tx: Transaction<'conn>,
}

impl<'conn> UnitOfWork<'conn> {
    /// Begins a unit of work on a migrated connection.
    ///
    /// # Errors
    /// - Schema readiness errors when the connection was not bootstrapped.
    /// - `Db` when the write lock cannot be taken within the busy timeout.
    pub fn begin(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Self::begin_ready(conn)
    }

    /// Begins a unit of work on a connection the caller already verified.
    pub(crate) fn begin_ready(conn: &'conn mut Connection) -> RepoResult<Self> {
        let mut tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.set_drop_behavior(DropBehavior::Rollback);
        Ok(Self { tx })
    }

    pub fn addresses(&self) -> SqliteAddressRepository<'_> {
        SqliteAddressRepository::from_ready(&self.tx)
    }

    pub fn students(&self) -> SqliteStudentRepository<'_> {
        SqliteStudentRepository::from_ready(&self.tx)
    }

    pub fn relations(&self) -> SqliteRelationRepository<'_> {
        SqliteRelationRepository::from_ready(&self.tx)
    }

    /// Makes all writes of this unit durable and visible.
    pub fn commit(self) -> RepoResult<()> {
        self.tx.commit()?;
        Ok(())
    }

    /// Discards all writes of this unit.
    pub fn rollback(self) -> RepoResult<()> {
        self.tx.rollback()?;
        Ok(())
    }
}
