//! Core domain logic for the Yurt student records system.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validate;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::address::{Address, AddressCreateRequest, AddressId};
pub use model::relation::{AddressStudentRelation, NewRelation, RelationId, RelationState};
pub use model::student::{
    NewStudent, SchoolStudentCount, Student, StudentCreateRequest, StudentId, StudentUpdate,
};
pub use repo::address_repo::{AddressRepository, SqliteAddressRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::relation_repo::{RelationRepository, SqliteRelationRepository};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository};
pub use repo::unit_of_work::UnitOfWork;
pub use service::student_service::{
    change_student_address_in, create_student_in, relocation_relation, ServiceError, ServiceResult,
    StudentService,
};
pub use validate::{
    validate_student_create, FieldValidator, ValidationError, STUDENT_CREATE_VALIDATORS,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
