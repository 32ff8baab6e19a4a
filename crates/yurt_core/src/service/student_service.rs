//! Student use-case service.
//!
//! # Responsibility
//! - Run field validators before student creation.
//! - Compose address, student and relation stores into the creation and
//!   relocation workflows, each inside one unit of work.
//! - Expose read/update pass-through queries over the student store.
//!
//! # Invariants
//! - A student has at most one active relocation relation. Creating a new
//!   relation deactivates the previous one first.
//! - `students.address_id` equals the active relation's `current_address_id`
//!   once a workflow commits.
//! - A failed workflow leaves no partial rows behind.
//! - Logs carry ids, counts and durations only, never personal fields.

use crate::model::address::{Address, AddressCreateRequest};
use crate::model::relation::{AddressStudentRelation, NewRelation};
use crate::model::student::{
    SchoolStudentCount, Student, StudentCreateRequest, StudentId, StudentUpdate,
};
use crate::repo::address_repo::{AddressRepository, SqliteAddressRepository};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::relation_repo::{RelationRepository, SqliteRelationRepository};
use crate::repo::student_repo::{SqliteStudentRepository, StudentRepository};
use crate::repo::unit_of_work::UnitOfWork;
use crate::validate::{validate_student_create, ValidationError};
use log::{error, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from student use-case operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected by a field validator.
    Validation(ValidationError),
    /// No student row has this id.
    StudentNotFound(StudentId),
    /// Stored rows disagree with the relocation invariants.
    InconsistentState(&'static str),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::StudentNotFound(id) => write!(f, "student not found: {id}"),
            Self::InconsistentState(details) => write!(f, "inconsistent student state: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                entity: "student",
                id,
            } => Self::StudentNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Student orchestration facade over one SQLite connection.
pub struct StudentService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> StudentService<'conn> {
    /// Creates a service from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        // Readiness is checked once here; query handles and units of work skip it.
        let _ = SqliteStudentRepository::try_new(conn)?;
        Ok(Self { conn })
    }

    /// Validates and creates a student together with its first address.
    ///
    /// # Contract
    /// - Validators run in declared order before any write; the first
    ///   failure is returned unchanged.
    /// - Address, student and first relation (active, no old address) are
    ///   written in one unit of work.
    pub fn create_student(&mut self, request: &StudentCreateRequest) -> ServiceResult<Student> {
        let started_at = Instant::now();
        if let Err(err) = validate_student_create(Some(request)) {
            warn!(
                "event=student_create module=service status=rejected error_code=validation_failed error={}",
                err
            );
            return Err(err.into());
        }

        let result = self.in_unit_of_work(|uow| create_student_in(uow, request));
        match &result {
            Ok(student) => info!(
                "event=student_create module=service status=ok student_id={} address_id={} duration_ms={}",
                student.id,
                student.address_id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=student_create module=service status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Moves a student to a newly created address.
    ///
    /// # Contract
    /// - Runs no field validators.
    /// - The previous active relation is deactivated and recorded as the new
    ///   relation's old address.
    /// - Returns the student with its updated address reference.
    pub fn change_student_address(
        &mut self,
        student_id: StudentId,
        request: &AddressCreateRequest,
    ) -> ServiceResult<Student> {
        let started_at = Instant::now();
        let result =
            self.in_unit_of_work(|uow| change_student_address_in(uow, student_id, request));
        match &result {
            Ok(student) => info!(
                "event=student_relocate module=service status=ok student_id={} address_id={} duration_ms={}",
                student.id,
                student.address_id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=student_relocate module=service status=error student_id={} duration_ms={} error={}",
                student_id,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Gets one student by id, or `StudentNotFound`.
    pub fn get_one_student_by_id(&self, id: StudentId) -> ServiceResult<Student> {
        self.students()
            .get_student(id)?
            .ok_or(ServiceError::StudentNotFound(id))
    }

    pub fn get_one_student_by_identity_number(
        &self,
        identity_number: &str,
    ) -> ServiceResult<Option<Student>> {
        Ok(self
            .students()
            .get_student_by_identity_number(identity_number)?)
    }

    /// Replaces a student's scalar fields. The address reference is kept.
    pub fn update_student(&self, id: StudentId, update: &StudentUpdate) -> ServiceResult<Student> {
        Ok(self.students().update_student(id, update)?)
    }

    pub fn get_student_by_name(&self, name: &str) -> ServiceResult<Vec<Student>> {
        Ok(self.students().find_by_name(name)?)
    }

    pub fn get_student_by_name_and_surname(
        &self,
        name: &str,
        surname: &str,
    ) -> ServiceResult<Vec<Student>> {
        Ok(self.students().find_by_name_and_surname(name, surname)?)
    }

    pub fn get_student_by_school_name(&self, school_name: &str) -> ServiceResult<Vec<Student>> {
        Ok(self.students().find_by_school_name(school_name)?)
    }

    pub fn get_school_list_with_student_count(&self) -> ServiceResult<Vec<SchoolStudentCount>> {
        Ok(self.students().school_list_with_counts()?)
    }

    pub fn get_all_students(&self) -> ServiceResult<Vec<Student>> {
        Ok(self.students().list_students()?)
    }

    /// Lists every relocation relation of a student, oldest first.
    pub fn get_relocation_history(
        &self,
        student_id: StudentId,
    ) -> ServiceResult<Vec<AddressStudentRelation>> {
        self.get_one_student_by_id(student_id)?;
        Ok(SqliteRelationRepository::from_ready(&*self.conn)
            .list_for_student(student_id)?)
    }

    /// Resolves the address the student currently points at.
    pub fn get_current_address(&self, student_id: StudentId) -> ServiceResult<Address> {
        let student = self.get_one_student_by_id(student_id)?;
        SqliteAddressRepository::from_ready(&*self.conn)
            .get_address(student.address_id)?
            .ok_or(ServiceError::InconsistentState("student points at a missing address"))
    }

    fn students(&self) -> SqliteStudentRepository<'_> {
        SqliteStudentRepository::from_ready(&*self.conn)
    }

    fn in_unit_of_work<T>(
        &mut self,
        work: impl FnOnce(&UnitOfWork<'_>) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let uow = UnitOfWork::begin_ready(&mut *self.conn)?;
        // Early return drops `uow`, which rolls the transaction back.
        let value = work(&uow)?;
        uow.commit()?;
        Ok(value)
    }
}

/// Student creation workflow body, run inside a caller-owned unit of work.
///
/// The caller commits; nothing here is visible until then.
pub fn create_student_in(
    uow: &UnitOfWork<'_>,
    request: &StudentCreateRequest,
) -> ServiceResult<Student> {
    let address = uow.addresses().create_address(&request.address)?;
    let student = uow
        .students()
        .create_student(&request.to_new_student(address.id))?;

    let relations = uow.relations();
    let relation = relocation_relation(&relations, &address, &student)?;
    relations.create_relation(&relation)?;
    Ok(student)
}

/// Relocation workflow body, run inside a caller-owned unit of work.
///
/// The new address is created before the student is loaded; a missing
/// student therefore relies on the unit of work rolling back.
pub fn change_student_address_in(
    uow: &UnitOfWork<'_>,
    student_id: StudentId,
    request: &AddressCreateRequest,
) -> ServiceResult<Student> {
    let address = uow.addresses().create_address(request)?;
    let students = uow.students();
    let mut student = students
        .get_student(student_id)?
        .ok_or(ServiceError::StudentNotFound(student_id))?;

    let relations = uow.relations();
    let relation = relocation_relation(&relations, &address, &student)?;
    relations.create_relation(&relation)?;

    students.set_address_id(student.id, address.id)?;
    student.address_id = address.id;
    Ok(student)
}

/// Builds the relation that makes `address` the student's current one.
///
/// When the student already has an active relation, that relation is
/// deactivated here and the student's previous address becomes the new
/// relation's `old_address_id`. The returned relation is always active.
pub fn relocation_relation<R: RelationRepository>(
    relations: &R,
    address: &Address,
    student: &Student,
) -> ServiceResult<NewRelation> {
    let mut old_address_id = None;
    if relations.exists_active_for_student(student.id)? {
        let previous = relations
            .get_by_current_address_id(student.address_id)?
            .filter(|relation| relation.active && relation.student_id == student.id)
            .ok_or(ServiceError::InconsistentState(
                "active relation does not point at the student's address",
            ))?;
        relations.deactivate_relation(previous.id)?;
        old_address_id = Some(student.address_id);
    }

    Ok(NewRelation {
        student_id: student.id,
        current_address_id: address.id,
        old_address_id,
    })
}
