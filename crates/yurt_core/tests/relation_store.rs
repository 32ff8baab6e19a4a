use rusqlite::Connection;
use yurt_core::db::open_db_in_memory;
use yurt_core::{
    AddressCreateRequest, AddressId, AddressRepository, NewRelation, NewStudent, RelationRepository,
    RelationState, RepoError, SqliteAddressRepository, SqliteRelationRepository,
    SqliteStudentRepository, StudentId, StudentRepository,
};

fn new_address(conn: &Connection, street: &str) -> AddressId {
    SqliteAddressRepository::try_new(conn)
        .unwrap()
        .create_address(&AddressCreateRequest::new("Bursa", "Nilüfer", street))
        .unwrap()
        .id
}

fn new_student(conn: &Connection, identity_number: &str, address_id: AddressId) -> StudentId {
    SqliteStudentRepository::try_new(conn)
        .unwrap()
        .create_student(&NewStudent {
            identity_number: identity_number.to_string(),
            name: "Deniz".to_string(),
            surname: "Aydın".to_string(),
            school_name: "Nilüfer Lisesi".to_string(),
            phone_number: "05551112233".to_string(),
            address_id,
        })
        .unwrap()
        .id
}

#[test]
fn created_relation_is_active() {
    let conn = open_db_in_memory().unwrap();
    let x = new_address(&conn, "X Sk.");
    let student = new_student(&conn, "11111111111", x);
    let repo = SqliteRelationRepository::try_new(&conn).unwrap();

    assert!(!repo.exists_active_for_student(student).unwrap());
    let relation = repo
        .create_relation(&NewRelation {
            student_id: student,
            current_address_id: x,
            old_address_id: None,
        })
        .unwrap();

    assert!(relation.active);
    assert_eq!(relation.state(), RelationState::Active);
    assert_eq!(relation.old_address_id, None);
    assert!(relation.created_at > 0);
    assert!(repo.exists_active_for_student(student).unwrap());
    assert_eq!(repo.get_active_for_student(student).unwrap(), Some(relation));
}

#[test]
fn deactivation_is_one_way() {
    let conn = open_db_in_memory().unwrap();
    let x = new_address(&conn, "X Sk.");
    let student = new_student(&conn, "11111111111", x);
    let repo = SqliteRelationRepository::try_new(&conn).unwrap();
    let relation = repo
        .create_relation(&NewRelation {
            student_id: student,
            current_address_id: x,
            old_address_id: None,
        })
        .unwrap();

    repo.deactivate_relation(relation.id).unwrap();
    assert!(!repo.exists_active_for_student(student).unwrap());
    assert!(repo.get_active_for_student(student).unwrap().is_none());

    let err = repo.deactivate_relation(relation.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { id, .. } if id == relation.id));

    let history = repo.list_for_student(student).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].state(), RelationState::Inactive);
}

#[test]
fn second_active_relation_for_same_student_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let x = new_address(&conn, "X Sk.");
    let y = new_address(&conn, "Y Sk.");
    let student = new_student(&conn, "11111111111", x);
    let repo = SqliteRelationRepository::try_new(&conn).unwrap();

    repo.create_relation(&NewRelation {
        student_id: student,
        current_address_id: x,
        old_address_id: None,
    })
    .unwrap();
    let err = repo
        .create_relation(&NewRelation {
            student_id: student,
            current_address_id: y,
            old_address_id: Some(x),
        })
        .unwrap_err();

    assert!(matches!(err, RepoError::ConstraintViolation(_)));
    assert_eq!(repo.list_for_student(student).unwrap().len(), 1);
}

#[test]
fn lookup_by_current_address_prefers_active_row() {
    let conn = open_db_in_memory().unwrap();
    let x = new_address(&conn, "X Sk.");
    let y = new_address(&conn, "Y Sk.");
    let first = new_student(&conn, "11111111111", x);
    let second = new_student(&conn, "22222222222", x);
    let repo = SqliteRelationRepository::try_new(&conn).unwrap();

    let old = repo
        .create_relation(&NewRelation {
            student_id: first,
            current_address_id: x,
            old_address_id: None,
        })
        .unwrap();
    repo.deactivate_relation(old.id).unwrap();
    repo.create_relation(&NewRelation {
        student_id: first,
        current_address_id: y,
        old_address_id: Some(x),
    })
    .unwrap();
    let active = repo
        .create_relation(&NewRelation {
            student_id: second,
            current_address_id: x,
            old_address_id: None,
        })
        .unwrap();

    assert_eq!(repo.get_by_current_address_id(x).unwrap(), Some(active));
    assert!(repo.get_by_current_address_id(y + 100).unwrap().is_none());
}

#[test]
fn history_is_ordered_oldest_first_and_scoped_to_student() {
    let conn = open_db_in_memory().unwrap();
    let x = new_address(&conn, "X Sk.");
    let y = new_address(&conn, "Y Sk.");
    let student = new_student(&conn, "11111111111", x);
    let other = new_student(&conn, "22222222222", y);
    let repo = SqliteRelationRepository::try_new(&conn).unwrap();

    let first = repo
        .create_relation(&NewRelation {
            student_id: student,
            current_address_id: x,
            old_address_id: None,
        })
        .unwrap();
    repo.create_relation(&NewRelation {
        student_id: other,
        current_address_id: y,
        old_address_id: None,
    })
    .unwrap();
    repo.deactivate_relation(first.id).unwrap();
    let second = repo
        .create_relation(&NewRelation {
            student_id: student,
            current_address_id: y,
            old_address_id: Some(x),
        })
        .unwrap();

    let ids: Vec<_> = repo
        .list_for_student(student)
        .unwrap()
        .into_iter()
        .map(|relation| relation.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id]);
}
