use super::*;
use crate::mock::{MockRow, Person, person_row};
use tokio_postgres::types::{ToSql, Type};

#[test]
fn pointers_follow_requested_order() {
    let mut person = Person::default();
    let mut targets = person.get_pointers(&["name", "id"]).unwrap();
    assert_eq!(targets.len(), 2);

    let mut buf = bytes::BytesMut::new();
    "Joe".to_sql(&Type::TEXT, &mut buf).unwrap();
    targets[0].scan(&Type::TEXT, Some(&buf[..])).unwrap();

    let mut buf = bytes::BytesMut::new();
    7_i32.to_sql(&Type::INT4, &mut buf).unwrap();
    targets[1].scan(&Type::INT4, Some(&buf[..])).unwrap();

    drop(targets);
    assert_eq!(person, Person::new(7, "Joe"));
}

#[test]
fn empty_column_list_selects_every_field() {
    let mut person = Person::default();
    assert_eq!(person.get_pointers(&[]).unwrap().len(), 3);

    let values = Person::new(1, "Joe").get_values(&[]).unwrap();
    assert_eq!(format!("{values:?}"), r#"[1, "Joe", None]"#);
}

#[test]
fn unknown_pointer_column_fails() {
    let mut person = Person::default();
    let err = person.get_pointers(&["id", "age"]).err().unwrap();
    assert!(matches!(err, OrmError::UnknownColumn(ref c) if c == "age"));
}

#[test]
fn duplicate_pointer_column_fails() {
    let mut person = Person::default();
    let err = person.get_pointers(&["id", "id"]).err().unwrap();
    assert!(matches!(err, OrmError::DuplicateColumn(ref c) if c == "id"));
    assert!(err.is_binding_error());
}

#[test]
fn values_follow_requested_order() {
    let values = Person::new(3, "Three").get_values(&["name", "id", "name"]).unwrap();
    assert_eq!(format!("{values:?}"), r#"["Three", 3, "Three"]"#);

    let err = Person::default().get_values(&["age"]).unwrap_err();
    assert!(matches!(err, OrmError::UnknownColumn(_)));
}

#[test]
fn scan_null_into_option() {
    let mut nickname = Some("old".to_string());
    nickname.scan(&Type::TEXT, None).unwrap();
    assert_eq!(nickname, None);
}

#[test]
fn scan_null_into_non_option_fails() {
    let mut id = 5_i32;
    assert!(id.scan(&Type::INT4, None).is_err());
    assert_eq!(id, 5);
}

#[test]
fn scan_rejects_mismatched_type() {
    let mut id = 0_i32;
    let err = id.scan(&Type::TEXT, Some(b"abc".as_slice())).unwrap_err();
    assert!(err.to_string().contains("cannot convert"));
}

#[test]
fn scan_row_binds_by_name() {
    let row = MockRow::new()
        .col("nickname", Type::TEXT, Some("jj"))
        .col("id", Type::INT4, 4_i32)
        .col("name", Type::TEXT, "Joe");
    let columns = row.column_names();

    let mut person = Person::default();
    scan_row(&row, &columns, &mut person).unwrap();
    assert_eq!(
        person,
        Person {
            id: 4,
            name: "Joe".to_string(),
            nickname: Some("jj".to_string()),
        }
    );
}

#[test]
fn scan_row_decode_error_names_column() {
    let row = MockRow::new().col("id", Type::TEXT, "not a number");
    let columns = row.column_names();

    let mut person = Person::default();
    let err = scan_row(&row, &columns, &mut person).unwrap_err();
    assert!(matches!(err, OrmError::Decode { ref column, .. } if column == "id"));
}

#[test]
fn scan_row_unknown_column_leaves_record_untouched() {
    let row = person_row(1, "Joe").col("age", Type::INT4, 30_i32);
    let columns = row.column_names();

    let mut person = Person::new(9, "untouched");
    let err = scan_row(&row, &columns, &mut person).unwrap_err();
    assert_eq!(err.to_string(), "sqlb: age is not found");
    assert_eq!(person, Person::new(9, "untouched"));
}

#[test]
fn scan_row_repeated_result_column_fails() {
    let row = person_row(1, "Joe").col("id", Type::INT4, 2_i32);
    let columns = row.column_names();

    let mut person = Person::new(9, "untouched");
    let err = scan_row(&row, &columns, &mut person).unwrap_err();
    assert!(matches!(err, OrmError::DuplicateColumn(ref c) if c == "id"));
    assert_eq!(person, Person::new(9, "untouched"));
}

#[test]
fn scan_rows_appends_fresh_records() {
    let rows = vec![person_row(1, "a"), person_row(2, "b"), person_row(3, "c")];
    let mut people: Vec<Person> = vec![Person::new(0, "existing")];
    scan_rows(&rows, &mut people).unwrap();
    assert_eq!(
        people,
        vec![
            Person::new(0, "existing"),
            Person::new(1, "a"),
            Person::new(2, "b"),
            Person::new(3, "c"),
        ]
    );
}

#[test]
fn scan_rows_without_rows_is_ok() {
    let rows: Vec<MockRow> = Vec::new();
    let mut people: Vec<Person> = Vec::new();
    scan_rows(&rows, &mut people).unwrap();
    assert!(people.is_empty());
}

#[test]
fn scan_first_without_rows_is_not_found() {
    let rows: Vec<MockRow> = Vec::new();
    let mut person = Person::default();
    let err = scan_first(&rows, &mut person).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn scan_first_ignores_later_rows() {
    let rows = vec![person_row(1, "first"), person_row(2, "second")];
    let mut person = Person::default();
    scan_first(&rows, &mut person).unwrap();
    assert_eq!(person, Person::new(1, "first"));
}

#[test]
fn scan_driver_extension_types() {
    let id = uuid::Uuid::new_v4();
    let at = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();

    let mut buf = bytes::BytesMut::new();
    id.to_sql(&Type::UUID, &mut buf).unwrap();
    let mut scanned_id = uuid::Uuid::nil();
    scanned_id.scan(&Type::UUID, Some(&buf[..])).unwrap();
    assert_eq!(scanned_id, id);

    let mut buf = bytes::BytesMut::new();
    at.to_sql(&Type::TIMESTAMPTZ, &mut buf).unwrap();
    let mut scanned_at: Option<chrono::DateTime<chrono::Utc>> = None;
    scanned_at.scan(&Type::TIMESTAMPTZ, Some(&buf[..])).unwrap();
    assert_eq!(scanned_at, Some(at));
}
