use super::StockOperationRepository;
use crate::domain::{ActionKind, StockOperation, StockOperationItem, StockOperationStatus};
use crate::repository::error::RepositoryError;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::configure_sqlite_connection(&conn).unwrap();
    crate::db::init_schema(&conn).unwrap();
    Arc::new(Mutex::new(conn))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn make_test_operation(uuid: &str, status: StockOperationStatus, created: NaiveDate) -> StockOperation {
    StockOperation {
        uuid: uuid.to_string(),
        operation_type_name: "Receive".to_string(),
        status,
        source_name: Some("Warehouse".to_string()),
        destination_name: Some("Pharmacy".to_string()),
        responsible_person_given_name: Some("John".to_string()),
        responsible_person_family_name: Some("Doe".to_string()),
        creator_given_name: Some("Jane".to_string()),
        creator_family_name: Some("Smith".to_string()),
        operation_date: created,
        date_created: created,
        completed_date: None,
        stock_operation_items: vec![
            StockOperationItem {
                batch_no: "BATCH1".to_string(),
                quantity: 100,
            },
            StockOperationItem {
                batch_no: "BATCH2".to_string(),
                quantity: 200,
            },
        ],
    }
}

#[test]
fn test_insert_and_find_by_id() {
    let repo = StockOperationRepository::new(setup_test_db());
    let op = make_test_operation("op1", StockOperationStatus::New, date(2023, 5, 1));

    assert_eq!(repo.insert(&op).unwrap(), "op1");

    let found = repo.find_by_id("op1").unwrap().expect("op1 should exist");
    assert_eq!(found, op);
    assert!(repo.find_by_id("missing").unwrap().is_none());
}

#[test]
fn test_duplicate_uuid_rejected() {
    let repo = StockOperationRepository::new(setup_test_db());
    let op = make_test_operation("op1", StockOperationStatus::New, date(2023, 5, 1));
    repo.insert(&op).unwrap();

    let result = repo.insert(&op);
    assert!(matches!(result, Err(RepositoryError::UniqueConstraintViolation(_))));
}

#[test]
fn test_find_page_orders_by_created_desc() {
    let repo = StockOperationRepository::new(setup_test_db());
    for day in 1..=5 {
        let op = make_test_operation(&format!("op{}", day), StockOperationStatus::New, date(2023, 5, day));
        repo.insert(&op).unwrap();
    }

    let first = repo.find_page(1, 2).unwrap();
    assert_eq!(first.total_items, 5);
    let ids: Vec<&str> = first.items.iter().map(|op| op.uuid.as_str()).collect();
    assert_eq!(ids, vec!["op5", "op4"]);

    let last = repo.find_page(3, 2).unwrap();
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].uuid, "op1");

    let beyond = repo.find_page(4, 2).unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_items, 5);
}

#[test]
fn test_find_page_rejects_zero() {
    let repo = StockOperationRepository::new(setup_test_db());
    assert!(repo.find_page(0, 10).is_err());
    assert!(repo.find_page(1, 0).is_err());
}

#[test]
fn test_items_keep_original_order() {
    let repo = StockOperationRepository::new(setup_test_db());
    let mut op = make_test_operation("op1", StockOperationStatus::New, date(2023, 5, 1));
    op.stock_operation_items.reverse();
    repo.insert(&op).unwrap();

    let found = repo.find_by_id("op1").unwrap().unwrap();
    let batches: Vec<&str> = found
        .stock_operation_items
        .iter()
        .map(|item| item.batch_no.as_str())
        .collect();
    assert_eq!(batches, vec!["BATCH2", "BATCH1"]);
}

#[test]
fn test_apply_complete_stamps_completed_date() {
    let repo = StockOperationRepository::new(setup_test_db());
    repo.insert(&make_test_operation("op1", StockOperationStatus::New, date(2023, 5, 1)))
        .unwrap();

    let status = repo
        .apply_action("op1", ActionKind::Complete, None, date(2023, 5, 3))
        .unwrap();
    assert_eq!(status, StockOperationStatus::Completed);

    let found = repo.find_by_id("op1").unwrap().unwrap();
    assert_eq!(found.status, StockOperationStatus::Completed);
    assert_eq!(found.completed_date, Some(date(2023, 5, 3)));
}

#[test]
fn test_apply_illegal_action_leaves_status() {
    let repo = StockOperationRepository::new(setup_test_db());
    repo.insert(&make_test_operation("op1", StockOperationStatus::Completed, date(2023, 5, 1)))
        .unwrap();

    let result = repo.apply_action("op1", ActionKind::Cancel, Some("late"), date(2023, 5, 3));
    match result {
        Err(RepositoryError::InvalidStateTransition { from, to }) => {
            assert_eq!(from, "COMPLETED");
            assert_eq!(to, "CANCELLED");
        }
        other => panic!("Expected InvalidStateTransition, got {:?}", other),
    }

    let found = repo.find_by_id("op1").unwrap().unwrap();
    assert_eq!(found.status, StockOperationStatus::Completed);
}

#[test]
fn test_apply_action_unknown_operation() {
    let repo = StockOperationRepository::new(setup_test_db());
    let result = repo.apply_action("ghost", ActionKind::Complete, None, date(2023, 5, 3));
    assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
}
