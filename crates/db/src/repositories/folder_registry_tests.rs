//! Folder registry repository tests against the `SeaORM` mock database.

use bazaar_core::enumerate::FolderRegistry;
use bazaar_shared::ListingId;
use chrono::{FixedOffset, TimeZone};
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

use super::FolderRegistryRepository;
use crate::entities::listing_media_folders;

fn folder(id: i64, listing_id: i64, prefix: &str) -> listing_media_folders::Model {
    listing_media_folders::Model {
        id,
        listing_id,
        prefix: prefix.to_string(),
        created_at: FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 1, 12, 0, 0)
            .unwrap(),
    }
}

#[tokio::test]
async fn test_prefixes_for_returns_rows_in_order() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![folder(1, 7, "7"), folder(2, 7, "vehicles/7/")]])
        .into_connection();
    let repo = FolderRegistryRepository::new(db);

    let prefixes = repo.prefixes_for(ListingId(7)).await.unwrap();

    assert_eq!(prefixes, vec!["7".to_string(), "vehicles/7/".to_string()]);
}

#[tokio::test]
async fn test_prefixes_for_maps_db_errors() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection reset".to_string())])
        .into_connection();
    let repo = FolderRegistryRepository::new(db);

    let err = repo.prefixes_for(ListingId(7)).await.unwrap_err();

    assert!(err.to_string().contains("connection reset"));
}

#[tokio::test]
async fn test_record_issues_single_insert() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let repo = FolderRegistryRepository::new(db.clone());

    repo.record(ListingId(7), "7").await.unwrap();

    assert_eq!(db.into_transaction_log().len(), 1);
}

#[tokio::test]
async fn test_record_existing_pair_is_not_an_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let repo = FolderRegistryRepository::new(db);

    assert!(repo.record(ListingId(7), "7").await.is_ok());
}

#[tokio::test]
async fn test_record_rejects_blank_prefix_without_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = FolderRegistryRepository::new(db.clone());

    assert!(repo.record(ListingId(7), "  ").await.is_err());
    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_remove_for_reports_rows_affected() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 3,
        }])
        .into_connection();
    let repo = FolderRegistryRepository::new(db);

    assert_eq!(repo.remove_for(ListingId(7)).await.unwrap(), 3);
}
