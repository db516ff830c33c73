//! Evidence repository tests against the `SeaORM` mock database.

use bazaar_core::deletion::EvidenceDirectory;
use bazaar_shared::{ListingId, OwnerId};
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

use super::EvidenceRepository;
use crate::entities::{listings, users};

fn listing(id: i64, user_id: i64, ownership: Option<&str>) -> listings::Model {
    listings::Model {
        id,
        user_id,
        ownership_document_url: ownership.map(String::from),
        identity_document_url: None,
    }
}

const OWNERSHIP_URL: &str = "https://store.test/storage/v1/object/public/rc/ownership_7.pdf";

#[tokio::test]
async fn test_listing_evidence_maps_owner_and_documents() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![listing(7, 42, Some(OWNERSHIP_URL))]])
        .into_connection();
    let repo = EvidenceRepository::new(db);

    let record = repo.listing_evidence(ListingId(7)).await.unwrap().unwrap();

    assert_eq!(record.owner, OwnerId(42));
    assert_eq!(record.evidence.listing_id, ListingId(7));
    assert_eq!(
        record.evidence.ownership_document_url.as_deref(),
        Some(OWNERSHIP_URL)
    );
    assert!(record.evidence.identity_document_url.is_none());
}

#[tokio::test]
async fn test_listing_evidence_missing_listing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<listings::Model>::new()])
        .into_connection();
    let repo = EvidenceRepository::new(db);

    assert!(repo.listing_evidence(ListingId(7)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_account_evidence_collects_listings() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![users::Model {
            id: 42,
            profile_photo_url: Some("https://store.test/p.jpg".to_string()),
        }]])
        .append_query_results([vec![listing(7, 42, Some(OWNERSHIP_URL)), listing(8, 42, None)]])
        .into_connection();
    let repo = EvidenceRepository::new(db);

    let account = repo.account_evidence(OwnerId(42)).await.unwrap().unwrap();

    assert_eq!(account.owner, OwnerId(42));
    assert_eq!(
        account.profile_photo_url.as_deref(),
        Some("https://store.test/p.jpg")
    );
    let ids: Vec<ListingId> = account.listings.iter().map(|l| l.listing_id).collect();
    assert_eq!(ids, vec![ListingId(7), ListingId(8)]);
}

#[tokio::test]
async fn test_account_evidence_unknown_owner_skips_listing_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<users::Model>::new()])
        .into_connection();
    let repo = EvidenceRepository::new(db.clone());

    assert!(repo.account_evidence(OwnerId(42)).await.unwrap().is_none());
    assert_eq!(db.into_transaction_log().len(), 1);
}

#[tokio::test]
async fn test_directory_errors_are_mapped() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("timeout".to_string())])
        .into_connection();
    let repo = EvidenceRepository::new(db);

    let err = repo.listing_evidence(ListingId(7)).await.unwrap_err();

    assert!(err.to_string().starts_with("evidence directory error"));
}

#[tokio::test]
async fn test_remove_account_deletes_listings_then_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ])
        .into_connection();
    let repo = EvidenceRepository::new(db);

    assert!(repo.remove_account(OwnerId(42)).await.is_ok());
}

#[tokio::test]
async fn test_remove_listing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let repo = EvidenceRepository::new(db);

    assert!(repo.remove_listing(ListingId(7)).await.is_ok());
}
