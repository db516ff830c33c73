use std::sync::Arc;

use bazaar_shared::{AppError, ListingId, OwnerId};

use super::memory::{InMemoryDeletionAudit, InMemoryEvidenceDirectory};
use super::*;
use crate::archive::{ArchiveOrchestrator, ListingEvidence};
use crate::enumerate::FolderRegistry;
use crate::enumerate::memory::InMemoryFolderRegistry;
use crate::retry::{RetryExecutor, RetryPolicy};
use crate::storage::memory::{InMemoryObjectStore, StoreOp};
use crate::storage::{BucketLayout, ObjectStore};

const IMAGES: &str = "listing-images";

type Service = DeletionService<
    InMemoryObjectStore,
    InMemoryFolderRegistry,
    InMemoryEvidenceDirectory,
    InMemoryDeletionAudit,
>;

struct Fixture {
    store: Arc<InMemoryObjectStore>,
    registry: Arc<InMemoryFolderRegistry>,
    directory: Arc<InMemoryEvidenceDirectory>,
    audit: Arc<InMemoryDeletionAudit>,
    service: Service,
}

fn fixture() -> Fixture {
    let store = Arc::new(InMemoryObjectStore::new());
    let registry = Arc::new(InMemoryFolderRegistry::new());
    let directory = Arc::new(InMemoryEvidenceDirectory::new());
    let audit = Arc::new(InMemoryDeletionAudit::new());
    let orchestrator = ArchiveOrchestrator::new(
        Arc::clone(&store),
        Arc::clone(&registry),
        RetryExecutor::new(RetryPolicy::immediate(2)),
        BucketLayout::default(),
    );
    let service = DeletionService::new(
        orchestrator,
        Arc::clone(&registry),
        Arc::clone(&directory),
        Arc::clone(&audit),
    );
    Fixture {
        store,
        registry,
        directory,
        audit,
        service,
    }
}

async fn seed(fx: &Fixture) {
    let owner = OwnerId::new(42);
    fx.store.insert("profile-photos", "profile_42.jpg", &b"p"[..]);
    fx.store.insert(IMAGES, "100/00_front_a.jpg", &b"a"[..]);
    fx.store.insert(IMAGES, "101/00_front_b.jpg", &b"b"[..]);
    fx.store.insert("rc", "ownership_100.pdf", &b"rc"[..]);

    fx.directory.add_owner(
        owner,
        Some(fx.store.public_url("profile-photos", "profile_42.jpg")),
    );
    fx.directory.add_listing(
        owner,
        ListingEvidence {
            listing_id: ListingId::new(100),
            ownership_document_url: Some(fx.store.public_url("rc", "ownership_100.pdf")),
            identity_document_url: None,
        },
    );
    fx.directory
        .add_listing(owner, ListingEvidence::images_only(ListingId::new(101)));
    fx.registry.record(ListingId::new(100), "100").await.unwrap();
    fx.registry.record(ListingId::new(101), "101").await.unwrap();
}

#[tokio::test]
async fn test_delete_listing_success_cleans_up() {
    let fx = fixture();
    seed(&fx).await;

    let outcome = fx
        .service
        .delete_listing(OwnerId::new(42), ListingId::new(100), DeletionContext::default())
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.listings, vec![ListingId::new(100)]);
    assert_eq!(outcome.folders_removed, 1);
    assert!(!fx.directory.has_listing(ListingId::new(100)));
    assert!(fx.directory.has_listing(ListingId::new(101)));
    assert!(fx.registry.recorded(ListingId::new(100)).is_empty());
    assert!(!fx.store.contains("rc", "ownership_100.pdf"));
    assert!(fx.store.contains(IMAGES, "101/00_front_b.jpg"));

    let events = fx.audit.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, DeletionEventKind::ListingDeleted);
    assert_eq!(events[0].listing, Some(ListingId::new(100)));
    assert_eq!(events[0].payload["deleted"], 2);
}

#[tokio::test]
async fn test_delete_listing_refused_when_archive_fails() {
    let fx = fixture();
    seed(&fx).await;
    fx.store.fail(StoreOp::Get, "rc", "ownership_100.pdf");

    let outcome = fx
        .service
        .delete_listing(OwnerId::new(42), ListingId::new(100), DeletionContext::default())
        .await
        .unwrap();

    assert!(!outcome.is_success());
    assert_eq!(outcome.folders_removed, 0);
    assert!(fx.directory.has_listing(ListingId::new(100)));
    assert_eq!(fx.registry.recorded(ListingId::new(100)), vec!["100"]);
    assert_eq!(fx.store.count(StoreOp::Delete), 0);
    assert_eq!(
        fx.audit.events()[0].kind,
        DeletionEventKind::ListingDeletionFailed
    );

    let err = outcome.into_app_result().unwrap_err();
    assert_eq!(err.status_code(), 503);
    assert!(matches!(
        err,
        AppError::TemporarilyUnavailable(ref msg) if msg == TEMPORARY_FAILURE_MESSAGE
    ));
}

#[tokio::test]
async fn test_delete_listing_of_other_owner_is_not_found() {
    let fx = fixture();
    seed(&fx).await;

    let err = fx
        .service
        .delete_listing(OwnerId::new(7), ListingId::new(100), DeletionContext::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DeletionError::NotFound(_)));
    assert_eq!(AppError::from(err).status_code(), 404);
    assert_eq!(fx.store.count(StoreOp::Get), 0);
    assert!(fx.audit.events().is_empty());
}

#[tokio::test]
async fn test_delete_account_is_one_gated_run() {
    let fx = fixture();
    seed(&fx).await;
    let context = DeletionContext {
        actor_ip: Some("203.0.113.9".to_string()),
        user_agent: Some("test-agent".to_string()),
    };

    let outcome = fx
        .service
        .delete_account(OwnerId::new(42), context.clone())
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.result.items.len(), 4);
    assert_eq!(outcome.folders_removed, 2);
    assert!(!fx.directory.has_owner(OwnerId::new(42)));
    assert!(fx.store.keys(IMAGES).is_empty());
    assert_eq!(fx.store.keys("deleted-evidence").len(), 4);

    let events = fx.audit.events();
    assert_eq!(events[0].kind, DeletionEventKind::AccountDeleted);
    assert_eq!(events[0].context, context);
    assert!(outcome.into_app_result().is_ok());
}

#[tokio::test]
async fn test_delete_account_failure_keeps_everything() {
    let fx = fixture();
    seed(&fx).await;
    fx.store.fail(StoreOp::Get, IMAGES, "101/00_front_b.jpg");

    let outcome = fx
        .service
        .delete_account(OwnerId::new(42), DeletionContext::default())
        .await
        .unwrap();

    assert!(!outcome.is_success());
    assert_eq!(fx.store.count(StoreOp::Delete), 0);
    assert!(fx.directory.has_owner(OwnerId::new(42)));
    assert!(fx.directory.has_listing(ListingId::new(100)));
    assert_eq!(fx.registry.recorded(ListingId::new(101)), vec!["101"]);
}

#[tokio::test]
async fn test_unknown_account_is_not_found() {
    let fx = fixture();
    let err = fx
        .service
        .delete_account(OwnerId::new(404), DeletionContext::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DeletionError::NotFound(ref what) if what == "owner 404"));
}

#[tokio::test]
async fn test_audit_failure_does_not_block_deletion() {
    let fx = fixture();
    seed(&fx).await;
    fx.audit.set_failing(true);

    let outcome = fx
        .service
        .delete_listing(OwnerId::new(42), ListingId::new(101), DeletionContext::default())
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert!(!fx.directory.has_listing(ListingId::new(101)));
}

#[tokio::test]
async fn test_registry_failure_does_not_block_deletion() {
    let fx = fixture();
    seed(&fx).await;
    fx.registry.set_failing(true);

    let outcome = fx
        .service
        .delete_listing(OwnerId::new(42), ListingId::new(101), DeletionContext::default())
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.folders_removed, 0);
    assert!(!fx.store.contains(IMAGES, "101/00_front_b.jpg"));
}
