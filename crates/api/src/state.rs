//! Application state shared across handlers.

use std::sync::Arc;

use bazaar_core::archive::ArchiveOrchestrator;
use bazaar_core::deletion::DeletionService;
use bazaar_core::imaging::{ImagePipeline, PipelineSettings};
use bazaar_core::media::MediaService;
use bazaar_core::retry::RetryExecutor;
use bazaar_core::storage::{
    BucketLayout, HttpObjectStore, StorageError, StoreConfig, retry_policy_from_settings,
};
use bazaar_db::{DeletionAuditRepository, EvidenceRepository, FolderRegistryRepository};
use bazaar_shared::AppConfig;
use sea_orm::DatabaseConnection;

/// Media service as wired for requests.
pub type AppMediaService = MediaService<HttpObjectStore, FolderRegistryRepository>;

/// Deletion service as wired for requests.
pub type AppDeletionService = DeletionService<
    HttpObjectStore,
    FolderRegistryRepository,
    EvidenceRepository,
    DeletionAuditRepository,
>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Object store client.
    pub store: Arc<HttpObjectStore>,
    /// Image pipeline for listing uploads.
    pub pipeline: ImagePipeline,
    /// Retry policy applied to every storage call.
    pub retry: RetryExecutor,
    /// Bucket names.
    pub buckets: BucketLayout,
}

impl AppState {
    /// Build the state from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the object store client cannot be built.
    pub fn from_config(db: DatabaseConnection, config: &AppConfig) -> Result<Self, StorageError> {
        let store = HttpObjectStore::new(&StoreConfig::from_settings(&config.storage))?;
        Ok(Self {
            db: Arc::new(db),
            store: Arc::new(store),
            pipeline: ImagePipeline::new(PipelineSettings::from_media(&config.media)),
            retry: RetryExecutor::new(retry_policy_from_settings(&config.storage)),
            buckets: BucketLayout::from_settings(&config.storage),
        })
    }

    fn registry(&self) -> Arc<FolderRegistryRepository> {
        Arc::new(FolderRegistryRepository::new((*self.db).clone()))
    }

    /// Media service for one request.
    #[must_use]
    pub fn media_service(&self) -> AppMediaService {
        MediaService::new(
            Arc::clone(&self.store),
            self.registry(),
            self.pipeline.clone(),
            self.retry,
            self.buckets.clone(),
        )
    }

    /// Deletion service for one request.
    #[must_use]
    pub fn deletion_service(&self) -> AppDeletionService {
        let registry = self.registry();
        let orchestrator = ArchiveOrchestrator::new(
            Arc::clone(&self.store),
            Arc::clone(&registry),
            self.retry,
            self.buckets.clone(),
        );
        DeletionService::new(
            orchestrator,
            registry,
            Arc::new(EvidenceRepository::new((*self.db).clone())),
            Arc::new(DeletionAuditRepository::new((*self.db).clone())),
        )
    }
}
