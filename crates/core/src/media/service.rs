//! Media upload service.

use std::sync::Arc;

use bazaar_shared::{ListingId, OwnerId};
use bytes::Bytes;
use tracing::{debug, info, warn};

use super::error::MediaError;
use super::keys::{
    document_key, extension_of, folder_marker_key, is_folder_marker, listing_folder,
    listing_image_key, profile_photo_key,
};
use super::types::{DocumentKind, ListingUpload, StoredImage, StoredObject, UploadFile};
use crate::enumerate::{FolderRegistry, PrefixEnumerator};
use crate::imaging::{
    ImagePipeline, ImageRole, PreparedImage, UploadSpec, extension_for_content_type,
};
use crate::retry::RetryExecutor;
use crate::storage::{BucketLayout, ObjectRef, ObjectStore};

/// Uploads processed media and removes single objects.
pub struct MediaService<S, R> {
    store: Arc<S>,
    registry: Arc<R>,
    enumerator: PrefixEnumerator<S>,
    pipeline: ImagePipeline,
    retry: RetryExecutor,
    buckets: BucketLayout,
}

impl<S: ObjectStore, R: FolderRegistry> MediaService<S, R> {
    /// Create a media service.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        registry: Arc<R>,
        pipeline: ImagePipeline,
        retry: RetryExecutor,
        buckets: BucketLayout,
    ) -> Self {
        let enumerator = PrefixEnumerator::new(Arc::clone(&store), retry);
        Self {
            store,
            registry,
            enumerator,
            pipeline,
            retry,
            buckets,
        }
    }

    /// Process and store a batch of listing images.
    ///
    /// The first non-empty file is the front image. Keys depend only on the
    /// listing, position, role and file name, so repeating an upload
    /// overwrites instead of duplicating. The listing folder is recorded in
    /// the registry; a registry failure is logged and does not fail the
    /// upload.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Validation` when no file has content, and
    /// `MediaError::Storage` when a write fails after retries.
    pub async fn upload_listing_images(
        &self,
        listing: ListingId,
        files: Vec<UploadFile>,
    ) -> Result<ListingUpload, MediaError> {
        let files: Vec<UploadFile> = files.into_iter().filter(|f| !f.bytes.is_empty()).collect();
        if files.is_empty() {
            return Err(MediaError::validation("no images provided"));
        }

        let bucket = self.buckets.listing_images.as_str();
        let folder = listing_folder(listing);
        self.put(
            bucket,
            &folder_marker_key(&folder),
            Bytes::new(),
            "application/octet-stream",
        )
        .await?;

        let mut images = Vec::with_capacity(files.len());
        for (index, file) in files.into_iter().enumerate() {
            let role = ImageRole::for_index(index);
            let prepared = self.prepare(role, &file).await?;
            let key = listing_image_key(
                listing,
                index,
                role,
                file.file_name.as_deref(),
                &prepared.extension,
            );

            self.put(bucket, &key, prepared.bytes, &prepared.content_type)
                .await?;
            debug!(
                listing = %listing,
                key = %key,
                processed = prepared.processed,
                "listing image stored"
            );

            images.push(StoredImage {
                url: self.store.public_url(bucket, &key),
                key,
                role,
                processed: prepared.processed,
            });
        }

        if let Err(err) = self.registry.record(listing, &folder).await {
            warn!(listing = %listing, error = %err, "could not record listing folder");
        }

        info!(listing = %listing, count = images.len(), "listing images uploaded");
        Ok(ListingUpload { folder, images })
    }

    /// Store an owner's profile photo at `profile_{owner}.{ext}`.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Validation` for an empty file and
    /// `MediaError::Storage` when the write fails after retries.
    pub async fn upload_profile_photo(
        &self,
        owner: OwnerId,
        file: UploadFile,
    ) -> Result<StoredObject, MediaError> {
        let extension = file_extension(&file);
        let key = profile_photo_key(owner, &extension);
        let bucket = self.buckets.profile_photos.clone();
        self.store_single(bucket, key, file).await
    }

    /// Store a listing document at `{kind}_{listing}.{ext}`.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Validation` for an empty file and
    /// `MediaError::Storage` when the write fails after retries.
    pub async fn upload_document(
        &self,
        listing: ListingId,
        kind: DocumentKind,
        file: UploadFile,
    ) -> Result<StoredObject, MediaError> {
        let extension = file_extension(&file);
        let key = document_key(kind, listing, &extension);
        let bucket = match kind {
            DocumentKind::Ownership => self.buckets.ownership_documents.clone(),
            DocumentKind::Identity => self.buckets.identity_documents.clone(),
        };
        self.store_single(bucket, key, file).await
    }

    /// Public URLs of every image of a listing, sorted by key.
    ///
    /// Folder markers are skipped. Listing failures are logged and the
    /// images that could be found are returned.
    pub async fn list_listing_images(&self, listing: ListingId) -> Vec<String> {
        let bucket = self.buckets.listing_images.as_str();
        let enumeration = self
            .enumerator
            .enumerate_listing(bucket, listing, self.registry.as_ref())
            .await;
        if !enumeration.is_complete() {
            warn!(
                listing = %listing,
                failures = enumeration.failures.len(),
                "listing image enumeration incomplete"
            );
        }

        enumeration
            .keys
            .iter()
            .filter(|key| !is_folder_marker(key))
            .map(|key| self.store.public_url(bucket, key))
            .collect()
    }

    /// Delete the object a public or authenticated URL points at.
    ///
    /// Deleting an object that no longer exists succeeds.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::InvalidUrl` when the URL does not address an
    /// object and `MediaError::Storage` when the delete fails after retries.
    pub async fn delete_by_url(&self, url: &str) -> Result<ObjectRef, MediaError> {
        let object = ObjectRef::parse_url(url)?;
        let label = format!("delete:{}:{}", object.bucket, object.key);
        self.retry
            .run(&label, || self.store.delete(&object.bucket, &object.key))
            .await?;
        info!(bucket = %object.bucket, key = %object.key, "object deleted by url");
        Ok(object)
    }

    async fn prepare(
        &self,
        role: ImageRole,
        file: &UploadFile,
    ) -> Result<PreparedImage, MediaError> {
        let pipeline = self.pipeline.clone();
        let spec = UploadSpec::new(role, file.bytes.clone(), file.content_type.clone());
        tokio::task::spawn_blocking(move || pipeline.prepare(&spec))
            .await
            .map_err(|e| MediaError::Processing(e.to_string()))
    }

    async fn store_single(
        &self,
        bucket: String,
        key: String,
        file: UploadFile,
    ) -> Result<StoredObject, MediaError> {
        if file.bytes.is_empty() {
            return Err(MediaError::validation("file is empty"));
        }
        self.put(&bucket, &key, file.bytes, &file.content_type).await?;
        info!(bucket = %bucket, key = %key, "object stored");
        Ok(StoredObject {
            url: self.store.public_url(&bucket, &key),
            bucket,
            key,
        })
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<(), MediaError> {
        let label = format!("put:{bucket}:{key}");
        self.retry
            .run(&label, || self.store.put(bucket, key, bytes.clone(), content_type))
            .await?;
        Ok(())
    }
}

fn file_extension(file: &UploadFile) -> String {
    file.file_name
        .as_deref()
        .and_then(extension_of)
        .unwrap_or_else(|| extension_for_content_type(&file.content_type).to_string())
}
