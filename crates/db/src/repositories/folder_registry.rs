//! Folder registry repository.
//!
//! Implements [`FolderRegistry`] over the `listing_media_folders` table.

use bazaar_core::enumerate::{EnumerationError, FolderRegistry};
use bazaar_shared::ListingId;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use crate::entities::listing_media_folders;

/// Folder registry backed by Postgres.
#[derive(Debug, Clone)]
pub struct FolderRegistryRepository {
    db: DatabaseConnection,
}

impl FolderRegistryRepository {
    /// Create a new folder registry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn registry_error(err: DbErr) -> EnumerationError {
    EnumerationError::registry(err.to_string())
}

impl FolderRegistry for FolderRegistryRepository {
    async fn prefixes_for(&self, listing: ListingId) -> Result<Vec<String>, EnumerationError> {
        let rows = listing_media_folders::Entity::find()
            .filter(listing_media_folders::Column::ListingId.eq(listing.into_inner()))
            .order_by_asc(listing_media_folders::Column::Id)
            .all(&self.db)
            .await
            .map_err(registry_error)?;

        Ok(rows.into_iter().map(|row| row.prefix).collect())
    }

    async fn record(&self, listing: ListingId, prefix: &str) -> Result<(), EnumerationError> {
        if prefix.trim().is_empty() {
            return Err(EnumerationError::registry("refusing to record a blank prefix"));
        }

        let row = listing_media_folders::ActiveModel {
            id: NotSet,
            listing_id: Set(listing.into_inner()),
            prefix: Set(prefix.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let inserted = listing_media_folders::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    listing_media_folders::Column::ListingId,
                    listing_media_folders::Column::Prefix,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(registry_error)?;

        debug!(listing = %listing, prefix, inserted, "folder recorded");
        Ok(())
    }

    async fn remove_for(&self, listing: ListingId) -> Result<u64, EnumerationError> {
        let result = listing_media_folders::Entity::delete_many()
            .filter(listing_media_folders::Column::ListingId.eq(listing.into_inner()))
            .exec(&self.db)
            .await
            .map_err(registry_error)?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[path = "folder_registry_tests.rs"]
mod tests;
