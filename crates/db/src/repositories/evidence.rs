//! Evidence directory repository.
//!
//! Reads evidence addresses from the marketplace `users` and `listings`
//! tables and removes those rows once the archive gate has passed.

use bazaar_core::archive::ListingEvidence;
use bazaar_core::deletion::{AccountEvidence, DeletionError, EvidenceDirectory, ListingRecord};
use bazaar_shared::{ListingId, OwnerId};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use tracing::info;

use crate::entities::{listings, users};

/// Evidence directory backed by Postgres.
#[derive(Debug, Clone)]
pub struct EvidenceRepository {
    db: DatabaseConnection,
}

impl EvidenceRepository {
    /// Create a new evidence repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn directory_error(err: DbErr) -> DeletionError {
    DeletionError::directory(err.to_string())
}

fn to_evidence(model: listings::Model) -> ListingEvidence {
    ListingEvidence {
        listing_id: ListingId(model.id),
        ownership_document_url: model.ownership_document_url,
        identity_document_url: model.identity_document_url,
    }
}

impl EvidenceDirectory for EvidenceRepository {
    async fn listing_evidence(
        &self,
        listing: ListingId,
    ) -> Result<Option<ListingRecord>, DeletionError> {
        let model = listings::Entity::find_by_id(listing.into_inner())
            .one(&self.db)
            .await
            .map_err(directory_error)?;

        Ok(model.map(|model| ListingRecord {
            owner: OwnerId(model.user_id),
            evidence: to_evidence(model),
        }))
    }

    async fn account_evidence(
        &self,
        owner: OwnerId,
    ) -> Result<Option<AccountEvidence>, DeletionError> {
        let Some(user) = users::Entity::find_by_id(owner.into_inner())
            .one(&self.db)
            .await
            .map_err(directory_error)?
        else {
            return Ok(None);
        };

        let listings = listings::Entity::find()
            .filter(listings::Column::UserId.eq(owner.into_inner()))
            .order_by_asc(listings::Column::Id)
            .all(&self.db)
            .await
            .map_err(directory_error)?;

        Ok(Some(AccountEvidence {
            owner,
            profile_photo_url: user.profile_photo_url,
            listings: listings.into_iter().map(to_evidence).collect(),
        }))
    }

    async fn remove_listing(&self, listing: ListingId) -> Result<(), DeletionError> {
        listings::Entity::delete_by_id(listing.into_inner())
            .exec(&self.db)
            .await
            .map_err(directory_error)?;
        Ok(())
    }

    async fn remove_account(&self, owner: OwnerId) -> Result<(), DeletionError> {
        let txn = self.db.begin().await.map_err(directory_error)?;

        let listings = listings::Entity::delete_many()
            .filter(listings::Column::UserId.eq(owner.into_inner()))
            .exec(&txn)
            .await
            .map_err(directory_error)?;
        users::Entity::delete_by_id(owner.into_inner())
            .exec(&txn)
            .await
            .map_err(directory_error)?;

        txn.commit().await.map_err(directory_error)?;

        info!(owner = %owner, listings = listings.rows_affected, "account rows removed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "evidence_tests.rs"]
mod tests;
