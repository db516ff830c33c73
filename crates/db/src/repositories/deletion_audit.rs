//! Deletion audit repository.

use bazaar_core::deletion::{DeletionAudit, DeletionError, DeletionEvent};
use chrono::Utc;
use sea_orm::{ActiveValue::NotSet, DatabaseConnection, EntityTrait, Set};

use crate::entities::deletion_audit;

/// Append-only audit log backed by Postgres.
#[derive(Debug, Clone)]
pub struct DeletionAuditRepository {
    db: DatabaseConnection,
}

impl DeletionAuditRepository {
    /// Create a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Build the row written for an event.
#[must_use]
pub fn to_active_model(event: &DeletionEvent) -> deletion_audit::ActiveModel {
    deletion_audit::ActiveModel {
        id: NotSet,
        event_type: Set(event.kind.as_str().to_string()),
        subject_user_id: Set(event.owner.into_inner()),
        listing_id: Set(event.listing.map(bazaar_shared::ListingId::into_inner)),
        actor_ip: Set(event.context.actor_ip.clone()),
        actor_user_agent: Set(event.context.user_agent.clone()),
        payload: Set(event.payload.clone()),
        created_at: Set(Utc::now().into()),
    }
}

impl DeletionAudit for DeletionAuditRepository {
    async fn record(&self, event: &DeletionEvent) -> Result<(), DeletionError> {
        deletion_audit::Entity::insert(to_active_model(event))
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| DeletionError::audit(e.to_string()))?;
        Ok(())
    }
}
