//! Append-only log of listing and account deletions.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(AUDIT_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS deletion_audit CASCADE;")
            .await?;
        Ok(())
    }
}

const AUDIT_SQL: &str = r"
CREATE TABLE deletion_audit (
    id BIGSERIAL PRIMARY KEY,
    event_type VARCHAR(40) NOT NULL,
    subject_user_id BIGINT NOT NULL,
    listing_id BIGINT,
    actor_ip VARCHAR(45),
    actor_user_agent TEXT,
    payload JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_event_type CHECK (event_type IN (
        'listing_deleted', 'listing_deletion_failed',
        'account_deleted', 'account_deletion_failed'
    ))
);

-- No foreign keys: rows outlive the users and listings they describe
CREATE INDEX idx_deletion_audit_subject ON deletion_audit(subject_user_id, created_at DESC);
";
