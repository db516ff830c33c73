//! Folder registry for listing images.
//!
//! One row per (listing, prefix) an upload wrote under. Rows are hints for
//! enumeration and are removed once a listing has been archived.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(FOLDERS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS listing_media_folders CASCADE;")
            .await?;
        Ok(())
    }
}

const FOLDERS_SQL: &str = r"
CREATE TABLE listing_media_folders (
    id BIGSERIAL PRIMARY KEY,
    listing_id BIGINT NOT NULL,
    prefix TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_prefix_not_blank CHECK (length(btrim(prefix)) > 0),
    CONSTRAINT uq_listing_media_folders UNIQUE (listing_id, prefix)
);

-- Lookups are always by listing
CREATE INDEX idx_listing_media_folders_listing ON listing_media_folders(listing_id);
";
