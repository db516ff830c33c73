//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration.

pub use sea_orm_migration::prelude::*;

mod m20261019_000001_marketplace;
mod m20261019_000002_listing_media_folders;
mod m20261019_000003_deletion_audit;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261019_000001_marketplace::Migration),
            Box::new(m20261019_000002_listing_media_folders::Migration),
            Box::new(m20261019_000003_deletion_audit::Migration),
        ]
    }
}
