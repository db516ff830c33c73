//! `SeaORM` entities.
//!
//! `users` and `listings` are owned by the marketplace; only the columns the
//! storage lifecycle reads are mapped.

pub mod deletion_audit;
pub mod listing_media_folders;
pub mod listings;
pub mod users;
