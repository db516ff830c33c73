//! Upload path: processed listing images, profile photos and documents.

mod error;
mod keys;
mod service;
mod types;

pub use error::MediaError;
pub use keys::{
    document_key, folder_marker_key, is_folder_marker, listing_folder, listing_image_key,
    profile_photo_key, sanitize_stem,
};
pub use service::MediaService;
pub use types::{DocumentKind, ListingUpload, StoredImage, StoredObject, UploadFile};
