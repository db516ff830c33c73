//! Archive key layout.
//!
//! ```text
//! user_{owner}/listings/{listing}/{relative path}
//! user_{owner}/docs/ownership/{listing}/{file}
//! user_{owner}/docs/identity/{listing}/{file}
//! user_{owner}/profile/{file}
//! ```

use bazaar_shared::{ListingId, OwnerId};

use crate::enumerate::layout_prefixes;
use crate::storage::file_name;

/// Owner namespace in the archive bucket.
#[must_use]
pub fn archive_folder(owner: OwnerId) -> String {
    format!("user_{owner}")
}

/// Path of a listing image relative to its listing folder.
///
/// Strips the first known layout prefix; keys under any other prefix keep
/// only their file name.
#[must_use]
pub fn relative_listing_path(listing: ListingId, key: &str) -> String {
    layout_prefixes(listing)
        .iter()
        .find_map(|prefix| key.strip_prefix(prefix.as_str()))
        .filter(|rest| !rest.is_empty())
        .map_or_else(|| file_name(key).to_string(), str::to_string)
}

/// Archive key of a listing image.
#[must_use]
pub fn listing_image_key(owner: OwnerId, listing: ListingId, source_key: &str) -> String {
    format!(
        "{}/listings/{listing}/{}",
        archive_folder(owner),
        relative_listing_path(listing, source_key)
    )
}

/// Archive key of a listing image whose relative path collides with another
/// source; keeps the whole source key.
#[must_use]
pub fn listing_image_key_verbatim(owner: OwnerId, listing: ListingId, source_key: &str) -> String {
    format!(
        "{}/listings/{listing}/{}",
        archive_folder(owner),
        source_key.trim_start_matches('/')
    )
}

/// Archive key of an ownership document.
#[must_use]
pub fn ownership_document_key(owner: OwnerId, listing: ListingId, source_key: &str) -> String {
    format!(
        "{}/docs/ownership/{listing}/{}",
        archive_folder(owner),
        file_name(source_key)
    )
}

/// Archive key of an identity document.
#[must_use]
pub fn identity_document_key(owner: OwnerId, listing: ListingId, source_key: &str) -> String {
    format!(
        "{}/docs/identity/{listing}/{}",
        archive_folder(owner),
        file_name(source_key)
    )
}

/// Archive key of a profile photo.
#[must_use]
pub fn profile_photo_key(owner: OwnerId, source_key: &str) -> String {
    format!("{}/profile/{}", archive_folder(owner), file_name(source_key))
}

/// MIME type for an archived copy, from the key's extension.
#[must_use]
pub fn content_type_for_key(key: &str) -> &'static str {
    let extension = file_name(key)
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("7/00_front_car.jpg", "00_front_car.jpg")]
    #[case("7/front/a.jpg", "front/a.jpg")]
    #[case("vehicles/7/a.jpg", "a.jpg")]
    #[case("vehicle/7/x/a.jpg", "x/a.jpg")]
    #[case("registration/7/a.jpg", "a.jpg")]
    #[case("legacy-upload-7/deep/a.jpg", "a.jpg")]
    #[case("70/a.jpg", "a.jpg")]
    fn test_relative_listing_path(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(relative_listing_path(ListingId::new(7), key), expected);
    }

    #[test]
    fn test_archive_keys() {
        let owner = OwnerId::new(42);
        let listing = ListingId::new(7);
        assert_eq!(archive_folder(owner), "user_42");
        assert_eq!(
            listing_image_key(owner, listing, "vehicles/7/front/a.jpg"),
            "user_42/listings/7/front/a.jpg"
        );
        assert_eq!(
            listing_image_key_verbatim(owner, listing, "vehicles/7/a.jpg"),
            "user_42/listings/7/vehicles/7/a.jpg"
        );
        assert_eq!(
            ownership_document_key(owner, listing, "7/rc_7.pdf"),
            "user_42/docs/ownership/7/rc_7.pdf"
        );
        assert_eq!(
            identity_document_key(owner, listing, "dl_7.png"),
            "user_42/docs/identity/7/dl_7.png"
        );
        assert_eq!(
            profile_photo_key(owner, "profile_42.jpg"),
            "user_42/profile/profile_42.jpg"
        );
    }

    #[rstest]
    #[case("a/b.JPG", "image/jpeg")]
    #[case("doc.pdf", "application/pdf")]
    #[case("noext", "application/octet-stream")]
    fn test_content_type_for_key(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(content_type_for_key(key), expected);
    }
}
