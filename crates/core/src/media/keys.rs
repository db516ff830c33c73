//! Upload key layout.
//!
//! Keys are derived from stable inputs only, so a retried `PUT` overwrites
//! the object it may already have written instead of leaving a duplicate.

use bazaar_shared::{ListingId, OwnerId};

use super::types::DocumentKind;
use crate::imaging::ImageRole;
use crate::storage::file_name;

const MAX_STEM_LEN: usize = 48;

/// Folder holding a listing's images.
#[must_use]
pub fn listing_folder(listing: ListingId) -> String {
    listing.to_string()
}

/// Key of the `index`-th image of a listing.
#[must_use]
pub fn listing_image_key(
    listing: ListingId,
    index: usize,
    role: ImageRole,
    original_name: Option<&str>,
    extension: &str,
) -> String {
    format!(
        "{}/{index:02}_{role}_{}.{extension}",
        listing_folder(listing),
        sanitize_stem(original_name.unwrap_or_default())
    )
}

/// Empty object that makes a folder visible in listings.
#[must_use]
pub fn folder_marker_key(folder: &str) -> String {
    format!("{folder}/.hidden_folder_{}", folder.replace('/', "_"))
}

/// Whether a key names a folder marker rather than an image.
#[must_use]
pub fn is_folder_marker(key: &str) -> bool {
    let name = file_name(key);
    name.starts_with(".hidden_folder") || name == ".folder"
}

/// Key of an owner's profile photo.
#[must_use]
pub fn profile_photo_key(owner: OwnerId, extension: &str) -> String {
    format!("profile_{owner}.{extension}")
}

/// Key of a listing document.
#[must_use]
pub fn document_key(kind: DocumentKind, listing: ListingId, extension: &str) -> String {
    format!("{kind}_{listing}.{extension}")
}

/// File name without extension, reduced to `[A-Za-z0-9_-]`.
#[must_use]
pub fn sanitize_stem(original_name: &str) -> String {
    let name = file_name(original_name.trim());
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    let cleaned: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .take(MAX_STEM_LEN)
        .collect();
    let cleaned = cleaned.trim_matches('_');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Extension of a client file name, when it is short and alphanumeric.
#[must_use]
pub fn extension_of(original_name: &str) -> Option<String> {
    let (_, ext) = file_name(original_name.trim()).rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    (!ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then_some(ext)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("My Car (1).JPG", "My_Car__1")]
    #[case("../../etc/passwd", "passwd")]
    #[case(".jpg", "image")]
    #[case("", "image")]
    #[case("ok-name_2.png", "ok-name_2")]
    fn test_sanitize_stem(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_stem(input), expected);
    }

    #[test]
    fn test_listing_image_key_is_deterministic() {
        let key = listing_image_key(ListingId::new(7), 0, ImageRole::Front, Some("car.png"), "jpg");
        assert_eq!(key, "7/00_front_car.jpg");
        assert_eq!(
            listing_image_key(ListingId::new(7), 12, ImageRole::Other, None, "webp"),
            "7/12_other_image.webp"
        );
    }

    #[rstest]
    #[case("7/.hidden_folder_7", true)]
    #[case("7/.folder", true)]
    #[case("7/00_front_car.jpg", false)]
    #[case("7/folder.jpg", false)]
    fn test_is_folder_marker(#[case] key: &str, #[case] expected: bool) {
        assert_eq!(is_folder_marker(key), expected);
    }

    #[test]
    fn test_single_object_keys() {
        assert_eq!(folder_marker_key("a/7"), "a/7/.hidden_folder_a_7");
        assert_eq!(profile_photo_key(OwnerId::new(42), "jpg"), "profile_42.jpg");
        assert_eq!(
            document_key(DocumentKind::Identity, ListingId::new(7), "pdf"),
            "identity_7.pdf"
        );
    }

    #[rstest]
    #[case("scan.PDF", Some("pdf"))]
    #[case("noext", None)]
    #[case("weird.tar~gz", None)]
    fn test_extension_of(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(extension_of(input).as_deref(), expected);
    }
}
