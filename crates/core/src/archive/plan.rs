//! Evidence discovered for a run.

use std::collections::HashSet;

use super::types::{ArchiveItem, EvidenceKind};

/// Items to archive plus non-fatal discovery warnings.
///
/// A source object is planned at most once. Two sources never share an
/// archive key: a colliding listing image keeps its full source path, and if
/// that is taken too a numeric suffix is added before the extension.
#[derive(Debug, Default)]
pub struct EvidencePlan {
    items: Vec<ArchiveItem>,
    warnings: Vec<String>,
    sources: HashSet<(String, String)>,
    destinations: HashSet<String>,
}

impl EvidencePlan {
    /// Planned items.
    #[must_use]
    pub fn items(&self) -> &[ArchiveItem] {
        &self.items
    }

    /// Discovery warnings.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Split into items and warnings.
    #[must_use]
    pub fn into_parts(self) -> (Vec<ArchiveItem>, Vec<String>) {
        (self.items, self.warnings)
    }

    /// Add an item unless its source is already planned.
    ///
    /// `fallback_key` is used when the preferred archive key is taken.
    pub(crate) fn add(&mut self, mut item: ArchiveItem, fallback_key: impl FnOnce() -> String) {
        let source = (item.source_bucket.clone(), item.source_key.clone());
        if !self.sources.insert(source) {
            return;
        }
        if self.destinations.contains(&item.archive_key) {
            item.archive_key = fallback_key();
        }
        if self.destinations.contains(&item.archive_key) {
            item.archive_key = self.free_variant(&item.archive_key);
        }
        self.destinations.insert(item.archive_key.clone());
        self.items.push(item);
    }

    fn free_variant(&self, key: &str) -> String {
        (2u32..)
            .map(|n| numbered_key(key, n))
            .find(|candidate| !self.destinations.contains(candidate))
            .unwrap_or_else(|| key.to_string())
    }

    /// Add an item whose address could not be resolved; it starts in `Error`.
    pub(crate) fn add_unresolved(
        &mut self,
        kind: EvidenceKind,
        expected_bucket: &str,
        url: &str,
        archive_bucket: &str,
        message: String,
    ) {
        let mut item = ArchiveItem::pending(kind, expected_bucket, url, archive_bucket, "");
        item.fail(message);
        self.items.push(item);
    }

    pub(crate) fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// `dir/name-{n}.ext`, or `dir/name-{n}` without an extension.
pub(crate) fn numbered_key(key: &str, n: u32) -> String {
    let name_start = key.rfind('/').map_or(0, |i| i + 1);
    match key[name_start..].rfind('.').filter(|&dot| dot > 0) {
        Some(dot) => {
            let (stem, ext) = key.split_at(name_start + dot);
            format!("{stem}-{n}{ext}")
        }
        None => format!("{key}-{n}"),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("user_1/listings/7/a.jpg", 2, "user_1/listings/7/a-2.jpg")]
    #[case("user_1/listings/7/v.1/a", 3, "user_1/listings/7/v.1/a-3")]
    #[case("user_1/listings/7/.hidden", 2, "user_1/listings/7/.hidden-2")]
    #[case("a.tar.gz", 2, "a.tar-2.gz")]
    fn test_numbered_key(#[case] key: &str, #[case] n: u32, #[case] expected: &str) {
        assert_eq!(numbered_key(key, n), expected);
    }
}
