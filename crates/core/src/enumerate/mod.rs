//! Recursive discovery of every object key under a set of prefixes.
//!
//! Listing images have been stored under several layouts over time
//! (`{id}/`, `vehicles/{id}/`, `vehicle/{id}/`, `registration/{id}/`, plus
//! whatever prefix the folder registry remembers). Enumeration walks every
//! candidate so that the union of keys covers all of them.

mod enumerator;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
mod prefixes;
mod registry;

pub use enumerator::{Enumeration, ListingFailure, MAX_DEPTH, PrefixEnumerator};
pub use prefixes::{candidate_prefixes, layout_prefixes, normalize_prefix};
pub use registry::{EnumerationError, FolderRecord, FolderRegistry};
