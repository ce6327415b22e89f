//! Content digests for digest-keyed segment lookup.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::core::types::SegmentId;

/// Lowercase hex SHA-256 of segment content.
///
/// The API-side lookup tables key segment identifiers by this digest, so the
/// exact bytes of the content are hashed, without normalization.
#[must_use]
pub fn content_digest(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Digest-keyed identifier table, as downloaded from the API.
pub type DigestLookup = HashMap<String, SegmentId>;
