//! Table-of-contents segment resolution.
//!
//! A TOC payload arrives with each segment's `segment_id` holding the
//! segment's placeholder *content*. Before upload every placeholder must be
//! replaced with the identifier the API assigned to that segment, either by
//! fuzzy alignment against a lookup sequence or by SHA-256 content digest
//! against a digest-keyed table. An unresolvable segment aborts the whole
//! resolution; a partially-resolved TOC must never be uploaded.

use thiserror::Error;
use tracing::info;

use crate::core::digest::{content_digest, DigestLookup};
use crate::core::segment::LookupSegment;
use crate::core::toc::TableOfContents;
use crate::matching::aligner::{AlignError, SegmentAligner};
use crate::matching::similarity::ThresholdError;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Align(#[from] AlignError),

    #[error(transparent)]
    Threshold(#[from] ThresholdError),

    /// A segment's content digest has no entry in the lookup table.
    #[error("segment content \"{content}\" not found in the digest lookup")]
    UnknownContent { content: String },
}

/// Replace every TOC placeholder with its lookup identifier by fuzzy
/// monotonic alignment, in document order.
///
/// # Errors
///
/// Returns [`AlignError::UnmatchedSegment`] (wrapped) if a placeholder has
/// no similar lookup segment at or after the cursor.
pub fn resolve_by_alignment(
    toc: &mut TableOfContents,
    lookup: &[LookupSegment],
    threshold: f64,
) -> Result<(), ResolveError> {
    let mut aligner = SegmentAligner::new(lookup, threshold)?;

    toc.for_each_segment_mut(|segment| {
        if let Some(event) = aligner.match_next(&segment.segment_id)? {
            segment.segment_id = event.matched_id.0;
        }
        Ok::<(), ResolveError>(())
    })?;

    info!(segments = toc.segment_count(), "TOC resolved by alignment");
    Ok(())
}

/// Replace every TOC placeholder with its lookup identifier by SHA-256
/// content digest.
///
/// The digest table is keyed by the hash of the exact placeholder bytes, so
/// this variant tolerates no transcription drift at all; use the alignment
/// variant for hand-transcribed sources.
///
/// # Errors
///
/// Returns [`ResolveError::UnknownContent`] naming the first segment whose
/// digest is absent from the table.
pub fn resolve_by_digest(
    toc: &mut TableOfContents,
    lookup: &DigestLookup,
) -> Result<(), ResolveError> {
    toc.for_each_segment_mut(|segment| {
        if segment.segment_id.is_empty() {
            return Ok(());
        }
        match lookup.get(&content_digest(&segment.segment_id)) {
            Some(id) => {
                segment.segment_id = id.0.clone();
                Ok(())
            }
            None => Err(ResolveError::UnknownContent {
                content: segment.segment_id.clone(),
            }),
        }
    })?;

    info!(segments = toc.segment_count(), "TOC resolved by digest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SegmentId;

    fn sample_toc() -> TableOfContents {
        serde_json::from_str(
            r#"{
                "sections": [
                    {"segments": [
                        {"segment_id": "first passage"},
                        {"segment_id": "second passage"}
                    ]},
                    {"segments": [{"segment_id": "third passage"}]}
                ]
            }"#,
        )
        .unwrap()
    }

    fn collect_ids(toc: &mut TableOfContents) -> Vec<String> {
        let mut ids = Vec::new();
        toc.for_each_segment_mut(|seg| {
            ids.push(seg.segment_id.clone());
            Ok::<(), ()>(())
        })
        .unwrap();
        ids
    }

    #[test]
    fn test_resolve_by_alignment() {
        let mut toc = sample_toc();
        let lookup = vec![
            LookupSegment::new("s1", "first passage"),
            LookupSegment::new("s2", "second passage"),
            LookupSegment::new("s3", "third passage"),
        ];

        resolve_by_alignment(&mut toc, &lookup, 0.95).unwrap();
        assert_eq!(collect_ids(&mut toc), ["s1", "s2", "s3"]);
    }

    #[test]
    fn test_resolve_by_alignment_monotonic_across_sections() {
        // Identical placeholder text in two sections must bind distinct
        // lookup entries in document order.
        let mut toc: TableOfContents = serde_json::from_str(
            r#"{
                "sections": [
                    {"segments": [{"segment_id": "refrain"}]},
                    {"segments": [{"segment_id": "refrain"}]}
                ]
            }"#,
        )
        .unwrap();
        let lookup = vec![
            LookupSegment::new("s1", "refrain"),
            LookupSegment::new("s2", "refrain"),
        ];

        resolve_by_alignment(&mut toc, &lookup, 0.95).unwrap();
        assert_eq!(collect_ids(&mut toc), ["s1", "s2"]);
    }

    #[test]
    fn test_resolve_by_alignment_unmatched_is_fatal() {
        let mut toc = sample_toc();
        let lookup = vec![LookupSegment::new("s1", "first passage")];

        let err = resolve_by_alignment(&mut toc, &lookup, 0.95).unwrap_err();
        match err {
            ResolveError::Align(AlignError::UnmatchedSegment { text, .. }) => {
                assert_eq!(text, "second passage");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_by_digest() {
        let mut toc = sample_toc();
        let lookup: DigestLookup = [
            (content_digest("first passage"), SegmentId::new("s1")),
            (content_digest("second passage"), SegmentId::new("s2")),
            (content_digest("third passage"), SegmentId::new("s3")),
        ]
        .into_iter()
        .collect();

        resolve_by_digest(&mut toc, &lookup).unwrap();
        assert_eq!(collect_ids(&mut toc), ["s1", "s2", "s3"]);
    }

    #[test]
    fn test_resolve_by_digest_unknown_content() {
        let mut toc = sample_toc();
        let lookup: DigestLookup =
            [(content_digest("first passage"), SegmentId::new("s1"))]
                .into_iter()
                .collect();

        let err = resolve_by_digest(&mut toc, &lookup).unwrap_err();
        match err {
            ResolveError::UnknownContent { content } => {
                assert_eq!(content, "second passage");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
