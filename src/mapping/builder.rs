use std::collections::HashMap;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use crate::core::segment::{LookupSegment, MappingRow};
use crate::core::types::{CommentaryChannel, SegmentId};
use crate::matching::aligner::{AlignError, AlignerConfig, Candidate, ContainmentAligner, SegmentAligner};
use crate::matching::similarity::contains_similar;

/// A lookup segment that never received a match in the verification pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreferencedSegment {
    /// Position in the lookup sequence
    pub index: usize,

    /// API-assigned identifier
    pub id: SegmentId,

    /// Segment text
    pub text: String,
}

impl std::fmt::Display for UnreferencedSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} (\"{}\")", self.index, self.id, self.text)
    }
}

fn list_segments(segments: &[UnreferencedSegment]) -> String {
    segments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum MappingError {
    #[error(transparent)]
    Align(#[from] AlignError),

    /// Lookup segments the working sequence never referenced. Surfaced only
    /// after the verification pass completes, so the set is complete rather
    /// than first-failure-only.
    #[error("{} lookup segment(s) never referenced by the working sequence: {}", segments.len(), list_segments(segments))]
    UnreferencedSegments { segments: Vec<UnreferencedSegment> },

    /// A working row lacks the selected commentary field.
    #[error("row {row} has no \"{field}\" field")]
    MissingCommentaryField { row: usize, field: String },
}

/// Child-to-parents relation built by folding match events.
///
/// Parent identifiers accumulate under each child key in encounter order;
/// repeats are kept, and iteration yields children in first-encounter order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MappingRelation {
    order: Vec<SegmentId>,
    parents: HashMap<SegmentId, Vec<SegmentId>>,
}

impl MappingRelation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `parent` under `child`, creating the child entry on first
    /// encounter.
    pub fn push(&mut self, child: SegmentId, parent: SegmentId) {
        if !self.parents.contains_key(&child) {
            self.order.push(child.clone());
        }
        self.parents.entry(child).or_default().push(parent);
    }

    /// Parents recorded for `child`, in encounter order.
    #[must_use]
    pub fn parents_of(&self, child: &SegmentId) -> Option<&[SegmentId]> {
        self.parents.get(child).map(Vec::as_slice)
    }

    /// Iterate children in first-encounter order with their parent lists.
    pub fn iter(&self) -> impl Iterator<Item = (&SegmentId, &[SegmentId])> {
        self.order
            .iter()
            .map(|child| (child, self.parents[child].as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Builds the commentary-to-root mapping relation for one run.
///
/// The build is three passes over run-local cursors:
///
/// 1. resolve every row's root passage to a root lookup identifier
/// 2. verify every commentary lookup segment is accounted for in the rows
/// 3. fold containment matches into the relation
///
/// Any failure aborts the run; a corrupted mapping is worse than a failed
/// run, so nothing is skipped or retried here.
#[derive(Debug)]
pub struct MappingBuilder<'a> {
    root_lookup: &'a [LookupSegment],
    commentary_lookup: &'a [LookupSegment],
    rows: &'a [MappingRow],
    channel: CommentaryChannel,
    config: AlignerConfig,
}

impl<'a> MappingBuilder<'a> {
    pub fn new(
        root_lookup: &'a [LookupSegment],
        commentary_lookup: &'a [LookupSegment],
        rows: &'a [MappingRow],
        channel: CommentaryChannel,
        config: AlignerConfig,
    ) -> Self {
        Self {
            root_lookup,
            commentary_lookup,
            rows,
            channel,
            config,
        }
    }

    /// Run all passes and return the finished relation.
    pub fn run(&self) -> Result<MappingRelation, MappingError> {
        self.check_channel()?;

        let started = Instant::now();
        let resolved = self.resolve_root_ids()?;
        info!(rows = self.rows.len(), elapsed = ?started.elapsed(), "root passages resolved");

        let started = Instant::now();
        self.verify_commentary_coverage()?;
        info!(segments = self.commentary_lookup.len(), elapsed = ?started.elapsed(), "commentary coverage verified");

        let started = Instant::now();
        let relation = self.build_relation(&resolved)?;
        info!(children = relation.len(), elapsed = ?started.elapsed(), "mapping relation built");

        Ok(relation)
    }

    /// Every row must carry the selected commentary field; a missing field
    /// is a boundary error, never a silent skip mid-scan.
    fn check_channel(&self) -> Result<(), MappingError> {
        for (i, row) in self.rows.iter().enumerate() {
            if row.commentary_text(self.channel).is_none() {
                return Err(MappingError::MissingCommentaryField {
                    row: i,
                    field: self.channel.field_name(),
                });
            }
        }
        Ok(())
    }

    fn channel_text(&self, row: &'a MappingRow) -> &'a str {
        row.commentary_text(self.channel).unwrap_or("")
    }

    /// Resolve each row's `root_display_text` to a root lookup identifier by
    /// whole-segment alignment. Rows without a root resolve to `None`.
    pub fn resolve_root_ids(&self) -> Result<Vec<Option<SegmentId>>, MappingError> {
        let mut aligner = SegmentAligner::new(self.root_lookup, self.config.similarity_threshold)
            .map_err(AlignError::from)?;

        let mut resolved = Vec::with_capacity(self.rows.len());
        for row in self.rows {
            let event = aligner.match_next(&row.root_display_text)?;
            resolved.push(event.map(|e| e.matched_id));
        }
        Ok(resolved)
    }

    /// Companion pass: every non-empty commentary lookup segment must appear
    /// in the selected channel of some row, scanning forward under the same
    /// monotonic-cursor discipline as the build pass.
    ///
    /// The pass runs to completion and reports the complete set of
    /// unaccounted segments, not just the first.
    pub fn verify_commentary_coverage(&self) -> Result<(), MappingError> {
        let mut cursor = 0usize;
        let mut unaccounted = Vec::new();

        for (i, segment) in self.commentary_lookup.iter().enumerate() {
            if segment.is_empty() {
                continue;
            }

            let found = self.rows.iter().enumerate().skip(cursor).find(|(_, row)| {
                contains_similar(
                    &segment.segment_content,
                    self.channel_text(row),
                    self.config.containment_threshold,
                )
            });

            match found {
                Some((j, _)) => {
                    cursor = j + 1;
                    debug!(segment = i, row = j, "lookup segment accounted for");
                }
                None => unaccounted.push(UnreferencedSegment {
                    index: i,
                    id: segment.id.clone(),
                    text: segment.segment_content.clone(),
                }),
            }
        }

        if unaccounted.is_empty() {
            Ok(())
        } else {
            Err(MappingError::UnreferencedSegments {
                segments: unaccounted,
            })
        }
    }

    /// Fold containment-mode match events into the relation. Rows whose root
    /// did not resolve (placeholder rows) are skipped as candidates without
    /// ending a run.
    fn build_relation(&self, resolved: &[Option<SegmentId>]) -> Result<MappingRelation, MappingError> {
        let candidates: Vec<Candidate<'_>> = self
            .rows
            .iter()
            .zip(resolved)
            .map(|(row, id)| Candidate {
                text: self.channel_text(row),
                id: id.as_ref(),
            })
            .collect();

        let mut aligner = ContainmentAligner::new(candidates, self.config.containment_threshold)
            .map_err(AlignError::from)?;

        let mut relation = MappingRelation::new();
        for segment in self.commentary_lookup {
            for event in aligner.match_next(&segment.segment_content)? {
                relation.push(segment.id.clone(), event.matched_id);
            }
        }
        Ok(relation)
    }
}
