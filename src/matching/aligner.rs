//! Forward-only fuzzy alignment of ordered segment sequences.
//!
//! Both input sequences are assumed to preserve the same relative order, so
//! a true match never lies behind the last one. Each aligner owns a
//! [`MatchCursor`] that only moves forward: once the cursor has passed an
//! index, that index can never match again. This is what disambiguates
//! repeated identical segment text, and it is why an element that finds no
//! match is a fatal error rather than a skip — continuing with a stale
//! cursor would silently desynchronize every later match.

use thiserror::Error;
use tracing::debug;

use crate::core::segment::LookupSegment;
use crate::core::types::SegmentId;
use crate::matching::similarity::{
    contains_similar, is_similar, validate_threshold, ThresholdError,
    DEFAULT_CONTAINMENT_THRESHOLD, DEFAULT_SIMILARITY_THRESHOLD,
};

#[derive(Debug, Error)]
pub enum AlignError {
    /// A driving element found no satisfying candidate at or after the
    /// cursor. Fatal to the run.
    #[error("segment {index} (\"{text}\") has no match at or after position {cursor}")]
    UnmatchedSegment {
        /// Position of the driving element in its sequence
        index: usize,
        /// Raw text of the unmatched element
        text: String,
        /// Cursor position when the scan started
        cursor: usize,
    },

    #[error(transparent)]
    Threshold(#[from] ThresholdError),
}

/// A successful binding of a driving element to a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    /// Position of the driving element in its sequence
    pub driving_index: usize,

    /// Identifier of the matched candidate
    pub matched_id: SegmentId,

    /// Position of the matched candidate in the target sequence
    pub matched_index: usize,
}

/// "Last matched index + 1" into the target sequence.
///
/// Monotonically increasing; never shared between alignment runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchCursor(usize);

impl MatchCursor {
    #[must_use]
    pub fn position(self) -> usize {
        self.0
    }

    fn advance_past(&mut self, index: usize) {
        self.0 = index + 1;
    }
}

/// Thresholds for one alignment run, validated at construction.
#[derive(Debug, Clone, Copy)]
pub struct AlignerConfig {
    /// Whole-segment similarity threshold
    pub similarity_threshold: f64,

    /// Containment fallback threshold
    pub containment_threshold: f64,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            containment_threshold: DEFAULT_CONTAINMENT_THRESHOLD,
        }
    }
}

impl AlignerConfig {
    /// Build a config, rejecting thresholds outside `(0, 1]` before any
    /// scan runs.
    pub fn new(similarity_threshold: f64, containment_threshold: f64) -> Result<Self, ThresholdError> {
        Ok(Self {
            similarity_threshold: validate_threshold(similarity_threshold)?,
            containment_threshold: validate_threshold(containment_threshold)?,
        })
    }
}

/// Whole-segment aligner: each driving text binds to the first similar
/// lookup segment at or after the cursor.
#[derive(Debug)]
pub struct SegmentAligner<'a> {
    lookup: &'a [LookupSegment],
    cursor: MatchCursor,
    threshold: f64,
    driving_index: usize,
}

impl<'a> SegmentAligner<'a> {
    pub fn new(lookup: &'a [LookupSegment], threshold: f64) -> Result<Self, ThresholdError> {
        Ok(Self {
            lookup,
            cursor: MatchCursor::default(),
            threshold: validate_threshold(threshold)?,
            driving_index: 0,
        })
    }

    #[must_use]
    pub fn cursor(&self) -> MatchCursor {
        self.cursor
    }

    /// Align the next driving element.
    ///
    /// Empty text is a structural placeholder: it produces no event and
    /// leaves the cursor untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::UnmatchedSegment`] if no lookup segment at or
    /// after the cursor is similar to `text`.
    pub fn match_next(&mut self, text: &str) -> Result<Option<MatchEvent>, AlignError> {
        let index = self.driving_index;
        self.driving_index += 1;

        if text.is_empty() {
            return Ok(None);
        }

        let start = self.cursor.position();
        for (j, candidate) in self.lookup.iter().enumerate().skip(start) {
            if is_similar(&candidate.segment_content, text, self.threshold) {
                self.cursor.advance_past(j);
                debug!(driving = index, matched = j, id = %candidate.id, "segment matched");
                return Ok(Some(MatchEvent {
                    driving_index: index,
                    matched_id: candidate.id.clone(),
                    matched_index: j,
                }));
            }
        }

        Err(AlignError::UnmatchedSegment {
            index,
            text: text.to_string(),
            cursor: start,
        })
    }

    /// Align a whole driving sequence, in order.
    ///
    /// # Errors
    ///
    /// Fails on the first unmatched element; later elements are not
    /// attempted because they depend on a correct cursor.
    pub fn align_all<S: AsRef<str>>(
        mut self,
        driving: impl IntoIterator<Item = S>,
    ) -> Result<Vec<MatchEvent>, AlignError> {
        let mut events = Vec::new();
        for text in driving {
            if let Some(event) = self.match_next(text.as_ref())? {
                events.push(event);
            }
        }
        Ok(events)
    }
}

/// A candidate the containment aligner scans.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// Composite text searched for the canonical fragment
    pub text: &'a str,

    /// Identifier contributed on a hit. `None` marks a placeholder row:
    /// skipped as a candidate, but it does not end a run.
    pub id: Option<&'a SegmentId>,
}

/// Containment aligner: each driving fragment binds to a contiguous run of
/// candidates whose text contains it, starting at or after the cursor.
///
/// A fragment that spans several consecutive working rows produces one event
/// per row, in row order; the run ends at the first non-containing candidate
/// after at least one hit.
#[derive(Debug)]
pub struct ContainmentAligner<'a> {
    candidates: Vec<Candidate<'a>>,
    cursor: MatchCursor,
    threshold: f64,
    driving_index: usize,
}

impl<'a> ContainmentAligner<'a> {
    pub fn new(candidates: Vec<Candidate<'a>>, threshold: f64) -> Result<Self, ThresholdError> {
        Ok(Self {
            candidates,
            cursor: MatchCursor::default(),
            threshold: validate_threshold(threshold)?,
            driving_index: 0,
        })
    }

    #[must_use]
    pub fn cursor(&self) -> MatchCursor {
        self.cursor
    }

    /// Align the next driving fragment, returning every event of its run.
    ///
    /// Empty fragments are skipped: no events, cursor untouched. On failure
    /// the cursor is also untouched, so a caller collecting failures can
    /// continue with the next fragment from the same position.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::UnmatchedSegment`] if no candidate at or after
    /// the cursor contains `fragment`.
    pub fn match_next(&mut self, fragment: &str) -> Result<Vec<MatchEvent>, AlignError> {
        let index = self.driving_index;
        self.driving_index += 1;

        if fragment.is_empty() {
            return Ok(Vec::new());
        }

        let start = self.cursor.position();
        let mut events = Vec::new();

        for (j, candidate) in self.candidates.iter().enumerate().skip(start) {
            let Some(id) = candidate.id else {
                continue;
            };

            if contains_similar(fragment, candidate.text, self.threshold) {
                self.cursor.advance_past(j);
                debug!(driving = index, matched = j, id = %id, "fragment matched");
                events.push(MatchEvent {
                    driving_index: index,
                    matched_id: id.clone(),
                    matched_index: j,
                });
            } else if !events.is_empty() {
                break;
            }
        }

        if events.is_empty() {
            return Err(AlignError::UnmatchedSegment {
                index,
                text: fragment.to_string(),
                cursor: start,
            });
        }

        Ok(events)
    }
}
