//! Fuzzy matching: normalization, similarity scoring, and the monotonic
//! alignment engine.
//!
//! The pipeline through this module is fixed:
//!
//! 1. [`normalize`](normalize::normalize) strips invisible code points and
//!    canonically composes both sides of every comparison
//! 2. [`similarity`] scores normalized strings (whole-segment ratio, or
//!    exact-substring-then-fuzzy containment)
//! 3. [`aligner`] scans two ordered sequences in lockstep behind a
//!    forward-only cursor and emits [`MatchEvent`](aligner::MatchEvent)s
//!
//! The aligner is greedy and single-pass: it takes the *first* satisfying
//! candidate at or after the cursor, never the best one, trading optimality
//! for linear-ish work under the shared-order assumption. Reordered or
//! interleaved inputs are out of scope and fail loudly.

pub mod aligner;
pub mod normalize;
pub mod similarity;

pub use aligner::{AlignError, AlignerConfig, ContainmentAligner, MatchEvent, SegmentAligner};
pub use similarity::{contains_similar, is_similar};
