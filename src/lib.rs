//! # segment-mapper
//!
//! A library for aligning independently-produced segment sequences of the
//! same text using fuzzy string matching.
//!
//! When a segmented text is uploaded to a content API, the API assigns each
//! segment a stable identifier. Locally-prepared artifacts (commentary
//! mappings, tables of contents) still reference segments by their *text*,
//! freshly parsed from sources and transcribed with minor discrepancies:
//! stray zero-width characters, decomposed diacritics, small spelling
//! drift.
//!
//! `segment-mapper` bridges the two by aligning the local sequence against
//! the API's lookup sequence with approximate string equality, while
//! preserving the relative order of both — each lookup position is consumed
//! at most once, scanning strictly forward.
//!
//! ## Example
//!
//! ```rust
//! use segment_mapper::{LookupSegment, SegmentAligner};
//!
//! let lookup = vec![
//!     LookupSegment::new("a1", "the first passage"),
//!     LookupSegment::new("a2", "the second passage"),
//! ];
//!
//! let aligner = SegmentAligner::new(&lookup, 0.95).unwrap();
//! let events = aligner
//!     .align_all(["the first passage", "the second pasage"])
//!     .unwrap();
//!
//! assert_eq!(events[1].matched_id.0, "a2");
//! ```
//!
//! ## Modules
//!
//! - [`core`]: segment, sequence, and TOC data types
//! - [`matching`]: normalization, similarity scoring, and the monotonic
//!   aligner
//! - [`mapping`]: the commentary-to-root mapping builder and upload payload
//! - [`resolver`]: TOC placeholder resolution
//! - [`parsing`]: JSON input loaders
//! - [`client`]: content API upload client
//! - [`cli`]: command-line interface implementation

pub mod cli;
pub mod client;
pub mod core;
pub mod mapping;
pub mod matching;
pub mod parsing;
pub mod resolver;

// Re-export commonly used types for convenience
pub use core::segment::{LookupSegment, MappingRow};
pub use core::toc::TableOfContents;
pub use core::types::{CommentaryChannel, SegmentId, TextId};
pub use mapping::builder::{MappingBuilder, MappingError, MappingRelation};
pub use mapping::payload::MappingPayload;
pub use matching::aligner::{AlignError, AlignerConfig, MatchEvent, SegmentAligner};
