//! Mapping construction: fold alignment events into a child-to-parents
//! relation, then reshape it into the upload payload.
//!
//! - [`MappingBuilder`]: runs the aligner over the working sequence with
//!   two-sided verification (every row's root resolves forward; every
//!   commentary lookup segment is referenced at least once)
//! - [`MappingRelation`]: insertion-ordered child-to-parents relation
//! - [`MappingPayload`]: the externally-defined nested record shape

pub mod builder;
pub mod payload;

pub use builder::{MappingBuilder, MappingError, MappingRelation, UnreferencedSegment};
pub use payload::{MappingPayload, ParentSegmentMapping, TextMapping};
