use serde::{Deserialize, Serialize};

/// Stable identifier assigned to a segment by the content API.
///
/// Identifiers are opaque and not necessarily unique in isolation; a
/// segment's position combined with monotonic scanning disambiguates
/// repeats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub String);

impl SegmentId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a text (a whole document) owning a set of segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextId(pub String);

impl TextId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::fmt::Display for TextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Selects which numbered commentary field of a working row participates in
/// alignment (`commentary_1`, `commentary_2`, ...).
///
/// Working rows can carry several alternative commentary transcriptions of
/// the same root passage; the caller picks one per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentaryChannel(pub u32);

impl CommentaryChannel {
    #[must_use]
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// JSON field name this channel selects on a working row.
    #[must_use]
    pub fn field_name(&self) -> String {
        format!("commentary_{}", self.0)
    }
}

impl std::fmt::Display for CommentaryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.field_name())
    }
}
