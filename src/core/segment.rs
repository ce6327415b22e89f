use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{CommentaryChannel, SegmentId};

/// One element of a lookup sequence: a segment's content paired with the
/// stable identifier the content API assigned to it.
///
/// Order in the owning list reflects document order and is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupSegment {
    /// API-assigned identifier
    pub id: SegmentId,

    /// Segment text as returned by the API
    pub segment_content: String,
}

impl LookupSegment {
    pub fn new(id: impl Into<String>, segment_content: impl Into<String>) -> Self {
        Self {
            id: SegmentId::new(id),
            segment_content: segment_content.into(),
        }
    }

    /// Structurally-empty placeholder segments are skipped by alignment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segment_content.is_empty()
    }
}

/// One row of the working sequence for commentary mapping: a root passage
/// as displayed, plus one or more numbered commentary transcriptions of it.
///
/// The numbered fields (`commentary_1`, `commentary_2`, ...) are kept in a
/// flattened map so rows with any number of channels deserialize without a
/// schema change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRow {
    /// Root passage text this row annotates; empty for rows that carry
    /// commentary continuation only
    pub root_display_text: String,

    /// Numbered commentary fields, e.g. `commentary_1`
    #[serde(flatten)]
    pub commentaries: BTreeMap<String, String>,
}

impl MappingRow {
    pub fn new(root_display_text: impl Into<String>) -> Self {
        Self {
            root_display_text: root_display_text.into(),
            commentaries: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_commentary(mut self, channel: CommentaryChannel, text: impl Into<String>) -> Self {
        self.commentaries.insert(channel.field_name(), text.into());
        self
    }

    /// Text of the selected commentary channel, if the row carries it.
    #[must_use]
    pub fn commentary_text(&self, channel: CommentaryChannel) -> Option<&str> {
        self.commentaries
            .get(&channel.field_name())
            .map(String::as_str)
    }

    /// Rows without a root passage are skipped as alignment candidates but
    /// do not interrupt a containment run.
    #[must_use]
    pub fn has_root(&self) -> bool {
        !self.root_display_text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_segment_empty() {
        assert!(LookupSegment::new("a", "").is_empty());
        assert!(!LookupSegment::new("a", "foo").is_empty());
    }

    #[test]
    fn test_mapping_row_channel_selection() {
        let row = MappingRow::new("root text")
            .with_commentary(CommentaryChannel::new(1), "first")
            .with_commentary(CommentaryChannel::new(2), "second");

        assert_eq!(row.commentary_text(CommentaryChannel::new(1)), Some("first"));
        assert_eq!(row.commentary_text(CommentaryChannel::new(2)), Some("second"));
        assert_eq!(row.commentary_text(CommentaryChannel::new(3)), None);
    }

    #[test]
    fn test_mapping_row_deserialize_flattened() {
        let json = r#"{
            "root_display_text": "foo",
            "commentary_1": "bar",
            "commentary_2": "baz"
        }"#;
        let row: MappingRow = serde_json::from_str(json).unwrap();

        assert_eq!(row.root_display_text, "foo");
        assert_eq!(row.commentary_text(CommentaryChannel::new(1)), Some("bar"));
        assert_eq!(row.commentary_text(CommentaryChannel::new(2)), Some("baz"));
    }

    #[test]
    fn test_has_root() {
        assert!(MappingRow::new("x").has_root());
        assert!(!MappingRow::new("").has_root());
    }
}
