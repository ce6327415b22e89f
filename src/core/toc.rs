use serde::{Deserialize, Serialize};

/// Table-of-contents payload as prepared for the content API.
///
/// Before resolution, each segment's `segment_id` field holds the segment's
/// placeholder *content*; resolution replaces it with the API-assigned
/// identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableOfContents {
    pub sections: Vec<Section>,

    /// Fields the API shape carries that resolution passes through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One TOC section: its segments in document order, plus nested sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub segments: Vec<TocSegment>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A segment reference inside a TOC section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocSegment {
    /// Placeholder content before resolution, API identifier after
    pub segment_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_number: Option<u32>,
}

impl TableOfContents {
    /// Visit every segment in document order (a section's own segments
    /// first, then its nested sections), mutably.
    ///
    /// Document order matters: the alignment-based resolver advances a
    /// monotonic cursor across the whole traversal.
    pub fn for_each_segment_mut<E>(
        &mut self,
        mut f: impl FnMut(&mut TocSegment) -> Result<(), E>,
    ) -> Result<(), E> {
        fn walk<E>(
            sections: &mut [Section],
            f: &mut impl FnMut(&mut TocSegment) -> Result<(), E>,
        ) -> Result<(), E> {
            for section in sections {
                for segment in &mut section.segments {
                    f(segment)?;
                }
                walk(&mut section.sections, f)?;
            }
            Ok(())
        }
        walk(&mut self.sections, &mut f)
    }

    /// Total number of segments across all sections.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        fn count(sections: &[Section]) -> usize {
            sections
                .iter()
                .map(|s| s.segments.len() + count(&s.sections))
                .sum()
        }
        count(&self.sections)
    }
}
