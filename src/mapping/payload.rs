use serde::{Deserialize, Serialize};

use crate::core::types::{SegmentId, TextId};
use crate::mapping::builder::MappingRelation;

/// One parent-scope group: the parent text and the ordered root segments
/// matched within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentSegmentMapping {
    pub parent_text_id: TextId,
    pub segments: Vec<SegmentId>,
}

/// Mapping record for one commentary segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMapping {
    /// Text owning the commentary segment
    pub text_id: TextId,

    /// The commentary segment being mapped
    pub segment_id: SegmentId,

    pub mappings: Vec<ParentSegmentMapping>,
}

/// The upload payload shape the mappings endpoint consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingPayload {
    pub text_mappings: Vec<TextMapping>,
}

impl MappingPayload {
    /// Reshape a finished relation into the upload payload.
    ///
    /// Pure data reshaping: children appear in relation order and each parent
    /// list is carried over verbatim, preserving encounter order without
    /// deduplication.
    #[must_use]
    pub fn from_relation(
        relation: &MappingRelation,
        commentary_text_id: &TextId,
        root_text_id: &TextId,
    ) -> Self {
        let text_mappings = relation
            .iter()
            .map(|(child, parents)| TextMapping {
                text_id: commentary_text_id.clone(),
                segment_id: child.clone(),
                mappings: vec![ParentSegmentMapping {
                    parent_text_id: root_text_id.clone(),
                    segments: parents.to_vec(),
                }],
            })
            .collect();

        Self { text_mappings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_relation() -> MappingRelation {
        let mut relation = MappingRelation::new();
        relation.push(SegmentId::new("c1"), SegmentId::new("r1"));
        relation.push(SegmentId::new("c1"), SegmentId::new("r2"));
        relation.push(SegmentId::new("c2"), SegmentId::new("r2"));
        relation
    }

    #[test]
    fn test_from_relation_preserves_order() {
        let payload = MappingPayload::from_relation(
            &sample_relation(),
            &TextId::new("commentary"),
            &TextId::new("root"),
        );

        assert_eq!(payload.text_mappings.len(), 2);

        let first = &payload.text_mappings[0];
        assert_eq!(first.segment_id, SegmentId::new("c1"));
        assert_eq!(first.text_id, TextId::new("commentary"));
        assert_eq!(first.mappings.len(), 1);
        assert_eq!(first.mappings[0].parent_text_id, TextId::new("root"));
        assert_eq!(
            first.mappings[0].segments,
            vec![SegmentId::new("r1"), SegmentId::new("r2")]
        );

        let second = &payload.text_mappings[1];
        assert_eq!(second.segment_id, SegmentId::new("c2"));
        assert_eq!(second.mappings[0].segments, vec![SegmentId::new("r2")]);
    }

    #[test]
    fn test_round_trip_relation_to_payload() {
        // Assembling must reproduce, per child, the exact parent list the
        // relation holds — no reordering, no deduplication.
        let mut relation = MappingRelation::new();
        relation.push(SegmentId::new("c1"), SegmentId::new("r1"));
        relation.push(SegmentId::new("c1"), SegmentId::new("r1"));

        let payload = MappingPayload::from_relation(
            &relation,
            &TextId::new("commentary"),
            &TextId::new("root"),
        );

        assert_eq!(
            payload.text_mappings[0].mappings[0].segments,
            vec![SegmentId::new("r1"), SegmentId::new("r1")]
        );
    }

    #[test]
    fn test_serialized_shape() {
        let payload = MappingPayload::from_relation(
            &sample_relation(),
            &TextId::new("ct"),
            &TextId::new("rt"),
        );
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["text_mappings"][0]["text_id"], "ct");
        assert_eq!(json["text_mappings"][0]["segment_id"], "c1");
        assert_eq!(
            json["text_mappings"][0]["mappings"][0]["parent_text_id"],
            "rt"
        );
        assert_eq!(
            json["text_mappings"][0]["mappings"][0]["segments"][0],
            "r1"
        );
    }

    #[test]
    fn test_empty_relation_yields_empty_payload() {
        let payload = MappingPayload::from_relation(
            &MappingRelation::new(),
            &TextId::new("ct"),
            &TextId::new("rt"),
        );
        assert!(payload.text_mappings.is_empty());
    }
}
