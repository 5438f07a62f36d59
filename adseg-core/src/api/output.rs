//! Output types

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::assembler::CoverageReport;
use crate::types::{Candidate, Segment, SegmentType, Token};

/// Segmentation result with metadata
#[derive(Debug, Clone, Serialize)]
pub struct Output {
    /// Segments in text order
    pub segments: Vec<Segment>,
    /// Processing metadata
    pub metadata: SegmentationMetadata,
}

/// Metadata about one segmentation run
#[derive(Debug, Clone, Serialize)]
pub struct SegmentationMetadata {
    /// Product id of the rule table used
    pub product: String,
    /// Total processing duration
    #[serde(serialize_with = "serialize_duration_ms", rename = "duration_ms")]
    pub duration: Duration,
    /// Coverage diagnostic
    pub coverage: CoverageReport,
    /// Additional statistics
    pub stats: SegmentationStats,
}

/// Counts collected along the pipeline
#[derive(Debug, Clone, Default, Serialize)]
pub struct SegmentationStats {
    /// Total bytes processed
    pub bytes_processed: usize,
    /// Total characters processed
    pub chars_processed: usize,
    /// Tokens produced by the tokenizer
    pub token_count: usize,
    /// Candidates after the merge pass
    pub candidate_count: usize,
    /// Candidates that absorbed footnote markers
    pub merged_count: usize,
    /// Number of segments
    pub segment_count: usize,
    /// Segment count per output type
    pub by_type: BTreeMap<SegmentType, usize>,
}

impl SegmentationStats {
    pub(crate) fn count_types(segments: &[Segment]) -> BTreeMap<SegmentType, usize> {
        let mut by_type = BTreeMap::new();
        for segment in segments {
            *by_type.entry(segment.segment_type).or_insert(0) += 1;
        }
        by_type
    }
}

/// Intermediate pipeline state, for inspecting segmentation decisions
#[derive(Debug, Clone, Serialize)]
pub struct DebugOutput {
    /// Token stream
    pub tokens: Vec<Token>,
    /// Candidates after the merge pass, by descending priority
    pub candidates: Vec<Candidate>,
    /// Final segments
    pub segments: Vec<Segment>,
    /// Coverage diagnostic
    pub coverage: CoverageReport,
}

fn serialize_duration_ms<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_micros() as f64 / 1000.0)
}
