//! Segment assembly
//!
//! Turns merged, overlapping candidates into the final segment list:
//! 1. drop candidates made only of footnote material
//! 2. resolve conflicts by priority ([`interval::schedule`])
//! 3. clip any tolerated residual overlap from the weaker span
//! 4. order by offset and slice the source verbatim
//! 5. rejoin short fragments split off by a marker (never headers)
//! 6. measure coverage, warn when it is low (footnote material is not counted)
//! 7. assign sequential ids

pub mod coverage;
pub mod interval;
mod remerge;

pub use coverage::CoverageReport;

use crate::api::SegmenterConfig;
use crate::offsets::OffsetMap;
use crate::types::{Candidate, Position, Segment, SegmentType, Span, TokenKind};
use interval::Interval;

/// Assembled segments plus the coverage diagnostic
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub segments: Vec<Segment>,
    pub coverage: CoverageReport,
}

/// Segment span before ids are assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Draft {
    pub(crate) span: Span,
    pub(crate) segment_type: SegmentType,
    /// Carries a `【...】` header, which always stays a segment of its own
    pub(crate) structural: bool,
}

/// Final assembly stage
#[derive(Debug, Clone, Default)]
pub struct SegmentAssembler {
    config: SegmenterConfig,
}

impl SegmentAssembler {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Build segments for `source`
    pub fn build(&self, candidates: &[Candidate], source: &str) -> Vec<Segment> {
        self.assemble(candidates, source).segments
    }

    /// Build segments and report coverage
    pub fn assemble(&self, candidates: &[Candidate], source: &str) -> Assembly {
        let offsets = OffsetMap::new(source);

        // 1. Filter
        let (reference, content): (Vec<&Candidate>, Vec<&Candidate>) = candidates
            .iter()
            .filter(|c| !c.tokens.is_empty())
            .partition(|c| c.is_annotation_only());

        // 2. Dedup
        let intervals: Vec<Interval> = content
            .iter()
            .map(|c| {
                Interval::new(
                    offsets.char_offset(c.start()),
                    offsets.char_offset(c.end()),
                    c.priority,
                )
            })
            .collect();
        let accepted = interval::schedule(&intervals, self.config.overlap_ratio());

        // 3. Clip residual overlap, strongest first
        let mut drafts: Vec<Draft> = Vec::with_capacity(accepted.len());
        for idx in accepted {
            let candidate = content[idx];
            let mut span = candidate.span();
            for winner in &drafts {
                span = clip(span, winner.span);
            }
            let span = trim(source, span);
            if span.is_empty() {
                tracing::trace!(start = candidate.start(), "candidate clipped away");
                continue;
            }
            drafts.push(Draft {
                span,
                segment_type: candidate.kind.segment_type(),
                structural: candidate
                    .tokens
                    .iter()
                    .any(|t| t.kind == TokenKind::StructuralDelimiter),
            });
        }

        // 4. Order
        drafts.sort_by_key(|d| d.span.start);

        // 5. Fragment remerge
        let drafts = remerge::remerge(
            drafts,
            source,
            &offsets,
            self.config.adjacency_gap(),
            self.config.short_fragment(),
        );

        // 6. Coverage
        let spans: Vec<Span> = drafts.iter().map(|d| d.span).collect();
        let footnotes = footnote_spans(candidates, &spans);
        let coverage = coverage::measure(source, &spans, &footnotes);
        if coverage.is_below(self.config.coverage_threshold()) {
            tracing::warn!(
                coverage = coverage.ratio,
                covered = coverage.covered_chars,
                total = coverage.total_chars,
                threshold = self.config.coverage_threshold(),
                "segment coverage below threshold"
            );
        }

        // 7. Ids
        let segments: Vec<Segment> = drafts
            .into_iter()
            .enumerate()
            .map(|(i, d)| Segment {
                id: Segment::format_id(i + 1),
                text: source[d.span.start..d.span.end].to_string(),
                segment_type: d.segment_type,
                position: Position {
                    start: d.span.start,
                    end: d.span.end,
                    char_start: offsets.char_offset(d.span.start),
                    char_end: offsets.char_offset(d.span.end),
                },
            })
            .collect();

        tracing::debug!(
            candidates = content.len(),
            filtered = reference.len(),
            segments = segments.len(),
            coverage = coverage.ratio,
            "segments assembled"
        );

        Assembly { segments, coverage }
    }
}

/// Assemble with the default configuration
pub fn build(candidates: &[Candidate], source: &str) -> Vec<Segment> {
    SegmentAssembler::default().build(candidates, source)
}

/// Sorted, deduplicated spans of footnote material left out of the segments
///
/// Definitions always count as footnote material. A marker counts only when
/// no segment (`segments` sorted and disjoint) carries it.
fn footnote_spans(candidates: &[Candidate], segments: &[Span]) -> Vec<Span> {
    let carried = |span: Span| {
        let idx = segments.partition_point(|s| s.end <= span.start);
        segments.get(idx).is_some_and(|s| s.start < span.end)
    };
    let mut spans: Vec<Span> = candidates
        .iter()
        .flat_map(|c| c.tokens.iter())
        .filter(|t| match t.kind {
            TokenKind::AnnotationText => true,
            TokenKind::AnnotationMarker => !carried(t.span()),
            _ => false,
        })
        .map(|t| t.span())
        .collect();
    spans.sort();
    spans.dedup();
    spans
}

/// Remove the range shared with `winner` from `span`
///
/// Usually only an edge overlaps, since scheduling rejects a span that contains
/// an accepted one. Containment gets through only at an overlap ratio of 1.0;
/// the longer remaining side is kept then.
fn clip(span: Span, winner: Span) -> Span {
    if !span.intersects(&winner) {
        return span;
    }
    let left = Span::new(span.start, winner.start.max(span.start));
    let right = Span::new(winner.end.min(span.end), span.end);
    if right.len() > left.len() {
        right
    } else {
        left
    }
}

/// Shrink `span` past surrounding whitespace
fn trim(source: &str, span: Span) -> Span {
    let text = &source[span.start..span.end];
    let start = span.start + (text.len() - text.trim_start().len());
    let end = span.start + text.trim_end().len();
    if start >= end {
        Span::new(span.start, span.start)
    } else {
        Span::new(start, end)
    }
}
