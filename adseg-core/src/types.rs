//! Type definitions shared by every pipeline stage
//!
//! Tokens are produced by the tokenizer, candidates by the detector and the
//! merger, segments by the assembler. Each stage consumes the previous
//! stage's values by reference and produces new ones.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ============================================================================
// Spans
// ============================================================================

/// Half-open byte range `[start, end)` into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Inclusive start byte offset
    pub start: usize,
    /// Exclusive end byte offset
    pub end: usize,
}

impl Span {
    /// Creates a new span
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Self { start, end }
    }

    /// Length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether the two spans share at least one byte
    #[inline]
    pub fn intersects(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies completely inside this span
    #[inline]
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

// ============================================================================
// Tokens
// ============================================================================

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Bracket-enclosed header such as `【美白効果】`
    StructuralDelimiter,
    /// Stand-alone block without terminal punctuation
    Paragraph,
    /// Text ending with sentence-terminal punctuation
    Sentence,
    /// In-text footnote reference such as `※1`
    AnnotationMarker,
    /// Footnote definition such as `※1：効能効果の範囲内`
    AnnotationText,
    /// Any other fragment
    Text,
}

impl TokenKind {
    /// Whether the token is footnote material (marker or definition)
    #[inline]
    pub fn is_annotation(&self) -> bool {
        matches!(self, TokenKind::AnnotationMarker | TokenKind::AnnotationText)
    }
}

/// Optional per-token details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Footnote number for markers and definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_number: Option<u32>,
    /// Name of the rule keyword detected inside this token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Priority the tokenizer suggests for candidates built from this token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_hint: Option<u32>,
}

/// Atomic lexical unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Lexical category
    pub kind: TokenKind,
    /// Exact source text of the token
    pub text: String,
    /// Inclusive start byte offset
    pub start: usize,
    /// Exclusive end byte offset
    pub end: usize,
    /// One-based line number of `start`
    pub line: usize,
    /// Optional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TokenMetadata>,
}

impl Token {
    /// Creates a token for `source[start..end]`
    pub fn new(kind: TokenKind, source: &str, start: usize, end: usize, line: usize) -> Self {
        Self {
            kind,
            text: source[start..end].to_string(),
            start,
            end,
            line,
            metadata: None,
        }
    }

    /// Attaches metadata
    pub fn with_metadata(mut self, metadata: TokenMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns a copy whose metadata records `keyword`
    pub fn tagged_with_keyword(&self, keyword: &str) -> Self {
        let mut metadata = self.metadata.clone().unwrap_or_default();
        metadata.keyword = Some(keyword.to_string());
        Self {
            metadata: Some(metadata),
            ..self.clone()
        }
    }

    /// Byte span of the token
    #[inline]
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Footnote number, if the token carries one
    pub fn annotation_number(&self) -> Option<u32> {
        self.metadata.as_ref().and_then(|m| m.annotation_number)
    }
}

// ============================================================================
// Candidates
// ============================================================================

/// Coarse type assigned by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateType {
    /// Efficacy or product claim
    Claim,
    /// Descriptive copy
    Explanation,
    /// Supporting data (test results, survey figures)
    Evidence,
    /// Call to action: price, urgency, offers
    Cta,
    /// Footnote material
    Disclaimer,
}

impl CandidateType {
    /// Maps onto the three-way output taxonomy
    pub fn segment_type(&self) -> SegmentType {
        match self {
            CandidateType::Claim | CandidateType::Cta | CandidateType::Disclaimer => {
                SegmentType::Claim
            }
            CandidateType::Explanation => SegmentType::Explanation,
            CandidateType::Evidence => SegmentType::Evidence,
        }
    }
}

/// Provisional, possibly overlapping segment proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Owned tokens, sorted by offset
    pub tokens: Vec<Token>,
    /// Coarse type
    pub kind: CandidateType,
    /// Relative importance (0.0 to 1.0)
    pub importance: f32,
    /// Conflict-resolution priority, higher wins
    pub priority: u32,
    /// Whether the merger absorbed markers into this candidate
    pub merged: bool,
    /// Footnote numbers absorbed by the merger
    pub annotation_refs: SmallVec<[u32; 4]>,
    /// Rule keyword that produced the candidate, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

impl Candidate {
    /// Creates a candidate from tokens (sorted here)
    pub fn new(mut tokens: Vec<Token>, kind: CandidateType, importance: f32, priority: u32) -> Self {
        tokens.sort_by_key(|t| (t.start, t.end));
        Self {
            tokens,
            kind,
            importance: importance.clamp(0.0, 1.0),
            priority,
            merged: false,
            annotation_refs: SmallVec::new(),
            keyword: None,
        }
    }

    /// Records the keyword that produced the candidate
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Smallest token start
    pub fn start(&self) -> usize {
        self.tokens.iter().map(|t| t.start).min().unwrap_or(0)
    }

    /// Largest token end
    pub fn end(&self) -> usize {
        self.tokens.iter().map(|t| t.end).max().unwrap_or(0)
    }

    /// Covering span `[min start, max end)`
    pub fn span(&self) -> Span {
        Span::new(self.start(), self.end())
    }

    /// Whether every token is a footnote marker or definition
    pub fn is_annotation_only(&self) -> bool {
        !self.tokens.is_empty() && self.tokens.iter().all(|t| t.kind.is_annotation())
    }

    /// Whether the candidate already owns a token starting at `start`
    pub fn has_token_at(&self, start: usize) -> bool {
        self.tokens.iter().any(|t| t.start == start)
    }
}

// ============================================================================
// Segments
// ============================================================================

/// Output taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentType {
    /// Claim (includes calls to action and disclaimers)
    Claim,
    /// Explanation
    Explanation,
    /// Evidence
    Evidence,
}

impl SegmentType {
    /// Lowercase name used in output formats
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentType::Claim => "claim",
            SegmentType::Explanation => "explanation",
            SegmentType::Evidence => "evidence",
        }
    }
}

impl std::fmt::Display for SegmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of a segment in the original text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Inclusive start byte offset
    pub start: usize,
    /// Exclusive end byte offset
    pub end: usize,
    /// Inclusive start character offset
    pub char_start: usize,
    /// Exclusive end character offset
    pub char_end: usize,
}

/// Final output unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Sequential zero-padded id (`seg_001`, `seg_002`, ...)
    pub id: String,
    /// Exact source substring
    pub text: String,
    /// Output type
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    /// Offsets into the original text
    pub position: Position,
}

impl Segment {
    /// Formats the id for the one-based `index`
    pub fn format_id(index: usize) -> String {
        format!("seg_{index:03}")
    }

    /// Byte span of the segment
    pub fn span(&self) -> Span {
        Span::new(self.position.start, self.position.end)
    }
}
