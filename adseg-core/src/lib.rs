//! Deterministic rule-based segmentation of Japanese advertising copy
//!
//! This crate splits a raw advertisement (cosmetics and quasi-drug copy) into
//! ordered, non-overlapping, typed segments that can each be checked against
//! regulatory rules on their own. Nothing is inferred statistically: every
//! boundary comes from a lexical rule or from the product's rule table.
//!
//! # Pipeline
//!
//! - **Tokenizer**: raw text to ordered tokens (headers, footnote markers and
//!   definitions, sentences, lines)
//! - **Detector**: five passes propose overlapping, priority-ranked
//!   candidates (headers, urgency offers, prices, annotated keywords, and a
//!   catch-all)
//! - **Merger**: footnote markers right after a candidate are absorbed into it
//! - **Assembler**: conflict resolution, slicing, fragment remerge, coverage
//!   check and id assignment
//!
//! # Example
//!
//! ```rust
//! use adseg_core::{Input, Segmenter};
//!
//! let segmenter = Segmenter::for_product("quasi_drug").unwrap();
//!
//! let segments = segmenter.segment("殺菌※2する薬用ジェル\n※2：有効成分IPMPによる");
//! assert_eq!(segments.len(), 1);
//! assert_eq!(segments[0].text, "殺菌※2する薬用ジェル");
//! assert_eq!(segments[0].id, "seg_001");
//!
//! let output = segmenter.process(Input::from_text("今なら送料無料！")).unwrap();
//! assert_eq!(output.metadata.stats.segment_count, 1);
//! ```

pub mod api;
pub mod assembler;
pub mod detector;
pub mod error;
pub mod merger;
pub mod offsets;
pub mod rules;
pub mod tokenizer;
pub mod types;

pub use api::{
    ConfigBuilder, DebugOutput, Input, Output, SegmentationMetadata, SegmentationStats,
    Segmenter, SegmenterConfig,
};
pub use assembler::{build, CoverageReport, SegmentAssembler};
pub use detector::{detect, CandidateGenerator};
pub use error::{Error, Result, RuleError, RuleResult};
pub use merger::{merge, AnnotationMerger};
pub use rules::{available_products, get_rules, RuleConfig, RuleSet};
pub use tokenizer::{tokenize, Tokenizer};
pub use types::{
    Candidate, CandidateType, Position, Segment, SegmentType, Span, Token, TokenKind,
    TokenMetadata,
};
