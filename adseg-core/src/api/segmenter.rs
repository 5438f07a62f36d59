//! Segmenter: the full pipeline behind one handle

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::api::{
    DebugOutput, Error, Input, Output, SegmentationMetadata, SegmentationStats, SegmenterConfig,
};
use crate::assembler::{Assembly, SegmentAssembler};
use crate::detector;
use crate::merger::AnnotationMerger;
use crate::rules::{get_rules, RuleSet};
use crate::tokenizer::Tokenizer;
use crate::types::{Candidate, Segment, Token};

/// Rule-based segmenter for advertising copy
///
/// Holds a resolved rule table and tuning; every call is pure, so one
/// segmenter can be shared across threads.
#[derive(Debug, Clone)]
pub struct Segmenter {
    rules: Arc<RuleSet>,
    config: SegmenterConfig,
    tokenizer: Tokenizer,
    merger: AnnotationMerger,
    assembler: SegmentAssembler,
}

/// Every intermediate value of one run
struct Run {
    tokens: Vec<Token>,
    candidates: Vec<Candidate>,
    assembly: Assembly,
}

impl Segmenter {
    /// Create a segmenter with the default configuration
    pub fn new(rules: Arc<RuleSet>) -> Self {
        let config = SegmenterConfig::default();
        Self {
            rules,
            tokenizer: Tokenizer::new(),
            merger: AnnotationMerger::from_config(&config),
            assembler: SegmentAssembler::new(config.clone()),
            config,
        }
    }

    /// Create a segmenter with custom configuration
    pub fn with_config(rules: Arc<RuleSet>, config: SegmenterConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            rules,
            tokenizer: Tokenizer::new(),
            merger: AnnotationMerger::from_config(&config),
            assembler: SegmentAssembler::new(config.clone()),
            config,
        })
    }

    /// Create a segmenter for an embedded product table
    pub fn for_product(product: &str) -> Result<Self, Error> {
        Ok(Self::new(get_rules(product)?))
    }

    /// Create a segmenter from a rule table file
    pub fn from_rules_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::new(Arc::new(RuleSet::from_file(path)?)))
    }

    /// Rule table in use
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Get the current configuration
    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Segment `text`; never fails, `[]` for empty input
    pub fn segment(&self, text: &str) -> Vec<Segment> {
        self.run(text).assembly.segments
    }

    /// Segment any input and attach processing metadata
    pub fn process(&self, input: Input) -> Result<Output, Error> {
        let start = Instant::now();

        let text = input.into_text()?;
        let Run {
            tokens,
            candidates,
            assembly,
        } = self.run(&text);

        let duration = start.elapsed();
        let segments = assembly.segments;
        let stats = SegmentationStats {
            bytes_processed: text.len(),
            chars_processed: text.chars().count(),
            token_count: tokens.len(),
            candidate_count: candidates.len(),
            merged_count: candidates.iter().filter(|c| c.merged).count(),
            segment_count: segments.len(),
            by_type: SegmentationStats::count_types(&segments),
        };

        Ok(Output {
            segments,
            metadata: SegmentationMetadata {
                product: self.rules.product().to_string(),
                duration,
                coverage: assembly.coverage,
                stats,
            },
        })
    }

    /// Segment `text` and keep the intermediate tokens and candidates
    pub fn debug(&self, text: &str) -> DebugOutput {
        let Run {
            tokens,
            candidates,
            assembly,
        } = self.run(text);

        DebugOutput {
            tokens,
            candidates,
            segments: assembly.segments,
            coverage: assembly.coverage,
        }
    }

    fn run(&self, text: &str) -> Run {
        let tokens = self.tokenizer.tokenize(text);
        let detected = detector::detect(text, &tokens, &self.rules);
        let candidates = self.merger.merge(&detected, &tokens, text);
        let assembly = self.assembler.assemble(&candidates, text);

        tracing::debug!(
            product = self.rules.product(),
            tokens = tokens.len(),
            candidates = candidates.len(),
            segments = assembly.segments.len(),
            "segmentation finished"
        );

        Run {
            tokens,
            candidates,
            assembly,
        }
    }
}
