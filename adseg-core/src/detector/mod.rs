//! Candidate generation
//!
//! Five independent passes propose possibly overlapping, priority-ranked
//! candidates. Each pass appends to the result; none touches another
//! pass's output. The last pass turns every remaining copy token into a
//! low-priority candidate so the assembler can always reach full coverage.

pub mod priority;

use std::collections::HashSet;
use std::sync::Arc;

use crate::rules::RuleSet;
use crate::types::{Candidate, CandidateType, Span, Token, TokenKind};

/// Rule-driven candidate generator
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    rules: Arc<RuleSet>,
}

impl CandidateGenerator {
    /// Create a generator over a resolved rule table
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self { rules }
    }

    /// Rule table in use
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Run every pass over `tokens` of `text`
    pub fn detect(&self, text: &str, tokens: &[Token]) -> Vec<Candidate> {
        detect(text, tokens, &self.rules)
    }
}

/// Run every detection pass; output sorted by descending priority (stable)
pub fn detect(text: &str, tokens: &[Token], rules: &RuleSet) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    structural_pass(tokens, &mut candidates);
    let claimed = urgency_pass(text, tokens, rules, &mut candidates);
    price_pass(text, tokens, rules, &claimed, &mut candidates);
    keyword_pass(text, tokens, rules, &mut candidates);
    fallback_pass(tokens, rules, &mut candidates);

    candidates.sort_by(|a, b| b.priority.cmp(&a.priority));
    tracing::debug!(
        tokens = tokens.len(),
        candidates = candidates.len(),
        "candidates detected"
    );
    candidates
}

/// Tokens whose span intersects `span`
///
/// `tokens` is sorted and disjoint, so the result is a contiguous slice.
pub fn tokens_intersecting(tokens: &[Token], span: Span) -> &[Token] {
    let first = tokens.partition_point(|t| t.end <= span.start);
    let len = tokens[first..]
        .iter()
        .take_while(|t| t.start < span.end)
        .count();
    &tokens[first..first + len]
}

/// Pass 1: one candidate per header
fn structural_pass(tokens: &[Token], out: &mut Vec<Candidate>) {
    out.extend(
        tokens
            .iter()
            .filter(|t| t.kind == TokenKind::StructuralDelimiter)
            .map(|t| {
                Candidate::new(
                    vec![t.clone()],
                    CandidateType::Claim,
                    1.0,
                    priority::STRUCTURAL,
                )
            }),
    );
}

/// Pass 2: urgency/offer phrasing; returns the starts of claimed tokens
fn urgency_pass(
    text: &str,
    tokens: &[Token],
    rules: &RuleSet,
    out: &mut Vec<Candidate>,
) -> HashSet<usize> {
    let mut claimed = HashSet::new();
    let mut seen_spans = HashSet::new();

    for hit in rules.urgency_matches(text) {
        let covered = tokens_intersecting(tokens, hit.span);
        let Some(span) = covering_span(covered) else {
            continue;
        };
        claimed.extend(covered.iter().map(|t| t.start));
        if seen_spans.insert(span) {
            tracing::trace!(pattern = hit.name, start = span.start, "urgency match");
            out.push(Candidate::new(
                covered.to_vec(),
                CandidateType::Cta,
                0.9,
                priority::URGENCY,
            ));
        }
    }

    claimed
}

/// Pass 3: price mentions not already claimed by pass 2
fn price_pass(
    text: &str,
    tokens: &[Token],
    rules: &RuleSet,
    claimed: &HashSet<usize>,
    out: &mut Vec<Candidate>,
) {
    let mut seen_spans = HashSet::new();

    for hit in rules.price_matches(text) {
        let covered = tokens_intersecting(tokens, hit.span);
        if covered.iter().any(|t| claimed.contains(&t.start)) {
            continue;
        }
        let Some(span) = covering_span(covered) else {
            continue;
        };
        if seen_spans.insert(span) {
            out.push(Candidate::new(
                covered.to_vec(),
                CandidateType::Cta,
                0.85,
                priority::PRICE,
            ));
        }
    }
}

/// Pass 4: keywords that require an annotation
fn keyword_pass(text: &str, tokens: &[Token], rules: &RuleSet, out: &mut Vec<Candidate>) {
    let mut seen = HashSet::new();

    for hit in rules.keyword_matches(text) {
        let covered = tokens_intersecting(tokens, hit.span);
        let Some(span) = covering_span(covered) else {
            continue;
        };
        if !seen.insert((span, hit.name)) {
            continue;
        }
        let tagged = covered
            .iter()
            .map(|t| t.tagged_with_keyword(hit.name))
            .collect();
        out.push(
            Candidate::new(tagged, CandidateType::Claim, 0.8, priority::KEYWORD)
                .with_keyword(hit.name),
        );
    }
}

/// Pass 5: every copy or footnote token becomes its own candidate
fn fallback_pass(tokens: &[Token], rules: &RuleSet, out: &mut Vec<Candidate>) {
    for token in tokens {
        if token.text.trim().is_empty() {
            continue;
        }
        let (kind, importance, priority) = match token.kind {
            TokenKind::StructuralDelimiter => continue,
            TokenKind::Sentence => (copy_type(token, rules), 0.5, priority::SENTENCE),
            TokenKind::Paragraph => (copy_type(token, rules), 0.45, priority::PARAGRAPH),
            TokenKind::Text => (copy_type(token, rules), 0.4, priority::TEXT),
            TokenKind::AnnotationText => {
                (CandidateType::Disclaimer, 0.2, priority::ANNOTATION_TEXT)
            }
            TokenKind::AnnotationMarker => {
                (CandidateType::Disclaimer, 0.1, priority::ANNOTATION_MARKER)
            }
        };
        out.push(Candidate::new(vec![token.clone()], kind, importance, priority));
    }
}

fn copy_type(token: &Token, rules: &RuleSet) -> CandidateType {
    if rules.is_evidence(&token.text) {
        CandidateType::Evidence
    } else {
        CandidateType::Explanation
    }
}

fn covering_span(tokens: &[Token]) -> Option<Span> {
    let first = tokens.first()?;
    let last = tokens.last()?;
    Some(Span::new(first.start, last.end))
}
