//! Annotation merge pass
//!
//! A footnote marker written right after a claim belongs to that claim.
//! The merger appends such markers to the candidate in front of them and
//! boosts its priority so the annotated span wins conflicts in assembly.
//! A marker is adjacent only when whitespace alone separates it from the
//! candidate; a marker past other copy belongs to that copy.

use crate::api::{defaults, SegmenterConfig};
use crate::offsets::OffsetMap;
use crate::types::{Candidate, Token, TokenKind};

/// Absorbs trailing footnote markers into candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationMerger {
    max_gap: usize,
    priority_boost: u32,
}

impl Default for AnnotationMerger {
    fn default() -> Self {
        Self::new(defaults::ADJACENCY_GAP, defaults::PRIORITY_BOOST)
    }
}

impl AnnotationMerger {
    /// `max_gap` is measured in characters
    pub fn new(max_gap: usize, priority_boost: u32) -> Self {
        Self {
            max_gap,
            priority_boost,
        }
    }

    pub fn from_config(config: &SegmenterConfig) -> Self {
        Self::new(config.adjacency_gap(), config.priority_boost())
    }

    /// Return merged copies of `candidates`, re-sorted by priority (stable)
    ///
    /// `tokens` is the full token stream of `source`. Only bare markers are
    /// absorbed; definitions never are.
    pub fn merge(
        &self,
        candidates: &[Candidate],
        tokens: &[Token],
        source: &str,
    ) -> Vec<Candidate> {
        let offsets = OffsetMap::new(source);
        let markers: Vec<&Token> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::AnnotationMarker)
            .collect();

        let mut merged: Vec<Candidate> = candidates
            .iter()
            .map(|candidate| self.absorb(candidate, &markers, source, &offsets))
            .collect();
        merged.sort_by(|a, b| b.priority.cmp(&a.priority));

        tracing::debug!(
            candidates = merged.len(),
            merged = merged.iter().filter(|c| c.merged).count(),
            "annotation markers merged"
        );
        merged
    }

    fn absorb(
        &self,
        candidate: &Candidate,
        markers: &[&Token],
        source: &str,
        offsets: &OffsetMap,
    ) -> Candidate {
        let mut result = candidate.clone();
        if candidate.tokens.is_empty() {
            return result;
        }

        let mut end = result.end();
        let first = markers.partition_point(|m| m.start < end);
        for marker in &markers[first..] {
            // Only whitespace may separate a marker from the copy it qualifies
            let adjacent = offsets.char_distance(end, marker.start) <= self.max_gap
                && source[end..marker.start].trim().is_empty();
            if !adjacent {
                break;
            }
            if let Some(number) = marker.annotation_number() {
                result.annotation_refs.push(number);
            }
            result.tokens.push((*marker).clone());
            end = marker.end;
        }

        if result.tokens.len() > candidate.tokens.len() {
            result.tokens.sort_by_key(|t| (t.start, t.end));
            result.merged = true;
            result.priority = result.priority.saturating_add(self.priority_boost);
        }
        result
    }
}

/// Merge with the default gap and boost
pub fn merge(candidates: &[Candidate], tokens: &[Token], source: &str) -> Vec<Candidate> {
    AnnotationMerger::default().merge(candidates, tokens, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::priority;
    use crate::tokenizer::tokenize;
    use crate::types::CandidateType;

    fn candidate_for(tokens: &[Token], text: &str, priority: u32) -> Candidate {
        let token = tokens.iter().find(|t| t.text == text).unwrap().clone();
        Candidate::new(vec![token], CandidateType::Claim, 0.8, priority)
    }

    #[test]
    fn test_adjacent_marker_is_absorbed() {
        let source = "殺菌※2する薬用ジェル";
        let tokens = tokenize(source);
        let keyword = candidate_for(&tokens, "殺菌", priority::KEYWORD);

        let merged = merge(&[keyword], &tokens, source);
        assert_eq!(merged.len(), 1);
        let c = &merged[0];
        assert!(c.merged);
        assert_eq!(c.priority, priority::KEYWORD + defaults::PRIORITY_BOOST);
        assert_eq!(c.annotation_refs.as_slice(), &[2]);
        assert_eq!(&source[c.start()..c.end()], "殺菌※2");
    }

    #[test]
    fn test_chained_markers_are_absorbed_together() {
        let source = "浸透※1※２でうるおう。";
        let tokens = tokenize(source);
        let keyword = candidate_for(&tokens, "浸透", priority::KEYWORD);

        let c = &merge(&[keyword], &tokens, source)[0];
        assert_eq!(c.annotation_refs.as_slice(), &[1, 2]);
        assert_eq!(&source[c.start()..c.end()], "浸透※1※２");
        // Boost is applied once per candidate
        assert_eq!(c.priority, priority::KEYWORD + defaults::PRIORITY_BOOST);
    }

    #[test]
    fn test_distant_marker_is_left_alone() {
        let source = "美白成分をたっぷり配合※1";
        let tokens = tokenize(source);
        let first = Token::new(TokenKind::Text, source, 0, "美白".len(), 1);
        let candidate = Candidate::new(vec![first], CandidateType::Claim, 0.8, 80);

        let c = &merge(&[candidate], &tokens, source)[0];
        assert!(!c.merged);
        assert_eq!(c.priority, 80);
        assert!(c.annotation_refs.is_empty());
    }

    #[test]
    fn test_gap_is_counted_in_characters() {
        // Five full-width spaces between the candidate and the marker
        let source = "保湿\u{3000}\u{3000}\u{3000}\u{3000}\u{3000}※1";
        let tokens = tokenize(source);
        let head = Token::new(TokenKind::Text, source, 0, "保湿".len(), 1);
        let candidate = Candidate::new(vec![head], CandidateType::Claim, 0.8, 80);

        assert!(merge(&[candidate.clone()], &tokens, source)[0].merged);
        let strict = AnnotationMerger::new(4, 5);
        assert!(!strict.merge(&[candidate], &tokens, source)[0].merged);
    }

    #[test]
    fn test_marker_behind_other_copy_is_left_alone() {
        let source = "うるおう。美白※1";
        let tokens = tokenize(source);
        let sentence = Token::new(TokenKind::Sentence, source, 0, "うるおう。".len(), 1);
        let candidate = Candidate::new(vec![sentence], CandidateType::Explanation, 0.5, 15);

        let c = &merge(&[candidate], &tokens, source)[0];
        assert!(!c.merged);
        assert_eq!(c.priority, 15);
        assert_eq!(&source[c.start()..c.end()], "うるおう。");
    }

    #[test]
    fn test_definitions_are_never_absorbed() {
        let source = "保湿\n※1：保湿成分";
        let tokens = tokenize(source);
        let candidate = candidate_for(&tokens, "保湿", 80);

        let c = &merge(&[candidate], &tokens, source)[0];
        assert!(!c.merged);
        assert_eq!(c.tokens.len(), 1);
    }

    #[test]
    fn test_input_is_not_mutated_and_output_is_resorted() {
        let source = "殺菌※1。保湿。";
        let tokens = tokenize(source);
        let low = candidate_for(&tokens, "殺菌", 78);
        let high = candidate_for(&tokens, "保湿。", 80);
        let input = vec![high, low];

        let merged = merge(&input, &tokens, source);
        assert!(!input[1].merged);
        assert_eq!(merged[0].priority, 83);
        assert_eq!(merged[0].keyword, None);
        assert_eq!(merged[1].priority, 80);
    }
}
