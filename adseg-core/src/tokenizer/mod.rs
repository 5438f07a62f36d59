//! Tokenizer: raw text to an ordered stream of typed tokens
//!
//! Extraction runs by descending precedence:
//! 1. structural delimiters (`【...】` headers), never broken afterwards
//! 2. footnote definitions (colon form over colon-less form)
//! 3. bare footnote markers not already claimed
//! 4. gap filling: paragraphs, then sentences or lines
//!
//! The result is sorted by `start`, non-overlapping, and covers every
//! non-whitespace character of the input.

pub mod annotation;
mod gap;
pub mod markers;
mod structural;

pub use annotation::{AnnotationDefinition, AnnotationForm};
pub use structural::DEFAULT_HEADER_PAIRS;

use crate::types::{Span, Token, TokenKind, TokenMetadata};
use markers::{parse_number, MARKER};

/// Priority hint attached to header tokens
const HEADER_PRIORITY_HINT: u32 = 100;

/// Rule-independent lexer for advertising copy
#[derive(Debug, Clone)]
pub struct Tokenizer {
    header_pairs: Vec<(char, char)>,
}

impl Tokenizer {
    /// Tokenizer recognizing the default header brackets
    pub fn new() -> Self {
        Self {
            header_pairs: DEFAULT_HEADER_PAIRS.to_vec(),
        }
    }

    /// Tokenizer recognizing a custom set of header bracket pairs
    pub fn with_header_pairs(pairs: Vec<(char, char)>) -> Self {
        Self {
            header_pairs: pairs,
        }
    }

    /// Split `text` into tokens; never fails, `[]` for empty input
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        if text.is_empty() {
            return Vec::new();
        }

        let lines = LineIndex::new(text);
        let mut claimed: Vec<Token> = Vec::new();

        // 1. Structural delimiters
        let headers = structural::find_headers(text, &self.header_pairs);
        for span in &headers {
            claimed.push(
                Token::new(
                    TokenKind::StructuralDelimiter,
                    text,
                    span.start,
                    span.end,
                    lines.line_of(span.start),
                )
                .with_metadata(TokenMetadata {
                    priority_hint: Some(HEADER_PRIORITY_HINT),
                    ..Default::default()
                }),
            );
        }

        // 2. Footnote definitions
        let definitions = annotation::find_definitions(text, &headers);
        for definition in &definitions {
            claimed.push(annotation_token(
                TokenKind::AnnotationText,
                text,
                definition.span,
                definition.number,
                &lines,
            ));
        }

        // 3. Bare markers outside every claimed span
        let mut blocked: Vec<Span> = headers;
        blocked.extend(definitions.iter().map(|d| d.span));
        blocked.sort();
        for caps in MARKER.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let span = Span::new(whole.start(), whole.end());
            if overlaps_sorted(&blocked, span) || followed_by_colon(text, span.end) {
                continue;
            }
            let Some(number) = parse_number(&caps[1]) else {
                continue;
            };
            claimed.push(annotation_token(
                TokenKind::AnnotationMarker,
                text,
                span,
                number,
                &lines,
            ));
        }

        // 4. Gap filling
        claimed.sort_by_key(|t| t.start);
        let mut tokens = Vec::with_capacity(claimed.len() * 2 + 1);
        let mut cursor = 0;
        for token in claimed {
            self.fill_gap(text, Span::new(cursor, token.start), &lines, &mut tokens);
            cursor = token.end;
            tokens.push(token);
        }
        self.fill_gap(text, Span::new(cursor, text.len()), &lines, &mut tokens);

        tracing::trace!(count = tokens.len(), "tokenized");
        tokens
    }

    fn fill_gap(&self, text: &str, gap: Span, lines: &LineIndex, out: &mut Vec<Token>) {
        if gap.is_empty() {
            return;
        }
        for (span, kind) in gap::split_gap(text, gap) {
            out.push(Token::new(
                kind,
                text,
                span.start,
                span.end,
                lines.line_of(span.start),
            ));
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokenize with the default tokenizer
pub fn tokenize(text: &str) -> Vec<Token> {
    Tokenizer::new().tokenize(text)
}

fn annotation_token(
    kind: TokenKind,
    text: &str,
    span: Span,
    number: u32,
    lines: &LineIndex,
) -> Token {
    Token::new(kind, text, span.start, span.end, lines.line_of(span.start)).with_metadata(
        TokenMetadata {
            annotation_number: Some(number),
            ..Default::default()
        },
    )
}

/// `blocked` must be sorted and non-overlapping
fn overlaps_sorted(blocked: &[Span], span: Span) -> bool {
    let idx = blocked.partition_point(|s| s.end <= span.start);
    blocked.get(idx).is_some_and(|s| s.start < span.end)
}

/// A marker followed by a colon starts a definition
fn followed_by_colon(text: &str, end: usize) -> bool {
    text[end..]
        .chars()
        .find(|c| !matches!(c, ' ' | '\t' | '　'))
        .is_some_and(|c| c == ':' || c == '：')
}

/// Byte offset -> one-based line number
#[derive(Debug)]
struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        Self {
            newlines: text
                .char_indices()
                .filter(|(_, c)| *c == '\n')
                .map(|(i, _)| i)
                .collect(),
        }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&nl| nl < offset) + 1
    }
}
