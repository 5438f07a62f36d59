//! Gap filling between claimed tokens
//!
//! Text not claimed by headers or footnotes is split first on blank-line
//! paragraph boundaries, then on sentence-terminal punctuation or newlines.
//! Terminal punctuation stays with the sentence it ends.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Span, TokenKind};

/// One or more blank lines
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t　\r]*\n)+").expect("paragraph pattern is valid"));

/// Sentence-terminal punctuation
#[inline]
pub(crate) fn is_terminal(ch: char) -> bool {
    matches!(ch, '。' | '！' | '？' | '!' | '?')
}

/// Closing marks that stay attached to a preceding terminal
#[inline]
fn is_closing(ch: char) -> bool {
    matches!(ch, '」' | '』' | '）' | ')' | '】' | '〗' | '"' | '\'' | '”' | '’')
}

/// Split `span` of `text` into trimmed, non-empty pieces with their kind
pub(crate) fn split_gap(text: &str, span: Span) -> Vec<(Span, TokenKind)> {
    let mut pieces = Vec::new();
    let region = &text[span.start..span.end];

    let mut paragraph_start = 0;
    for brk in PARAGRAPH_BREAK.find_iter(region) {
        split_paragraph(
            text,
            span.start + paragraph_start,
            span.start + brk.start(),
            &mut pieces,
        );
        paragraph_start = brk.end();
    }
    split_paragraph(text, span.start + paragraph_start, span.end, &mut pieces);

    pieces
}

/// Split one paragraph into sentences and line fragments
fn split_paragraph(text: &str, start: usize, end: usize, out: &mut Vec<(Span, TokenKind)>) {
    let paragraph = &text[start..end];
    let mut piece_start = 0;
    let mut chars = paragraph.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        if ch == '\n' {
            push_piece(text, start + piece_start, start + pos, out);
            piece_start = pos + 1;
        } else if is_terminal(ch) {
            // Absorb runs like "！？" and trailing closing marks
            let mut piece_end = pos + ch.len_utf8();
            while let Some(&(next_pos, next)) = chars.peek() {
                if is_terminal(next) || is_closing(next) {
                    piece_end = next_pos + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            push_piece(text, start + piece_start, start + piece_end, out);
            piece_start = piece_end;
        }
    }
    push_piece(text, start + piece_start, end, out);
}

/// Trim whitespace, classify and record a piece
fn push_piece(text: &str, start: usize, end: usize, out: &mut Vec<(Span, TokenKind)>) {
    let raw = &text[start..end];
    let trimmed_start = start + (raw.len() - raw.trim_start().len());
    let trimmed_end = start + raw.trim_end().len();
    if trimmed_start >= trimmed_end {
        return;
    }

    let span = Span::new(trimmed_start, trimmed_end);
    out.push((span, classify(text, span)));
}

/// Sentence if it ends with terminal punctuation, paragraph if it occupies
/// whole line(s) on its own, text otherwise
fn classify(text: &str, span: Span) -> TokenKind {
    let piece = &text[span.start..span.end];
    let last_meaningful = piece.chars().rev().find(|c| !is_closing(*c));
    if last_meaningful.is_some_and(is_terminal) {
        return TokenKind::Sentence;
    }

    let line_begins_here = text[..span.start]
        .chars()
        .rev()
        .find(|c| !matches!(c, ' ' | '\t' | '　'))
        .map_or(true, |c| c == '\n');
    let line_ends_here = text[span.end..]
        .chars()
        .find(|c| !matches!(c, ' ' | '\t' | '　' | '\r'))
        .map_or(true, |c| c == '\n');

    if line_begins_here && line_ends_here {
        TokenKind::Paragraph
    } else {
        TokenKind::Text
    }
}
