//! Bracket-enclosed header detection

use crate::types::Span;

/// Default header bracket pairs
pub const DEFAULT_HEADER_PAIRS: &[(char, char)] = &[('【', '】'), ('〖', '〗')];

/// Find header spans such as `【美白効果】`
///
/// A header opens and closes on the same line, contains at least one
/// character and does not contain another opener of the same pair.
pub(crate) fn find_headers(text: &str, pairs: &[(char, char)]) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut iter = text.char_indices().peekable();

    while let Some((open_pos, ch)) = iter.next() {
        let Some(&(open, close)) = pairs.iter().find(|(o, _)| *o == ch) else {
            continue;
        };

        let body_start = open_pos + open.len_utf8();
        let mut close_end = None;
        for (pos, c) in text[body_start..].char_indices() {
            if c == '\n' || c == open {
                break;
            }
            if c == close {
                if pos > 0 {
                    close_end = Some(body_start + pos + close.len_utf8());
                }
                break;
            }
        }

        if let Some(end) = close_end {
            spans.push(Span::new(open_pos, end));
            // Resume scanning after the closing bracket
            while iter.peek().is_some_and(|&(pos, _)| pos < end) {
                iter.next();
            }
        }
    }

    spans
}
