//! Footnote definition recognizers
//!
//! Two independent recognizers feed one annotation index:
//! - colon form: `※1：text` (or `※1:text`), running to the end of the line
//! - colon-less form: `※1 text` at the start of a line, running to the next
//!   marker or the end of the line
//!
//! Colon-form matches win every overlap with colon-less matches.

use std::sync::LazyLock;

use regex::Regex;

use super::markers::parse_number;
use crate::types::Span;

static COLON_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[※＊*]([0-9０-９]+)[ \t　]*[:：][^\n]*").expect("colon form pattern is valid")
});

static LINE_START_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t　]*(?P<body>[※＊*](?P<num>[0-9０-９]+)[^\n※＊*0-9０-９][^\n※＊*]*)")
        .expect("line-start form pattern is valid")
});

/// Which recognizer produced a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnnotationForm {
    /// `marker + colon + text`
    Colon,
    /// `marker + text` at line start
    LineStart,
}

/// A recognized footnote definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationDefinition {
    /// Trimmed span of the definition
    pub span: Span,
    /// Footnote number
    pub number: u32,
    /// Recognizer that produced it
    pub form: AnnotationForm,
}

/// Colon-form definitions
fn colon_form(text: &str) -> Vec<AnnotationDefinition> {
    COLON_FORM
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = parse_number(&caps[1])?;
            let end = whole.start() + whole.as_str().trim_end().len();
            Some(AnnotationDefinition {
                span: Span::new(whole.start(), end),
                number,
                form: AnnotationForm::Colon,
            })
        })
        .collect()
}

/// Colon-less definitions at line start
fn line_start_form(text: &str) -> Vec<AnnotationDefinition> {
    LINE_START_FORM
        .captures_iter(text)
        .filter_map(|caps| {
            let body = caps.name("body")?;
            let num = caps.name("num")?;
            let number = parse_number(num.as_str())?;

            let end = body.start() + body.as_str().trim_end().len();
            // A lone marker at line start is a reference, not a definition
            if end <= num.end() {
                return None;
            }
            Some(AnnotationDefinition {
                span: Span::new(body.start(), end),
                number,
                form: AnnotationForm::LineStart,
            })
        })
        .collect()
}

/// Merge both recognizers into one offset-sorted, non-overlapping index
///
/// Definitions overlapping any span in `blocked` are discarded; colon-form
/// definitions are admitted before line-start ones so they win ties.
pub(crate) fn find_definitions(text: &str, blocked: &[Span]) -> Vec<AnnotationDefinition> {
    let mut candidates = colon_form(text);
    candidates.extend(line_start_form(text));
    // Stable: recognizer order first, then text order
    candidates.sort_by_key(|d| d.form);

    let mut accepted: Vec<AnnotationDefinition> = Vec::with_capacity(candidates.len());
    for definition in candidates {
        let clashes = blocked.iter().any(|s| s.intersects(&definition.span))
            || accepted.iter().any(|a| a.span.intersects(&definition.span));
        if !clashes {
            accepted.push(definition);
        }
    }

    accepted.sort_by_key(|d| d.span.start);
    accepted
}
