//! Coverage diagnostic

use serde::{Deserialize, Serialize};

use crate::types::Span;

/// Share of visible source characters that ended up in a segment
///
/// Whitespace and footnote material outside the segments (definitions,
/// unattached markers) are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Counted characters inside some segment
    pub covered_chars: usize,
    /// Counted characters
    pub total_chars: usize,
    /// Visible characters skipped as footnote material
    pub excluded_chars: usize,
    /// `covered_chars / total_chars`, `1.0` when nothing is counted
    pub ratio: f64,
}

impl CoverageReport {
    /// Whether the ratio falls below `threshold` (never for empty input)
    pub fn is_below(&self, threshold: f64) -> bool {
        self.total_chars > 0 && self.ratio < threshold
    }
}

/// Measure coverage; both span lists must be sorted and non-overlapping
pub fn measure(source: &str, segments: &[Span], excluded: &[Span]) -> CoverageReport {
    let mut covered_chars = 0;
    let mut total_chars = 0;
    let mut excluded_chars = 0;

    let mut seg_idx = 0;
    let mut excl_idx = 0;
    for (pos, ch) in source.char_indices() {
        if ch.is_whitespace() {
            continue;
        }
        while excl_idx < excluded.len() && excluded[excl_idx].end <= pos {
            excl_idx += 1;
        }
        if excluded.get(excl_idx).is_some_and(|s| s.start <= pos) {
            excluded_chars += 1;
            continue;
        }

        total_chars += 1;
        while seg_idx < segments.len() && segments[seg_idx].end <= pos {
            seg_idx += 1;
        }
        if segments.get(seg_idx).is_some_and(|s| s.start <= pos) {
            covered_chars += 1;
        }
    }

    let ratio = if total_chars == 0 {
        1.0
    } else {
        covered_chars as f64 / total_chars as f64
    };

    CoverageReport {
        covered_chars,
        total_chars,
        excluded_chars,
        ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_is_fully_covered() {
        let report = measure("", &[], &[]);
        assert_eq!(report.ratio, 1.0);
        assert!(!report.is_below(0.8));

        let report = measure(" \n　", &[], &[]);
        assert_eq!(report.total_chars, 0);
        assert!(!report.is_below(0.8));
    }

    #[test]
    fn test_whitespace_is_not_counted() {
        let source = "ab cd";
        let report = measure(source, &[Span::new(0, 2)], &[]);
        assert_eq!(report.total_chars, 4);
        assert_eq!(report.covered_chars, 2);
        assert_eq!(report.ratio, 0.5);
        assert!(report.is_below(0.8));
    }

    #[test]
    fn test_definitions_are_excluded() {
        let source = "保湿\n※1：成分";
        let def_start = "保湿\n".len();
        let report = measure(
            source,
            &[Span::new(0, "保湿".len())],
            &[Span::new(def_start, source.len())],
        );
        assert_eq!(report.total_chars, 2);
        assert_eq!(report.excluded_chars, 5);
        assert_eq!(report.ratio, 1.0);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let source = "美白ab";
        let report = measure(source, &[Span::new(0, "美白".len())], &[]);
        assert_eq!(report.covered_chars, 2);
        assert_eq!(report.total_chars, 4);
    }
}
