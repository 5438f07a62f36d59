//! Fragment remerge
//!
//! A marker splits its line into tokens, so text continuing after an
//! absorbed marker (`殺菌※2` + `する薬用ジェル`) comes out as a separate short
//! fragment. Such a fragment is folded back into the segment before it.

use super::Draft;
use crate::offsets::OffsetMap;
use crate::tokenizer::markers::ends_with_marker;
use crate::types::Span;

/// Merge short fragments into a preceding marker-terminated draft
///
/// `drafts` must be sorted by start and disjoint. Chains merge left to right.
/// Header drafts are never folded into the segment before them.
pub(crate) fn remerge(
    drafts: Vec<Draft>,
    source: &str,
    offsets: &OffsetMap,
    max_gap: usize,
    max_fragment: usize,
) -> Vec<Draft> {
    let mut out: Vec<Draft> = Vec::with_capacity(drafts.len());

    for draft in drafts {
        if let Some(prev) = out.last_mut() {
            let joins = !draft.structural
                && ends_with_marker(&source[prev.span.start..prev.span.end])
                && offsets.char_distance(draft.span.start, draft.span.end) <= max_fragment
                && offsets.char_distance(prev.span.end, draft.span.start) <= max_gap;
            if joins {
                prev.span = Span::new(prev.span.start, draft.span.end);
                continue;
            }
        }
        out.push(draft);
    }

    out
}
