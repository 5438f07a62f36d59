//! Footnote marker surface forms
//!
//! A marker is `※`, `＊` or `*` followed by ASCII or full-width digits.
//! Every marker-aware pattern in the crate uses the same glyph class.

use std::sync::LazyLock;

use regex::Regex;

/// Bare marker anywhere in the text; group 1 is the number
pub(crate) static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[※＊*]([0-9０-９]+)").expect("marker pattern is valid"));

/// Marker at the very end of a string (fragment remerge check)
pub(crate) static TRAILING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[※＊*][0-9０-９]+$").expect("marker pattern is valid"));

/// Parse a marker number written in ASCII or full-width digits
pub fn parse_number(digits: &str) -> Option<u32> {
    let mut value: u32 = 0;
    let mut seen = false;
    for ch in digits.chars() {
        let digit = match ch {
            '0'..='9' => ch as u32 - '0' as u32,
            '０'..='９' => ch as u32 - '０' as u32,
            _ => return None,
        };
        value = value.checked_mul(10)?.checked_add(digit)?;
        seen = true;
    }
    seen.then_some(value)
}

/// Whether `text` ends with a bare footnote marker
pub fn ends_with_marker(text: &str) -> bool {
    TRAILING_MARKER.is_match(text)
}
