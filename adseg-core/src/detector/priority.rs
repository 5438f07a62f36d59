//! Candidate priorities (higher wins conflicts)

/// Bracket-enclosed headers
pub const STRUCTURAL: u32 = 100;
/// Urgency, scarcity and free-offer phrasing
pub const URGENCY: u32 = 90;
/// Bare price mentions
pub const PRICE: u32 = 85;
/// Mandatory-annotation keywords
pub const KEYWORD: u32 = 80;

/// Fallback: sentence tokens
pub const SENTENCE: u32 = 15;
/// Fallback: stand-alone line tokens
pub const PARAGRAPH: u32 = 12;
/// Fallback: other text fragments
pub const TEXT: u32 = 10;
/// Fallback: footnote definitions
pub const ANNOTATION_TEXT: u32 = 7;
/// Fallback: bare footnote markers
pub const ANNOTATION_MARKER: u32 = 5;
