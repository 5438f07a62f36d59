//! Output formatting module

use adseg_core::Output;
use anyhow::Result;

/// One segmented input, as handed to a formatter
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    /// Input label, set when several files are written to one stream
    pub label: Option<&'a str>,
    /// Segmentation result
    pub output: &'a Output,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format one segmented document
    fn format_document(&mut self, document: &Document<'_>) -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;
