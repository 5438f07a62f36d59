//! Public processing API
//!
//! [`Segmenter`] wires the tokenizer, detector, merger and assembler behind
//! one handle. It accepts text, bytes, files or readers through [`Input`]
//! and returns segments plus metadata through [`Output`].

mod config;
mod input;
mod output;
mod segmenter;

#[cfg(test)]
mod tests;

pub use crate::error::{Error, Result};
pub use config::{defaults, ConfigBuilder, SegmenterConfig};
pub use input::Input;
pub use output::{DebugOutput, Output, SegmentationMetadata, SegmentationStats};
pub use segmenter::Segmenter;
