//! Markdown output formatter

use super::{Document, OutputFormatter};
use anyhow::Result;
use std::io::Write;

/// Markdown formatter - outputs segments as a numbered list tagged with types
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    segment_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            segment_count: 0,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_document(&mut self, document: &Document<'_>) -> Result<()> {
        if let Some(label) = document.label {
            if self.segment_count > 0 {
                writeln!(self.writer)?;
            }
            writeln!(self.writer, "## {label}")?;
            writeln!(self.writer)?;
        }

        for (index, segment) in document.output.segments.iter().enumerate() {
            writeln!(
                self.writer,
                "{}. **[{}]** {}",
                index + 1,
                segment.segment_type,
                segment.text.replace('\n', " ")
            )?;
        }
        self.segment_count += document.output.segments.len();
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total segments: {}*", self.segment_count)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample_output;

    #[test]
    fn test_numbered_list_with_footer() {
        let output = sample_output();
        let mut buffer = Vec::new();
        {
            let mut formatter = MarkdownFormatter::new(&mut buffer);
            formatter
                .format_document(&Document {
                    label: None,
                    output: &output,
                })
                .unwrap();
            formatter.finish().unwrap();
        }

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("1. **[claim]** 【医薬部外品】\n"));
        assert!(text.contains("---"));
        assert!(text.ends_with(&format!(
            "*Total segments: {}*\n",
            output.segments.len()
        )));
    }

    #[test]
    fn test_empty_output_still_has_footer() {
        let mut output = sample_output();
        output.segments.clear();
        let mut buffer = Vec::new();
        {
            let mut formatter = MarkdownFormatter::new(&mut buffer);
            formatter
                .format_document(&Document {
                    label: None,
                    output: &output,
                })
                .unwrap();
            formatter.finish().unwrap();
        }

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "\n---\n*Total segments: 0*\n"
        );
    }
}
