//! Plain text output formatter

use super::{Document, OutputFormatter};
use anyhow::Result;
use std::io::{self, Write};

/// Plain text formatter - outputs one `id<TAB>type<TAB>text` line per segment
pub struct TextFormatter<W: Write> {
    writer: W,
    documents: usize,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            documents: 0,
        }
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

/// Keeps one segment per line when a segment spans line breaks
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_document(&mut self, document: &Document<'_>) -> Result<()> {
        if let Some(label) = document.label {
            if self.documents > 0 {
                writeln!(self.writer)?;
            }
            writeln!(self.writer, "# {label}")?;
        }
        self.documents += 1;

        for segment in &document.output.segments {
            writeln!(
                self.writer,
                "{}\t{}\t{}",
                segment.id,
                segment.segment_type,
                escape(&segment.text)
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample_output;

    #[test]
    fn test_one_line_per_segment() {
        let output = sample_output();
        let mut buffer = Vec::new();
        {
            let mut formatter = TextFormatter::new(&mut buffer);
            formatter
                .format_document(&Document {
                    label: None,
                    output: &output,
                })
                .unwrap();
            formatter.finish().unwrap();
        }

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), output.segments.len());
        assert_eq!(lines[0], "seg_001\tclaim\t【医薬部外品】");
        assert!(lines.iter().any(|l| l.ends_with("\t殺菌※1する薬用ジェル")));
    }

    #[test]
    fn test_labels_separate_documents() {
        let output = sample_output();
        let mut buffer = Vec::new();
        {
            let mut formatter = TextFormatter::new(&mut buffer);
            for label in ["a.txt", "b.txt"] {
                formatter
                    .format_document(&Document {
                        label: Some(label),
                        output: &output,
                    })
                    .unwrap();
            }
            formatter.finish().unwrap();
        }

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("# a.txt\nseg_001\t"));
        assert!(text.contains("\n\n# b.txt\nseg_001\t"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("保湿\n成分"), "保湿\\n成分");
        assert_eq!(escape("a\tb\\c"), "a\\tb\\\\c");
        assert_eq!(escape("そのまま"), "そのまま");
    }
}
