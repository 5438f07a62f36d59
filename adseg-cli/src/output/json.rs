//! JSON output formatter

use super::{Document, OutputFormatter};
use adseg_core::{Segment, SegmentationMetadata};
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// JSON formatter
///
/// A single document is written as its array of segments, or as an object
/// with `segments` and `metadata` when metadata is requested. Several
/// documents are written as an array of objects tagged with their `source`.
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    include_metadata: bool,
    documents: Vec<DocumentData>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize)]
pub struct DocumentData {
    /// Input label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Segments in text order
    pub segments: Vec<Segment>,
    /// Processing metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SegmentationMetadata>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pretty: true,
            include_metadata: false,
            documents: Vec::new(),
        }
    }

    /// Toggle pretty printing
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Toggle metadata output
    pub fn include_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    fn write_value<T: Serialize>(&mut self, value: &T) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value)?;
        } else {
            serde_json::to_writer(&mut self.writer, value)?;
        }
        Ok(())
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_document(&mut self, document: &Document<'_>) -> Result<()> {
        self.documents.push(DocumentData {
            source: document.label.map(str::to_string),
            segments: document.output.segments.clone(),
            metadata: self
                .include_metadata
                .then(|| document.output.metadata.clone()),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let documents = std::mem::take(&mut self.documents);
        match documents.as_slice() {
            [single] if single.source.is_none() && single.metadata.is_none() => {
                self.write_value(&single.segments)?
            }
            [single] if single.source.is_none() => self.write_value(single)?,
            _ => self.write_value(&documents)?,
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
