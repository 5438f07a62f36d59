//! Process command implementation

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use adseg_core::{DebugOutput, Input, Output, Segmenter};
use anyhow::{Context, Result};
use clap::Args;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::output::{Document, JsonFormatter, MarkdownFormatter, OutputFormatter, TextFormatter};
use crate::progress::ProgressReporter;
use crate::rules_source::RulesSource;

/// Arguments for the process command
#[derive(Debug, Args)]
pub struct ProcessArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format [default: text, or the config file's]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Embedded product rule table [default: cosmetics, or the config file's]
    #[arg(short, long, value_name = "PRODUCT", conflicts_with = "rules")]
    pub product: Option<String>,

    /// External rule table (TOML)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Configuration file (default: ./adseg.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Dump tokens, candidates and segments as JSON
    #[arg(long)]
    pub debug: bool,

    /// Segment files in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `id<TAB>type<TAB>text` line per segment
    Text,
    /// JSON array of segments, optionally with metadata
    Json,
    /// Markdown numbered list with type tags
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(CliError::ConfigError(format!(
                "unknown output format '{other}'"
            ))),
        }
    }
}

/// One processed input file
enum Processed {
    Output(Output),
    Debug(Box<DebugOutput>),
}

#[derive(Serialize)]
struct DebugDocument<'a> {
    source: &'a str,
    #[serde(flatten)]
    debug: &'a DebugOutput,
}

impl ProcessArgs {
    /// Execute the process command
    pub fn execute(&self) -> Result<()> {
        self.init_logging();

        log::info!("Starting segmentation");
        log::debug!("Arguments: {:?}", self);

        let config = CliConfig::resolve(self.config.as_deref())?;
        let format = match self.format {
            Some(format) => format,
            None => config.output.default_format.parse()?,
        };

        let source = self.rules_source(&config);
        log::info!("Rule table: {}", source.display_name());
        let segmenter = Segmenter::new(source.load()?);

        let files = resolve_patterns(&self.input)?;
        log::info!("Found {} file(s) to process", files.len());

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(files.len() as u64);

        let results = if self.parallel && files.len() > 1 {
            files
                .par_iter()
                .map(|path| self.process_file(&segmenter, path, &progress))
                .collect::<Result<Vec<_>>>()?
        } else {
            files
                .iter()
                .map(|path| self.process_file(&segmenter, path, &progress))
                .collect::<Result<Vec<_>>>()?
        };
        progress.finish();

        let labels: Vec<String> = files.iter().map(|p| FileReader::label(p)).collect();
        let labelled = files.len() > 1;
        let writer = self.open_writer()?;

        if self.debug {
            return write_debug(writer, &labels, &results, config.output.pretty_json);
        }

        let mut formatter: Box<dyn OutputFormatter> = match format {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => Box::new(
                JsonFormatter::new(writer)
                    .pretty(config.output.pretty_json)
                    .include_metadata(config.output.include_metadata),
            ),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        };

        for (label, result) in labels.iter().zip(&results) {
            if let Processed::Output(output) = result {
                formatter.format_document(&Document {
                    label: labelled.then_some(label.as_str()),
                    output,
                })?;
            }
        }
        formatter.finish()?;

        log::info!("Segmentation completed");
        Ok(())
    }

    fn rules_source(&self, config: &CliConfig) -> RulesSource {
        match (&self.rules, &self.product) {
            (Some(path), _) => RulesSource::External(path.clone()),
            (None, Some(product)) => RulesSource::Embedded(product.clone()),
            (None, None) => RulesSource::Embedded(config.processing.default_product.clone()),
        }
    }

    fn process_file(
        &self,
        segmenter: &Segmenter,
        path: &Path,
        progress: &ProgressReporter,
    ) -> Result<Processed> {
        let text = FileReader::read_text(path)?;
        let processed = if self.debug {
            Processed::Debug(Box::new(segmenter.debug(&text)))
        } else {
            let output = segmenter
                .process(Input::from_text(text))
                .with_context(|| format!("Failed to segment {}", path.display()))?;
            log::debug!(
                "{}: {} segments, coverage {:.3}",
                path.display(),
                output.segments.len(),
                output.metadata.coverage.ratio
            );
            Processed::Output(output)
        };
        progress.file_completed(&FileReader::label(path));
        Ok(processed)
    }

    fn open_writer(&self) -> Result<Box<dyn Write + Send + Sync>> {
        Ok(match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout()),
        })
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // A logger may already be installed when running inside tests
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }
    }
}

fn write_debug(
    mut writer: Box<dyn Write + Send + Sync>,
    labels: &[String],
    results: &[Processed],
    pretty: bool,
) -> Result<()> {
    let documents: Vec<DebugDocument<'_>> = labels
        .iter()
        .zip(results)
        .filter_map(|(label, result)| match result {
            Processed::Debug(debug) => Some(DebugDocument {
                source: label,
                debug,
            }),
            Processed::Output(_) => None,
        })
        .collect();

    let value = match documents.as_slice() {
        [single] => serde_json::to_value(single.debug)?,
        _ => serde_json::to_value(&documents)?,
    };
    if pretty {
        serde_json::to_writer_pretty(&mut writer, &value)?;
    } else {
        serde_json::to_writer(&mut writer, &value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
