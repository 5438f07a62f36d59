//! CLI command implementations

use adseg_core::available_products;
use anyhow::Result;
use clap::{Subcommand, ValueEnum};

pub mod generate_config;
pub mod process;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Segment advertising copy into typed segments
    Process(process::ProcessArgs),

    /// Validate a rule table file
    Validate(validate::ValidateArgs),

    /// Write a rule table template (or a copy of an embedded table)
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List embedded product rule tables
    Products,

    /// List available output formats
    Formats,
}

impl Commands {
    /// Execute the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Process(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::List { subcommand } => {
                for line in subcommand.lines()? {
                    println!("{line}");
                }
                Ok(())
            }
        }
    }
}

impl ListCommands {
    fn lines(&self) -> Result<Vec<String>> {
        match self {
            ListCommands::Products => available_products()
                .into_iter()
                .map(|product| -> Result<String> {
                    let rules = adseg_core::get_rules(product)?;
                    Ok(format!("{product}\t{}", rules.name()))
                })
                .collect(),
            ListCommands::Formats => Ok(process::OutputFormat::value_variants()
                .iter()
                .filter_map(|format| format.to_possible_value())
                .map(|value| match value.get_help() {
                    Some(help) => format!("{}\t{help}", value.get_name()),
                    None => value.get_name().to_string(),
                })
                .collect()),
        }
    }
}
