//! adseg command-line entry point

use adseg_cli::commands::Commands;
use anyhow::Result;
use clap::Parser;

/// Rule-based segmentation of Japanese advertising copy
#[derive(Debug, Parser)]
#[command(name = "adseg", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_process_command() {
        let cli = Cli::try_parse_from(["adseg", "process", "-i", "ad.txt", "-p", "quasi_drug"])
            .unwrap();
        match cli.command {
            Commands::Process(args) => {
                assert_eq!(args.input, vec!["ad.txt".to_string()]);
                assert_eq!(args.product.as_deref(), Some("quasi_drug"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_product_and_rules_conflict() {
        let result = Cli::try_parse_from([
            "adseg", "process", "-i", "ad.txt", "-p", "cosmetics", "--rules", "r.toml",
        ]);
        assert!(result.is_err());
    }
}
