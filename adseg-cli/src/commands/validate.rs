//! Validate command implementation

use adseg_core::RuleSet;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the rule table to validate
    #[arg(short = 'r', long, value_name = "FILE", required = true)]
    pub rules: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating rule table: {}", self.rules.display());

        match RuleSet::from_file(&self.rules) {
            Ok(rules) => {
                println!("✓ Rule table is valid!");
                print!("{}", summary(&rules));
                Ok(())
            }
            Err(e) => {
                println!("✗ Rule table is invalid!");
                println!("  Error: {e}");
                Err(anyhow::anyhow!("Validation failed: {}", e))
            }
        }
    }
}

fn summary(rules: &RuleSet) -> String {
    format!(
        "  Product: {}\n  Name: {}\n  Version: {}\n  Annotation rules: {}\n  \
         Urgency patterns: {}\n  Price patterns: {}\n  Evidence cues: {}\n  \
         Prohibitions: {}\n",
        rules.product(),
        rules.name(),
        rules.version(),
        rules.annotation_rules().len(),
        rules.urgency_patterns().len(),
        rules.price_patterns().len(),
        rules.evidence_cue_count(),
        rules.prohibitions().len(),
    )
}
