//! Generate config command implementation

use adseg_core::rules::embedded_source;
use adseg_core::RuleConfig;
use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Product id; an embedded product is copied, anything else gets a template
    #[arg(short, long, value_name = "PRODUCT", default_value = "custom")]
    pub product: String,

    /// Output file path (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        let table = self.render()?;

        let Some(output) = &self.output else {
            print!("{table}");
            return Ok(());
        };

        fs::write(output, &table)
            .with_context(|| format!("Failed to write to {}", output.display()))?;

        println!("✓ Rule table written to {}", output.display());
        println!();
        println!("Next steps:");
        println!("1. Edit the annotation rules and patterns for your product");
        println!("2. Validate your rule table:");
        println!("   adseg validate --rules {}", output.display());
        println!("3. Use it for processing:");
        println!("   adseg process -i ad.txt --rules {}", output.display());

        Ok(())
    }

    /// Embedded table source, or a serialized template
    fn render(&self) -> Result<String> {
        if let Some(source) = embedded_source(&self.product) {
            return Ok(source.to_string());
        }

        let template = RuleConfig::template(&self.product);
        let body = toml::to_string(&template).context("Failed to serialize rule template")?;
        Ok(format!(
            "# Rule table for {}\n# Generated by adseg generate-config\n\n{body}",
            self.product
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adseg_core::RuleSet;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_product_is_copied() {
        let args = GenerateConfigArgs {
            product: "cosmetics".to_string(),
            output: None,
        };
        assert_eq!(args.render().unwrap(), embedded_source("cosmetics").unwrap());
    }

    #[test]
    fn test_template_is_loadable() {
        let args = GenerateConfigArgs {
            product: "hair_care".to_string(),
            output: None,
        };
        let rules = RuleSet::from_toml_str(&args.render().unwrap()).unwrap();
        assert_eq!(rules.product(), "hair_care");
    }

    #[test]
    fn test_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("hair_care.toml");
        let args = GenerateConfigArgs {
            product: "hair_care".to_string(),
            output: Some(output.clone()),
        };

        args.execute().unwrap();
        assert!(RuleSet::from_file(&output).is_ok());
    }
}
