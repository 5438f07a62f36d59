//! Rule table source management for CLI

use std::path::PathBuf;
use std::sync::Arc;

use adseg_core::{get_rules, RuleSet};

use crate::error::{CliError, CliResult};

/// Source of the rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesSource {
    /// Table embedded in the engine, by product id
    Embedded(String),
    /// External TOML table
    External(PathBuf),
}

impl RulesSource {
    /// Get the display name for the rule source
    pub fn display_name(&self) -> String {
        match self {
            RulesSource::Embedded(product) => format!("Embedded: {product}"),
            RulesSource::External(path) => format!("External: {}", path.display()),
        }
    }

    /// Resolve the rule table
    pub fn load(&self) -> CliResult<Arc<RuleSet>> {
        let rules = match self {
            RulesSource::Embedded(product) => get_rules(product),
            RulesSource::External(path) => RuleSet::from_file(path).map(Arc::new),
        };
        rules.map_err(|e| CliError::RulesError(e.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(
            RulesSource::Embedded("cosmetics".to_string()).display_name(),
            "Embedded: cosmetics"
        );
        assert_eq!(
            RulesSource::External(PathBuf::from("rules/hair.toml")).display_name(),
            "External: rules/hair.toml"
        );
    }

    #[test]
    fn test_load_embedded() {
        let rules = RulesSource::Embedded("quasi_drug".to_string()).load().unwrap();
        assert_eq!(rules.product(), "quasi_drug");
    }

    #[test]
    fn test_load_unknown_product() {
        let err = RulesSource::Embedded("shampoo".to_string())
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("shampoo"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = RulesSource::External(PathBuf::from("/nonexistent/rules.toml")).load();
        assert!(result.is_err());
    }
}
