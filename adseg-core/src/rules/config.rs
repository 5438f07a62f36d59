//! Rule table schema
//!
//! This module defines the TOML schema for per-product rule tables.

use serde::{Deserialize, Serialize};

use crate::error::{RuleError, RuleResult};

/// Root rule table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub metadata: Metadata,
    #[serde(default)]
    pub annotation_rules: Vec<AnnotationRuleConfig>,
    #[serde(default)]
    pub urgency: PatternGroup,
    #[serde(default)]
    pub price: PatternGroup,
    #[serde(default)]
    pub evidence: EvidenceConfig,
    #[serde(default)]
    pub prohibitions: Prohibitions,
}

/// Table metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Product identifier used for lookup
    pub product: String,
    /// Human-readable name
    pub name: String,
    /// Data version of the table
    #[serde(default)]
    pub version: String,
}

/// Keyword that must be accompanied by an annotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationRuleConfig {
    pub keyword: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Regex that matches when the required annotation is present
    pub annotation_pattern: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    #[default]
    Medium,
    Low,
}

/// Named regex patterns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternGroup {
    #[serde(default)]
    pub patterns: Vec<NamedPatternConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedPatternConfig {
    pub name: String,
    pub pattern: String,
}

/// Surface cues that mark a fallback sentence as evidence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvidenceConfig {
    #[serde(default)]
    pub cues: Vec<String>,
}

/// Prohibited expression catalogs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prohibitions {
    /// Allowed only in certain contexts
    #[serde(default)]
    pub context_dependent: Vec<ProhibitedKeyword>,
    /// Never allowed
    #[serde(default)]
    pub absolute: Vec<ProhibitedKeyword>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProhibitedKeyword {
    pub keyword: String,
    #[serde(default)]
    pub reason: String,
}

impl RuleConfig {
    /// Parse a rule table from TOML
    pub fn from_toml_str(toml_str: &str) -> RuleResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Validate structural constraints (patterns are checked when compiled)
    pub(crate) fn validate(&self) -> RuleResult<()> {
        if self.metadata.product.trim().is_empty() {
            return Err(RuleError::MissingMetadata { field: "product" });
        }
        if self.metadata.name.trim().is_empty() {
            return Err(RuleError::MissingMetadata { field: "name" });
        }

        if self.annotation_rules.is_empty() {
            return Err(RuleError::EmptyAnnotationRules {
                product: self.metadata.product.clone(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for (index, rule) in self.annotation_rules.iter().enumerate() {
            for keyword in std::iter::once(&rule.keyword).chain(&rule.aliases) {
                if keyword.trim().is_empty() {
                    return Err(RuleError::EmptyKeyword { index });
                }
                if !seen.insert(keyword.as_str()) {
                    return Err(RuleError::DuplicateKeyword {
                        keyword: keyword.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Template table used by `generate-config`
    pub fn template(product: &str) -> Self {
        Self {
            metadata: Metadata {
                product: product.to_string(),
                name: "Product name".to_string(),
                version: "1".to_string(),
            },
            annotation_rules: vec![AnnotationRuleConfig {
                keyword: "浸透".to_string(),
                aliases: vec!["浸透力".to_string()],
                annotation_pattern: "角質層".to_string(),
                severity: Severity::High,
                examples: vec!["角質層まで浸透※1".to_string()],
            }],
            urgency: PatternGroup {
                patterns: vec![NamedPatternConfig {
                    name: "limited_time_price".to_string(),
                    pattern: "(?:今なら|いまなら)[^。！？\\n]{0,40}[0-9０-９][0-9０-９,，]*円"
                        .to_string(),
                }],
            },
            price: PatternGroup {
                patterns: vec![NamedPatternConfig {
                    name: "yen".to_string(),
                    pattern: "[0-9０-９][0-9０-９,，]*円".to_string(),
                }],
            },
            evidence: EvidenceConfig {
                cues: vec!["[0-9０-９.]+[%％]".to_string(), "試験".to_string()],
            },
            prohibitions: Prohibitions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[metadata]
product = "test"
name = "Test product"

[[annotation_rules]]
keyword = "殺菌"
annotation_pattern = "殺菌成分"
"#;

    #[test]
    fn test_minimal_table_parses_with_defaults() {
        let config = RuleConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(config.metadata.product, "test");
        assert_eq!(config.metadata.version, "");
        assert_eq!(config.annotation_rules[0].severity, Severity::Medium);
        assert!(config.urgency.patterns.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_annotation_rules_is_fatal() {
        let toml_str = r#"
[metadata]
product = "empty"
name = "Empty"
"#;
        let config = RuleConfig::from_toml_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(RuleError::EmptyAnnotationRules { .. })
        ));
    }

    #[test]
    fn test_duplicate_alias_is_rejected() {
        let toml_str = r#"
[metadata]
product = "dup"
name = "Dup"

[[annotation_rules]]
keyword = "美白"
annotation_pattern = "メラニン"

[[annotation_rules]]
keyword = "ホワイトニング"
aliases = ["美白"]
annotation_pattern = "メラニン"
"#;
        let config = RuleConfig::from_toml_str(toml_str).unwrap();
        match config.validate() {
            Err(RuleError::DuplicateKeyword { keyword }) => assert_eq!(keyword, "美白"),
            other => panic!("expected duplicate keyword error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_product_is_rejected() {
        let mut config = RuleConfig::from_toml_str(MINIMAL).unwrap();
        config.metadata.product = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(RuleError::MissingMetadata { field: "product" })
        ));
    }

    #[test]
    fn test_template_round_trips_through_toml() {
        let template = RuleConfig::template("sample");
        let text = toml::to_string_pretty(&template).unwrap();
        let parsed = RuleConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed.metadata.product, "sample");
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_reports_parse_error() {
        assert!(matches!(
            RuleConfig::from_toml_str("[metadata\nproduct ="),
            Err(RuleError::Parse(_))
        ));
    }
}
