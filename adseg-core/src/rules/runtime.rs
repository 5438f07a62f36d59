//! Compiled, immutable rule tables
//!
//! This module bridges the TOML schema and the detector: every pattern is
//! compiled once when the table is built, so detection never touches
//! configuration or performs I/O.

use std::collections::HashMap;
use std::path::Path;

use regex::{Regex, RegexSet};

use crate::error::{RuleError, RuleResult};
use crate::rules::config::{NamedPatternConfig, RuleConfig, Severity};
use crate::types::Span;

/// Mandatory-annotation rule with its compiled detector
#[derive(Debug, Clone)]
pub struct AnnotationRule {
    /// Canonical keyword
    pub keyword: String,
    /// Alternative spellings that trigger the same rule
    pub aliases: Vec<String>,
    /// Matches text that carries the required annotation
    pub annotation: Regex,
    /// Severity of a missing annotation
    pub severity: Severity,
    /// Example annotated phrasings
    pub examples: Vec<String>,
}

/// Compiled named pattern
#[derive(Debug, Clone)]
pub struct NamedPattern {
    pub name: String,
    pub regex: Regex,
}

/// Prohibited expression, classified by catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prohibition {
    pub keyword: String,
    pub reason: String,
    pub absolute: bool,
}

/// A pattern hit inside some text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch<'r> {
    /// Name of the pattern or canonical keyword
    pub name: &'r str,
    /// Byte range of the hit
    pub span: Span,
}

/// Resolved rule table for one product
#[derive(Debug, Clone)]
pub struct RuleSet {
    product: String,
    name: String,
    version: String,

    annotation_rules: Vec<AnnotationRule>,
    /// Alternation over every keyword and alias, longest first
    keyword_matcher: Option<Regex>,
    /// Surface form -> index into `annotation_rules`
    keyword_index: HashMap<String, usize>,

    urgency: Vec<NamedPattern>,
    price: Vec<NamedPattern>,
    evidence: RegexSet,
    prohibitions: Vec<Prohibition>,
}

impl RuleSet {
    /// Compile a validated configuration
    pub fn from_config(config: &RuleConfig) -> RuleResult<Self> {
        config.validate()?;

        let mut annotation_rules = Vec::with_capacity(config.annotation_rules.len());
        let mut keyword_index = HashMap::new();
        for (index, rule) in config.annotation_rules.iter().enumerate() {
            let annotation = compile(&rule.keyword, &rule.annotation_pattern)?;
            keyword_index.insert(rule.keyword.clone(), index);
            for alias in &rule.aliases {
                keyword_index.insert(alias.clone(), index);
            }
            annotation_rules.push(AnnotationRule {
                keyword: rule.keyword.clone(),
                aliases: rule.aliases.clone(),
                annotation,
                severity: rule.severity,
                examples: rule.examples.clone(),
            });
        }
        let keyword_matcher = build_keyword_matcher(keyword_index.keys())?;

        let urgency = compile_group("urgency", &config.urgency.patterns)?;
        let price = compile_group("price", &config.price.patterns)?;

        let evidence =
            RegexSet::new(&config.evidence.cues).map_err(|source| RuleError::InvalidPattern {
                name: "evidence.cues".to_string(),
                source,
            })?;

        let prohibitions = config
            .prohibitions
            .context_dependent
            .iter()
            .map(|p| (p, false))
            .chain(config.prohibitions.absolute.iter().map(|p| (p, true)))
            .map(|(p, absolute)| Prohibition {
                keyword: p.keyword.clone(),
                reason: p.reason.clone(),
                absolute,
            })
            .collect();

        Ok(Self {
            product: config.metadata.product.clone(),
            name: config.metadata.name.clone(),
            version: config.metadata.version.clone(),
            annotation_rules,
            keyword_matcher,
            keyword_index,
            urgency,
            price,
            evidence,
            prohibitions,
        })
    }

    /// Parse and compile a TOML rule table
    pub fn from_toml_str(toml_str: &str) -> RuleResult<Self> {
        Self::from_config(&RuleConfig::from_toml_str(toml_str)?)
    }

    /// Load a rule table from a file
    pub fn from_file(path: impl AsRef<Path>) -> RuleResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Product identifier
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Human-readable product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Data version of the table
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn annotation_rules(&self) -> &[AnnotationRule] {
        &self.annotation_rules
    }

    pub fn urgency_patterns(&self) -> &[NamedPattern] {
        &self.urgency
    }

    pub fn price_patterns(&self) -> &[NamedPattern] {
        &self.price
    }

    pub fn prohibitions(&self) -> &[Prohibition] {
        &self.prohibitions
    }

    /// Number of evidence cue patterns
    pub fn evidence_cue_count(&self) -> usize {
        self.evidence.len()
    }

    /// Rule registered for a keyword or alias
    pub fn rule_for(&self, keyword: &str) -> Option<&AnnotationRule> {
        self.keyword_index
            .get(keyword)
            .map(|&idx| &self.annotation_rules[idx])
    }

    /// Non-overlapping keyword hits, named by canonical keyword
    pub fn keyword_matches<'r>(&'r self, text: &str) -> Vec<PatternMatch<'r>> {
        let Some(matcher) = &self.keyword_matcher else {
            return Vec::new();
        };

        matcher
            .find_iter(text)
            .filter_map(|m| {
                self.keyword_index.get(m.as_str()).map(|&idx| PatternMatch {
                    name: self.annotation_rules[idx].keyword.as_str(),
                    span: Span::new(m.start(), m.end()),
                })
            })
            .collect()
    }

    /// Urgency/offer pattern hits in pattern order, then text order
    pub fn urgency_matches<'r>(&'r self, text: &str) -> Vec<PatternMatch<'r>> {
        group_matches(&self.urgency, text)
    }

    /// Price pattern hits in pattern order, then text order
    pub fn price_matches<'r>(&'r self, text: &str) -> Vec<PatternMatch<'r>> {
        group_matches(&self.price, text)
    }

    /// Whether `text` carries an evidence cue
    pub fn is_evidence(&self, text: &str) -> bool {
        self.evidence.is_match(text)
    }

    /// Whether `text` carries the annotation required by `keyword`
    ///
    /// Returns `None` when the keyword has no rule.
    pub fn has_required_annotation(&self, keyword: &str, text: &str) -> Option<bool> {
        self.rule_for(keyword).map(|rule| rule.annotation.is_match(text))
    }
}

fn compile(name: &str, pattern: &str) -> RuleResult<Regex> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
        name: name.to_string(),
        source,
    })
}

fn compile_group(group: &str, patterns: &[NamedPatternConfig]) -> RuleResult<Vec<NamedPattern>> {
    patterns
        .iter()
        .map(|p| {
            let name = format!("{group}.{}", p.name);
            let regex = compile(&name, &p.pattern)?;
            Ok(NamedPattern {
                name: p.name.clone(),
                regex,
            })
        })
        .collect()
}

fn group_matches<'r>(patterns: &'r [NamedPattern], text: &str) -> Vec<PatternMatch<'r>> {
    patterns
        .iter()
        .flat_map(|p| {
            p.regex.find_iter(text).map(move |m| PatternMatch {
                name: p.name.as_str(),
                span: Span::new(m.start(), m.end()),
            })
        })
        .filter(|m| !m.span.is_empty())
        .collect()
}

/// Leftmost-first alternation prefers earlier branches, so longer surface
/// forms go first (`浸透力` before `浸透`).
fn build_keyword_matcher<'a>(
    keywords: impl Iterator<Item = &'a String>,
) -> RuleResult<Option<Regex>> {
    let mut keywords: Vec<&String> = keywords.collect();
    if keywords.is_empty() {
        return Ok(None);
    }
    keywords.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));

    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    compile("keywords", &alternation).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
[metadata]
product = "test"
name = "Test"
version = "3"

[[annotation_rules]]
keyword = "浸透"
aliases = ["浸透力"]
annotation_pattern = "角質層"
severity = "high"

[[annotation_rules]]
keyword = "殺菌"
annotation_pattern = "殺菌成分"

[[urgency.patterns]]
name = "now"
pattern = "今なら[^。\\n]{0,10}円"

[[price.patterns]]
name = "yen"
pattern = "[0-9][0-9,]*円"

[evidence]
cues = ["[0-9]+%", "試験"]

[[prohibitions.absolute]]
keyword = "治る"
reason = "医薬品的効能"

[[prohibitions.context_dependent]]
keyword = "最高"
"#;

    #[test]
    fn test_compiles_full_table() {
        let rules = RuleSet::from_toml_str(TABLE).unwrap();
        assert_eq!(rules.product(), "test");
        assert_eq!(rules.version(), "3");
        assert_eq!(rules.annotation_rules().len(), 2);
        assert_eq!(rules.urgency_patterns()[0].name, "now");
        assert_eq!(rules.evidence_cue_count(), 2);

        let absolute: Vec<_> = rules.prohibitions().iter().filter(|p| p.absolute).collect();
        assert_eq!(absolute.len(), 1);
        assert_eq!(absolute[0].keyword, "治る");
    }

    #[test]
    fn test_alias_prefers_longest_surface_form() {
        let rules = RuleSet::from_toml_str(TABLE).unwrap();
        let text = "浸透力と殺菌";
        let hits = rules.keyword_matches(text);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, "浸透");
        assert_eq!(&text[hits[0].span.start..hits[0].span.end], "浸透力");
        assert_eq!(hits[1].name, "殺菌");
    }

    #[test]
    fn test_required_annotation_detector() {
        let rules = RuleSet::from_toml_str(TABLE).unwrap();
        assert_eq!(
            rules.has_required_annotation("浸透力", "角質層まで浸透力"),
            Some(true)
        );
        assert_eq!(rules.has_required_annotation("殺菌", "殺菌します"), Some(false));
        assert_eq!(rules.has_required_annotation("保湿", "保湿"), None);
    }

    #[test]
    fn test_pattern_groups() {
        let rules = RuleSet::from_toml_str(TABLE).unwrap();
        let text = "今なら1,980円。通常3,000円";

        let urgency = rules.urgency_matches(text);
        assert_eq!(urgency.len(), 1);
        assert_eq!(urgency[0].span.start, 0);

        let prices = rules.price_matches(text);
        assert_eq!(prices.len(), 2);
        assert!(rules.is_evidence("満足度95%"));
        assert!(!rules.is_evidence("なめらかな使い心地"));
    }

    #[test]
    fn test_invalid_pattern_names_the_rule() {
        let table = TABLE.replace("今なら[^。\\\\n]{0,10}円", "今なら(");
        match RuleSet::from_toml_str(&table) {
            Err(RuleError::InvalidPattern { name, .. }) => assert_eq!(name, "urgency.now"),
            other => panic!("expected invalid pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = RuleSet::from_file("/nonexistent/rules.toml").unwrap_err();
        assert!(matches!(err, RuleError::Io { .. }));
    }
}
