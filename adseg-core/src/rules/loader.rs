//! Product rule table registry
//!
//! Embedded tables are parsed and compiled once, on first lookup, into an
//! immutable map. Lookups happen when a segmenter is built, never while a
//! text is being segmented.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use crate::error::{RuleError, RuleResult};
use crate::rules::runtime::RuleSet;

/// Embedded product tables: (product id, TOML source)
const EMBEDDED_TABLES: &[(&str, &str)] = &[
    (
        "cosmetics",
        include_str!("../../configs/products/cosmetics.toml"),
    ),
    (
        "quasi_drug",
        include_str!("../../configs/products/quasi_drug.toml"),
    ),
];

static EMBEDDED: OnceLock<BTreeMap<String, Arc<RuleSet>>> = OnceLock::new();

fn registry() -> &'static BTreeMap<String, Arc<RuleSet>> {
    EMBEDDED.get_or_init(|| {
        let mut map = BTreeMap::new();
        for (product, source) in EMBEDDED_TABLES {
            match RuleSet::from_toml_str(source) {
                Ok(rules) => {
                    map.insert(product.to_string(), Arc::new(rules));
                }
                Err(e) => {
                    tracing::error!(product, error = %e, "embedded rule table failed to load");
                }
            }
        }
        map
    })
}

/// Look up an embedded rule table by product id
pub fn get_rules(product: &str) -> RuleResult<Arc<RuleSet>> {
    registry()
        .get(product)
        .cloned()
        .ok_or_else(|| RuleError::UnknownProduct {
            product: product.to_string(),
        })
}

/// Ids of all embedded products, sorted
pub fn available_products() -> Vec<&'static str> {
    registry().keys().map(String::as_str).collect()
}

/// Raw TOML of an embedded table
pub fn embedded_source(product: &str) -> Option<&'static str> {
    EMBEDDED_TABLES
        .iter()
        .find(|(id, _)| *id == product)
        .map(|(_, source)| *source)
}
