//! Per-product rule tables
//!
//! Rule tables are plain, versioned data (TOML) compiled into an immutable
//! [`RuleSet`] before any text is segmented.

pub mod config;
pub mod loader;
pub mod runtime;

pub use config::{RuleConfig, Severity};
pub use loader::{available_products, embedded_source, get_rules};
pub use runtime::{AnnotationRule, NamedPattern, PatternMatch, Prohibition, RuleSet};
