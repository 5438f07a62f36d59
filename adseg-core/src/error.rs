//! Layered error types
//!
//! Rule-table problems are fatal and surface when a segmenter is built.
//! The segmentation pipeline itself has no error path.

use thiserror::Error;

/// Rule table errors (loading and validation)
#[derive(Error, Debug)]
pub enum RuleError {
    /// No rule table registered under this product id
    #[error("unknown product '{product}'")]
    UnknownProduct {
        /// The requested product id
        product: String,
    },

    /// TOML could not be parsed into the rule schema
    #[error("failed to parse rule table: {0}")]
    Parse(#[from] toml::de::Error),

    /// A pattern did not compile
    #[error("invalid pattern '{name}': {source}")]
    InvalidPattern {
        /// Rule or pattern name
        name: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Table metadata is missing a required field
    #[error("rule table metadata is missing '{field}'")]
    MissingMetadata {
        /// Name of the missing field
        field: &'static str,
    },

    /// An annotation rule has an empty keyword or alias
    #[error("annotation rule #{index} has an empty keyword")]
    EmptyKeyword {
        /// Zero-based position of the rule in the table
        index: usize,
    },

    /// The same keyword appears in more than one annotation rule
    #[error("keyword '{keyword}' is defined more than once")]
    DuplicateKeyword {
        /// The repeated keyword
        keyword: String,
    },

    /// The table defines no mandatory-annotation rules
    #[error("rule table for '{product}' defines no annotation rules")]
    EmptyAnnotationRules {
        /// Product id of the table
        product: String,
    },

    /// Reading a rule file failed
    #[error("failed to read rule file {path}: {source}")]
    Io {
        /// The file path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// API-level errors (public interface)
#[derive(Error, Debug)]
pub enum Error {
    /// Rule table error
    #[error("rule error: {0}")]
    Rules(#[from] RuleError),

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Reading the input failed
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    /// Input could not be turned into text
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for rule table operations
pub type RuleResult<T> = std::result::Result<T, RuleError>;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, Error>;
