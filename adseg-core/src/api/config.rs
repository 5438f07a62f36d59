//! Engine tuning

use crate::api::Error;

/// Default thresholds
pub mod defaults {
    /// Overlap ratio (shared length / shorter length) above which the
    /// lower-priority candidate is rejected
    pub const OVERLAP_RATIO: f64 = 0.5;

    /// Maximum distance in characters for marker absorption and fragment
    /// remerge
    pub const ADJACENCY_GAP: usize = 5;

    /// Longest fragment in characters that remerge attaches to a preceding
    /// marker-terminated segment
    pub const SHORT_FRAGMENT: usize = 20;

    /// Coverage below this ratio is reported as a warning
    pub const COVERAGE_THRESHOLD: f64 = 0.8;

    /// Priority added to a candidate that absorbed markers
    pub const PRIORITY_BOOST: u32 = 5;
}

/// Segmenter configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SegmenterConfig {
    pub(crate) overlap_ratio: f64,
    pub(crate) adjacency_gap: usize, // in characters
    pub(crate) short_fragment: usize, // in characters
    pub(crate) coverage_threshold: f64,
    pub(crate) priority_boost: u32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            overlap_ratio: defaults::OVERLAP_RATIO,
            adjacency_gap: defaults::ADJACENCY_GAP,
            short_fragment: defaults::SHORT_FRAGMENT,
            coverage_threshold: defaults::COVERAGE_THRESHOLD,
            priority_boost: defaults::PRIORITY_BOOST,
        }
    }
}

impl SegmenterConfig {
    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn overlap_ratio(&self) -> f64 {
        self.overlap_ratio
    }

    pub fn adjacency_gap(&self) -> usize {
        self.adjacency_gap
    }

    pub fn short_fragment(&self) -> usize {
        self.short_fragment
    }

    pub fn coverage_threshold(&self) -> f64 {
        self.coverage_threshold
    }

    pub fn priority_boost(&self) -> u32 {
        self.priority_boost
    }

    /// Validate the configuration
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if !(self.overlap_ratio > 0.0 && self.overlap_ratio <= 1.0) {
            return Err(Error::Configuration(format!(
                "overlap_ratio must be in (0, 1], got {}",
                self.overlap_ratio
            )));
        }

        if !(0.0..=1.0).contains(&self.coverage_threshold) {
            return Err(Error::Configuration(format!(
                "coverage_threshold must be in [0, 1], got {}",
                self.coverage_threshold
            )));
        }

        if self.short_fragment == 0 {
            return Err(Error::Configuration(
                "short_fragment must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

/// Fluent builder for configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    overlap_ratio: Option<f64>,
    adjacency_gap: Option<usize>,
    short_fragment: Option<usize>,
    coverage_threshold: Option<f64>,
    priority_boost: Option<u32>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rejection threshold for overlapping candidates
    pub fn overlap_ratio(mut self, ratio: f64) -> Self {
        self.overlap_ratio = Some(ratio);
        self
    }

    /// Set the adjacency gap in characters
    pub fn adjacency_gap(mut self, chars: usize) -> Self {
        self.adjacency_gap = Some(chars);
        self
    }

    /// Set the short fragment length in characters
    pub fn short_fragment(mut self, chars: usize) -> Self {
        self.short_fragment = Some(chars);
        self
    }

    /// Set the coverage warning threshold
    pub fn coverage_threshold(mut self, ratio: f64) -> Self {
        self.coverage_threshold = Some(ratio);
        self
    }

    /// Set the merger priority boost
    pub fn priority_boost(mut self, boost: u32) -> Self {
        self.priority_boost = Some(boost);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<SegmenterConfig, Error> {
        let defaults = SegmenterConfig::default();
        let config = SegmenterConfig {
            overlap_ratio: self.overlap_ratio.unwrap_or(defaults.overlap_ratio),
            adjacency_gap: self.adjacency_gap.unwrap_or(defaults.adjacency_gap),
            short_fragment: self.short_fragment.unwrap_or(defaults.short_fragment),
            coverage_threshold: self
                .coverage_threshold
                .unwrap_or(defaults.coverage_threshold),
            priority_boost: self.priority_boost.unwrap_or(defaults.priority_boost),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SegmenterConfig::default();
        assert_eq!(config.overlap_ratio(), defaults::OVERLAP_RATIO);
        assert_eq!(config.adjacency_gap(), 5);
        assert_eq!(config.short_fragment(), 20);
        assert_eq!(config.coverage_threshold(), 0.8);
        assert_eq!(config.priority_boost(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = SegmenterConfig::builder()
            .adjacency_gap(3)
            .priority_boost(10)
            .build()
            .unwrap();

        assert_eq!(config.adjacency_gap(), 3);
        assert_eq!(config.priority_boost(), 10);
        assert_eq!(config.short_fragment(), defaults::SHORT_FRAGMENT);
    }

    #[test]
    fn test_invalid_overlap_ratio() {
        for ratio in [0.0, -0.1, 1.5, f64::NAN] {
            let result = ConfigBuilder::new().overlap_ratio(ratio).build();
            assert!(matches!(result, Err(Error::Configuration(_))), "{ratio}");
        }
    }

    #[test]
    fn test_invalid_coverage_threshold() {
        let result = ConfigBuilder::new().coverage_threshold(1.2).build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_zero_short_fragment() {
        let result = ConfigBuilder::new().short_fragment(0).build();
        assert!(result.is_err());
    }
}
