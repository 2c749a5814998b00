use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::{FeatureField, MEASUREMENT_FIELDS};
use crate::utils::constants::{
    CONFIG_ENV_PREFIX, DEFAULT_FEATURE_DAYS, DEFAULT_RANDOM_SEED, DEFAULT_TEST_FRACTION,
};

/// Settings for one pipeline run. Validated once, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of prior days that make up the features of a sample.
    #[validate(range(min = 1))]
    pub feature_days: usize,

    pub test_fraction: f64,

    pub random_seed: u64,

    #[validate(length(min = 1))]
    pub field_order: Vec<FeatureField>,

    #[validate(range(min = 1))]
    pub max_workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feature_days: DEFAULT_FEATURE_DAYS,
            test_fraction: DEFAULT_TEST_FRACTION,
            random_seed: DEFAULT_RANDOM_SEED,
            field_order: MEASUREMENT_FIELDS.to_vec(),
            max_workers: num_cpus::get(),
        }
    }
}

impl PipelineConfig {
    pub fn new(feature_days: usize) -> Self {
        Self {
            feature_days,
            ..Self::default()
        }
    }

    /// Load from an optional TOML file, then `WEATHER_WINDOWER_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(CONFIG_ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: PipelineConfig = settings.try_deserialize()?;
        config.checked()
    }

    pub fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = test_fraction;
        self
    }

    pub fn with_random_seed(mut self, random_seed: u64) -> Self {
        self.random_seed = random_seed;
        self
    }

    pub fn with_field_order(mut self, field_order: Vec<FeatureField>) -> Self {
        self.field_order = field_order;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Records per block: the feature days plus the target day.
    pub fn block_length(&self) -> usize {
        self.feature_days + 1
    }

    pub fn fields_per_record(&self) -> usize {
        self.field_order.len()
    }

    pub fn feature_width(&self) -> usize {
        self.feature_days * self.fields_per_record()
    }

    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ProcessingError::Config(format!(
                "test_fraction must lie strictly between 0 and 1, got {}",
                self.test_fraction
            )));
        }

        let mut seen = HashSet::with_capacity(self.field_order.len());
        for field in &self.field_order {
            if !seen.insert(field) {
                return Err(ProcessingError::Config(format!(
                    "field_order lists {} more than once",
                    field
                )));
            }
        }

        Ok(())
    }

    pub fn checked(self) -> Result<Self> {
        self.check()?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.block_length(), DEFAULT_FEATURE_DAYS + 1);
        assert_eq!(config.fields_per_record(), 14);
        assert_eq!(config.random_seed, 42);
    }

    #[test]
    fn test_rejects_zero_feature_days() {
        let config = PipelineConfig::new(0);
        assert!(matches!(
            config.check(),
            Err(ProcessingError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_test_fraction_bounds() {
        for fraction in [0.0, 1.0, -0.5, f64::NAN] {
            let config = PipelineConfig::default().with_test_fraction(fraction);
            assert!(
                matches!(config.check(), Err(ProcessingError::Config(_))),
                "accepted test_fraction {}",
                fraction
            );
        }
    }

    #[test]
    fn test_rejects_duplicate_and_empty_fields() {
        let duplicated = PipelineConfig::default()
            .with_field_order(vec![FeatureField::MinTemp, FeatureField::MinTemp]);
        assert!(matches!(duplicated.check(), Err(ProcessingError::Config(_))));

        let empty = PipelineConfig::default().with_field_order(Vec::new());
        assert!(matches!(empty.check(), Err(ProcessingError::Validation(_))));
    }

    #[test]
    fn test_load_from_toml_file() -> Result<()> {
        let mut file: NamedTempFile = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "feature_days = 6")?;
        writeln!(file, "test_fraction = 0.25")?;
        writeln!(file, "random_seed = 7")?;
        writeln!(file, "field_order = [\"MinTemp\", \"MaxTemp\", \"Rainfall\"]")?;

        let config = PipelineConfig::load(Some(file.path()))?;

        assert_eq!(config.feature_days, 6);
        assert_eq!(config.block_length(), 7);
        assert_eq!(config.test_fraction, 0.25);
        assert_eq!(config.random_seed, 7);
        assert_eq!(config.feature_width(), 18);
        Ok(())
    }
}
