//! Configuration for the SIGMA query backend.
//!
//! Two kinds of configuration live here:
//! - [`BackendConfig`]: the YAML backend configuration carrying the field
//!   mappings from rule fields to target schema fields
//! - [`CompilerConfig`]: tuning knobs for the [`QueryCompiler`](crate::QueryCompiler)

use crate::compiler::FieldMapping;
use crate::error::{Result, SigmaError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Target field(s) of a single field mapping entry.
///
/// Accepts both `user: usr_id` and `user: [usr_id, user.name]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingTargets {
    Single(String),
    Multiple(Vec<String>),
}

impl MappingTargets {
    /// Configured targets in order.
    pub fn as_slice(&self) -> &[String] {
        match self {
            MappingTargets::Single(target) => std::slice::from_ref(target),
            MappingTargets::Multiple(targets) => targets,
        }
    }

    /// Consume the entry into its ordered target list.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            MappingTargets::Single(target) => vec![target],
            MappingTargets::Multiple(targets) => targets,
        }
    }
}

/// Backend configuration loaded from YAML.
///
/// # Examples
///
/// ```rust
/// use sigma_query::config::BackendConfig;
///
/// let config = BackendConfig::from_yaml_str(r#"
/// title: Example backend
/// fieldmappings:
///     user: usr_id
///     host:
///         - hostname
///         - host.name
/// "#)?;
///
/// let mapping = config.field_mapping();
/// assert_eq!(mapping.resolve("user"), "usr_id");
/// assert_eq!(mapping.resolve("host"), "hostname");
/// # Ok::<(), sigma_query::SigmaError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub taxonomy: Option<String>,
    #[serde(default)]
    pub fieldmappings: BTreeMap<String, MappingTargets>,
}

impl BackendConfig {
    /// Parse a backend configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: BackendConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a backend configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading backend config");
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// An empty target name is rejected in any position. An empty list is
    /// allowed and leaves the field unmapped.
    fn validate(&self) -> Result<()> {
        if let Some((source, _)) = self
            .fieldmappings
            .iter()
            .find(|(_, targets)| targets.as_slice().iter().any(String::is_empty))
        {
            return Err(SigmaError::ConfigError(format!(
                "field mapping for '{source}' has an empty target"
            )));
        }
        Ok(())
    }

    /// Build the [`FieldMapping`] described by this configuration.
    pub fn field_mapping(&self) -> FieldMapping {
        let mut mapping = match &self.taxonomy {
            Some(taxonomy) => FieldMapping::with_taxonomy(taxonomy.clone()),
            None => FieldMapping::new(),
        };
        mapping.load_taxonomy_mappings(
            self.fieldmappings
                .iter()
                .map(|(source, targets)| (source.clone(), targets.clone().into_vec()))
                .collect(),
        );
        mapping
    }
}

/// Tuning for the [`QueryCompiler`](crate::QueryCompiler).
///
/// # Example
/// ```rust
/// use sigma_query::config::CompilerConfig;
///
/// let config = CompilerConfig::new()
///     .with_parallel(true)
///     .with_min_conditions_for_parallelism(16);
/// assert!(config.should_parallelize(16));
/// assert!(!config.should_parallelize(15));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Translate the conditions of a rule on the rayon thread pool.
    pub parallel: bool,
    /// Minimum number of conditions before parallel translation is used.
    pub min_conditions_for_parallelism: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            min_conditions_for_parallelism: 64,
        }
    }
}

impl CompilerConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable parallel translation of rule conditions.
    pub fn with_parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }

    /// Set the parallelism threshold. Values below 1 are raised to 1.
    pub fn with_min_conditions_for_parallelism(mut self, min_conditions: usize) -> Self {
        self.min_conditions_for_parallelism = min_conditions.max(1);
        self
    }

    /// Whether a batch of `conditions` is translated on the rayon pool.
    pub fn should_parallelize(&self, conditions: usize) -> bool {
        self.parallel && conditions >= self.min_conditions_for_parallelism
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_single_and_multiple_targets() {
        let config = BackendConfig::from_yaml_str(
            r#"
title: Test
fieldmappings:
    user: usr_id
    host: [hostname, host.name]
"#,
        )
        .unwrap();

        assert_eq!(config.title.as_deref(), Some("Test"));
        let mapping = config.field_mapping();
        assert_eq!(mapping.taxonomy(), "sigma");
        assert_eq!(mapping.resolve("user"), "usr_id");
        assert_eq!(
            mapping.targets("host"),
            Some(&["hostname".to_string(), "host.name".to_string()][..])
        );
    }

    #[test]
    fn test_taxonomy_and_missing_mappings() {
        let config = BackendConfig::from_yaml_str("taxonomy: custom_edr\n").unwrap();
        let mapping = config.field_mapping();
        assert_eq!(mapping.taxonomy(), "custom_edr");
        assert!(mapping.mappings().is_empty());
    }

    #[test]
    fn test_empty_target_rejected() {
        let err = BackendConfig::from_yaml_str("fieldmappings:\n    user: \"\"\n").unwrap_err();
        assert!(matches!(err, SigmaError::ConfigError(msg) if msg.contains("user")));
    }

    #[test]
    fn test_empty_list_target_rejected() {
        let err = BackendConfig::from_yaml_str("fieldmappings:\n    user: [\"\"]\n").unwrap_err();
        assert!(matches!(err, SigmaError::ConfigError(msg) if msg.contains("user")));

        let err = BackendConfig::from_yaml_str("fieldmappings:\n    user: [usr_id, \"\"]\n")
            .unwrap_err();
        assert!(matches!(err, SigmaError::ConfigError(_)));
    }

    #[test]
    fn test_empty_list_leaves_field_unmapped() {
        let config = BackendConfig::from_yaml_str("fieldmappings:\n    user: []\n").unwrap();
        let mapping = config.field_mapping();
        assert!(mapping.has_mapping("user"));
        assert_eq!(mapping.resolve("user"), "user");
    }

    #[test]
    fn test_invalid_yaml() {
        let err = BackendConfig::from_yaml_str("fieldmappings: [").unwrap_err();
        assert!(matches!(err, SigmaError::YamlError(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fieldmappings:\n    duration: event.duration").unwrap();

        let config = BackendConfig::from_file(file.path()).unwrap();
        assert_eq!(config.field_mapping().resolve("duration"), "event.duration");
    }

    #[test]
    fn test_from_missing_file() {
        let err = BackendConfig::from_file("/nonexistent/backend.yml").unwrap_err();
        assert!(matches!(err, SigmaError::IoError(_)));
    }

    #[test]
    fn test_compiler_config_defaults() {
        let config = CompilerConfig::default();
        assert!(!config.parallel);
        assert!(!config.should_parallelize(10_000));
    }

    #[test]
    fn test_min_conditions_floor() {
        let config = CompilerConfig::new()
            .with_parallel(true)
            .with_min_conditions_for_parallelism(0);
        assert_eq!(config.min_conditions_for_parallelism, 1);
        assert!(!config.should_parallelize(0));
        assert!(config.should_parallelize(1));
    }
}
