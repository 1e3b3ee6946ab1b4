//! Field mapping configuration for translating rule field names.
//!
//! This module provides the [`FieldMapping`] struct which rewrites the logical
//! field names used in SIGMA rules into the field names of the target schema.

use std::collections::HashMap;

/// Field mapping from logical rule field names to target schema field names.
///
/// A logical field may map to several target fields. Query rendering only
/// uses the first one; the others are kept so a configuration survives a
/// round trip unchanged.
///
/// # Examples
///
/// ```rust
/// use sigma_query::compiler::FieldMapping;
///
/// let mut mapping = FieldMapping::new();
/// assert_eq!(mapping.taxonomy(), "sigma");
///
/// mapping.add_mapping("user".to_string(), "usr_id".to_string());
/// mapping.add_mapping("user".to_string(), "user.name".to_string());
///
/// assert_eq!(mapping.resolve("user"), "usr_id");
/// assert_eq!(mapping.resolve("UnmappedField"), "UnmappedField");
/// ```
#[derive(Debug, Clone)]
pub struct FieldMapping {
    field_map: HashMap<String, Vec<String>>,
    taxonomy: String,
}

impl FieldMapping {
    /// Create a new empty field mapping using the default SIGMA taxonomy.
    pub fn new() -> Self {
        Self {
            field_map: HashMap::new(),
            taxonomy: "sigma".to_string(),
        }
    }

    /// Create a new field mapping with a specific taxonomy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigma_query::compiler::FieldMapping;
    ///
    /// let mapping = FieldMapping::with_taxonomy("custom".to_string());
    /// assert_eq!(mapping.taxonomy(), "custom");
    /// ```
    pub fn with_taxonomy(taxonomy: String) -> Self {
        Self {
            field_map: HashMap::new(),
            taxonomy,
        }
    }

    /// Load field mappings from a taxonomy configuration, replacing the
    /// targets of any field that is already mapped.
    pub fn load_taxonomy_mappings(&mut self, mappings: HashMap<String, Vec<String>>) {
        self.field_map.extend(mappings);
    }

    /// Append a target field for `source_field`.
    pub fn add_mapping(&mut self, source_field: String, target_field: String) {
        self.field_map
            .entry(source_field)
            .or_default()
            .push(target_field);
    }

    /// Replace all target fields of `source_field`.
    pub fn set_targets(&mut self, source_field: String, targets: Vec<String>) {
        self.field_map.insert(source_field, targets);
    }

    /// Get the taxonomy name the mapped field names belong to.
    pub fn taxonomy(&self) -> &str {
        &self.taxonomy
    }

    /// Set the taxonomy name.
    pub fn set_taxonomy(&mut self, taxonomy: String) {
        self.taxonomy = taxonomy;
    }

    /// Resolve a field name to the name used in queries.
    ///
    /// Returns the first mapped target, or `field_name` unchanged when the
    /// field is unmapped or mapped to an empty list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigma_query::compiler::FieldMapping;
    ///
    /// let mut mapping = FieldMapping::new();
    /// mapping.set_targets("host".to_string(), vec![]);
    /// mapping.set_targets("user".to_string(), vec!["a".to_string(), "b".to_string()]);
    ///
    /// assert_eq!(mapping.resolve("user"), "a");
    /// assert_eq!(mapping.resolve("host"), "host");
    /// ```
    pub fn resolve<'a>(&'a self, field_name: &'a str) -> &'a str {
        self.field_map
            .get(field_name)
            .and_then(|targets| targets.first())
            .map_or(field_name, String::as_str)
    }

    /// All target fields configured for `field_name`.
    pub fn targets(&self, field_name: &str) -> Option<&[String]> {
        self.field_map.get(field_name).map(Vec::as_slice)
    }

    /// Check if a field mapping exists for the given field name.
    ///
    /// An entry with an empty target list still counts as a mapping.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigma_query::compiler::FieldMapping;
    ///
    /// let mut mapping = FieldMapping::new();
    /// mapping.add_mapping("user".to_string(), "usr_id".to_string());
    ///
    /// assert!(mapping.has_mapping("user"));
    /// assert!(!mapping.has_mapping("UnmappedField"));
    /// ```
    pub fn has_mapping(&self, field_name: &str) -> bool {
        self.field_map.contains_key(field_name)
    }

    /// Get all configured field mappings.
    pub fn mappings(&self) -> &HashMap<String, Vec<String>> {
        &self.field_map
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::new()
    }
}
