//! SIGMA aggregation query compiler.
//!
//! This module turns parsed aggregation conditions into fragments of the
//! target query language.
//!
//! The compiler is organized into several sub-modules:
//! - [`field_mapping`] - Field name translation to the target schema
//! - [`aggregation`] - Translation of aggregation expressions and functions
//! - [`query`] - Structured assembly of `select ...|group having ...` fragments
//!
//! # Examples
//!
//! Basic usage:
//! ```rust
//! use sigma_query::ast::{AggregationExpr, AggregationFunc, ComparisonOp};
//! use sigma_query::QueryCompiler;
//!
//! let compiler = QueryCompiler::new();
//! let expr = AggregationExpr::comparison(AggregationFunc::count(""), ComparisonOp::Gt, 5.0);
//!
//! let query = compiler.translate_aggregation(0, &expr)?;
//! assert_eq!(query, ", count(*)|group having count(*) > 5");
//! # Ok::<(), sigma_query::SigmaError>(())
//! ```
//!
//! With custom field mapping:
//! ```rust
//! use sigma_query::ast::{AggregationExpr, AggregationFunc, ComparisonOp};
//! use sigma_query::{FieldMapping, QueryCompiler};
//!
//! let mut field_mapping = FieldMapping::new();
//! field_mapping.add_mapping("user".to_string(), "usr_id".to_string());
//!
//! let compiler = QueryCompiler::with_field_mapping(field_mapping);
//! let expr = AggregationExpr::comparison(AggregationFunc::count("user"), ComparisonOp::Gte, 3.0);
//! assert_eq!(
//!     compiler.translate_aggregation(0, &expr)?,
//!     "select usr_id, count(*)|group having count(*) >= 3"
//! );
//! # Ok::<(), sigma_query::SigmaError>(())
//! ```

pub mod aggregation;
pub mod field_mapping;
pub mod query;

pub use field_mapping::FieldMapping;
pub use query::AggregateQuery;

use crate::ast::AggregationExpr;
use crate::config::{BackendConfig, CompilerConfig};
use crate::error::Result;
use rayon::prelude::*;

/// The SIGMA aggregation query compiler.
///
/// Holds the read-only field mapping used for every translation. Translation
/// itself is stateless, so a compiler can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    field_mapping: FieldMapping,
    config: CompilerConfig,
}

impl QueryCompiler {
    /// Create a compiler without field mappings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compiler with a custom field mapping.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigma_query::{FieldMapping, QueryCompiler};
    ///
    /// let field_mapping = FieldMapping::with_taxonomy("custom".to_string());
    /// let compiler = QueryCompiler::with_field_mapping(field_mapping);
    /// assert_eq!(compiler.field_mapping().taxonomy(), "custom");
    /// ```
    pub fn with_field_mapping(field_mapping: FieldMapping) -> Self {
        Self {
            field_mapping,
            config: CompilerConfig::default(),
        }
    }

    /// Create a compiler from a loaded backend configuration.
    pub fn from_backend_config(backend: &BackendConfig) -> Self {
        tracing::debug!(
            title = backend.title.as_deref().unwrap_or_default(),
            taxonomy = backend.taxonomy.as_deref().unwrap_or("sigma"),
            mappings = backend.fieldmappings.len(),
            "creating query compiler from backend config"
        );
        Self::with_field_mapping(backend.field_mapping())
    }

    /// Replace the compiler tuning configuration.
    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the compiler tuning configuration.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Get a reference to the field mapping used for every translation.
    pub fn field_mapping(&self) -> &FieldMapping {
        &self.field_mapping
    }

    /// Get a mutable reference to the field mapping for configuration.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigma_query::QueryCompiler;
    ///
    /// let mut compiler = QueryCompiler::new();
    /// compiler
    ///     .field_mapping_mut()
    ///     .add_mapping("user".to_string(), "usr_id".to_string());
    /// assert_eq!(compiler.field_mapping().resolve("user"), "usr_id");
    /// ```
    pub fn field_mapping_mut(&mut self) -> &mut FieldMapping {
        &mut self.field_mapping
    }

    /// Translate every aggregation sub-condition of a rule.
    ///
    /// Results are returned in input order. Failures are reported per
    /// condition, wrapped in [`SigmaError::Condition`] carrying the index.
    ///
    /// [`SigmaError::Condition`]: crate::SigmaError::Condition
    pub fn translate_conditions(&self, exprs: &[AggregationExpr]) -> Vec<Result<String>> {
        let translate = |(index, expr): (usize, &AggregationExpr)| {
            self.translate_aggregation(index, expr)
                .map_err(|err| err.at_condition(index))
        };

        if self.config.should_parallelize(exprs.len()) {
            tracing::debug!(conditions = exprs.len(), "translating conditions in parallel");
            exprs.par_iter().enumerate().map(translate).collect()
        } else {
            tracing::debug!(conditions = exprs.len(), "translating conditions");
            exprs.iter().enumerate().map(translate).collect()
        }
    }

    /// Translate every aggregation sub-condition of a rule, failing on the
    /// first condition (lowest index) that cannot be translated.
    pub fn translate_rule(&self, exprs: &[AggregationExpr]) -> Result<Vec<String>> {
        self.translate_conditions(exprs).into_iter().collect()
    }
}
