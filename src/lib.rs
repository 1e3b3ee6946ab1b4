//! # SIGMA Query Backend
//!
//! Translates the aggregation part of [SIGMA detection rules](https://github.com/SigmaHQ/sigma)
//! (`count() by Host > 5`, `avg(Duration) < 100`, ...) into query-language
//! fragments of the form
//! `select <fields>, <func>(<field>)|group having <func>(<field>) <op> <threshold>`.
//!
//! Rule parsing happens upstream; this crate receives the parsed
//! [`AggregationExpr`] and a [`FieldMapping`] and only renders query text.
//!
//! ## Quick Start
//!
//! ```rust
//! use sigma_query::ast::{AggregationExpr, AggregationFunc, ComparisonOp};
//! use sigma_query::QueryCompiler;
//!
//! let compiler = QueryCompiler::new();
//! let expr = AggregationExpr::comparison(
//!     AggregationFunc::count("").grouped_by("Host"),
//!     ComparisonOp::Gt,
//!     5.0,
//! );
//!
//! let query = compiler.translate_aggregation(0, &expr)?;
//! assert_eq!(query, "select Host, count(*)|group having count(*) > 5");
//! # Ok::<(), sigma_query::SigmaError>(())
//! ```
//!
//! ### Field Mapping
//!
//! ```rust
//! use sigma_query::ast::{AggregationExpr, AggregationFunc, ComparisonOp};
//! use sigma_query::{BackendConfig, QueryCompiler};
//!
//! // Map SIGMA field names to your schema
//! let backend = BackendConfig::from_yaml_str(r#"
//! fieldmappings:
//!     User: [usr_id, user.name]
//! "#)?;
//! let compiler = QueryCompiler::from_backend_config(&backend);
//!
//! let expr = AggregationExpr::comparison(AggregationFunc::count("User"), ComparisonOp::Gte, 3.0);
//! assert_eq!(
//!     compiler.translate_aggregation(0, &expr)?,
//!     "select usr_id, count(*)|group having count(*) >= 3"
//! );
//! # Ok::<(), sigma_query::SigmaError>(())
//! ```

pub mod ast;
pub mod compiler;
pub mod config;
pub mod error;

// Compiler and configuration
pub use compiler::{AggregateQuery, FieldMapping, QueryCompiler};
pub use config::{BackendConfig, CompilerConfig, MappingTargets};

// Core types and errors
pub use ast::{
    AggregationExpr, AggregationField, AggregationFunc, Comparison, ComparisonOp, NearRelation,
};
pub use error::{Result, SigmaError};
