//! Query generation for aggregation conditions.
//!
//! Renders `count`/`avg`/`sum`/`min`/`max` conditions into grouped query
//! fragments, translating field names through the compiler's [`FieldMapping`].
//!
//! [`FieldMapping`]: super::FieldMapping

use super::query::AggregateQuery;
use super::QueryCompiler;
use crate::ast::{AggregationExpr, AggregationField, AggregationFunc};
use crate::error::{Result, SigmaError};

impl QueryCompiler {
    /// Translate an aggregation expression into a complete query fragment.
    ///
    /// `condition_index` identifies the sub-condition within its rule. It is
    /// only used for tracing and does not affect the output.
    ///
    /// # Errors
    /// - [`SigmaError::UnsupportedFeature`] for `near` relations
    /// - [`SigmaError::UnknownExpression`] for unrecognized expressions
    /// - [`SigmaError::UnsupportedAggregationFunction`] for unrecognized functions
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigma_query::ast::{AggregationExpr, AggregationFunc, ComparisonOp};
    /// use sigma_query::QueryCompiler;
    ///
    /// let compiler = QueryCompiler::new();
    /// let expr = AggregationExpr::comparison(
    ///     AggregationFunc::average("duration").grouped_by("host"),
    ///     ComparisonOp::Lt,
    ///     100.0,
    /// );
    ///
    /// assert_eq!(
    ///     compiler.translate_aggregation(0, &expr)?,
    ///     "select duration, host, avg(duration)|group having avg(duration) < 100"
    /// );
    /// # Ok::<(), sigma_query::SigmaError>(())
    /// ```
    pub fn translate_aggregation(
        &self,
        condition_index: usize,
        expr: &AggregationExpr,
    ) -> Result<String> {
        match expr {
            AggregationExpr::Near(_) => Err(SigmaError::UnsupportedFeature(
                "near isn't supported yet".to_string(),
            )),
            AggregationExpr::Comparison(comparison) => {
                let fragment = self.render_aggregation_func(condition_index, &comparison.func)?;
                let query = format!(
                    "{fragment} {} {}",
                    comparison.op,
                    comparison.threshold_literal()
                );
                tracing::trace!(condition = condition_index, query = %query, "translated aggregation");
                Ok(query)
            }
            AggregationExpr::Unknown => Err(SigmaError::UnknownExpression),
        }
    }

    /// Render the `select ...|group having <func>(...)` part of an aggregation.
    ///
    /// # Errors
    /// Returns [`SigmaError::UnsupportedAggregationFunction`] for
    /// [`AggregationFunc::Unknown`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sigma_query::ast::AggregationFunc;
    /// use sigma_query::QueryCompiler;
    ///
    /// let compiler = QueryCompiler::new();
    /// let fragment = compiler.render_aggregation_func(0, &AggregationFunc::count(""))?;
    /// assert_eq!(fragment, ", count(*)|group having count(*)");
    /// # Ok::<(), sigma_query::SigmaError>(())
    /// ```
    pub fn render_aggregation_func(
        &self,
        condition_index: usize,
        func: &AggregationFunc,
    ) -> Result<String> {
        let fragment = match func {
            AggregationFunc::Count(args) => self.render_count(args),
            AggregationFunc::Average(args) => self.render_statistic("avg", args),
            AggregationFunc::Sum(args) => self.render_statistic("sum", args),
            AggregationFunc::Min(args) => self.render_statistic("min", args),
            AggregationFunc::Max(args) => self.render_statistic("max", args),
            AggregationFunc::Unknown => return Err(SigmaError::UnsupportedAggregationFunction),
        };
        tracing::trace!(condition = condition_index, fragment = %fragment, "rendered aggregation function");
        Ok(fragment)
    }

    /// `count` never names its field inside the aggregate; an empty field counts
    /// all records and leaves only the group-by column (if any) selected.
    fn render_count(&self, args: &AggregationField) -> String {
        let mut query = AggregateQuery::new("count", "*");
        if let Some(field) = args.field() {
            query = query.select(self.resolve_field(field));
        }
        if let Some(grouped_by) = args.grouped_by() {
            query = query.select(self.resolve_field(grouped_by));
        }
        query.to_string()
    }

    fn render_statistic(&self, function: &'static str, args: &AggregationField) -> String {
        let field = self.resolve_field(&args.field);
        let mut query = AggregateQuery::new(function, field).select(field);
        if let Some(grouped_by) = args.grouped_by() {
            query = query.select(self.resolve_field(grouped_by));
        }
        query.to_string()
    }

    fn resolve_field<'a>(&'a self, name: &'a str) -> &'a str {
        if name.is_empty() {
            return name;
        }
        self.field_mapping.resolve(name)
    }
}
