//! Aggregation condition AST.
//!
//! These types describe the aggregation part of a SIGMA condition such as
//! `count(User) by Host > 5`. They are produced by an upstream rule parser and
//! consumed by the [`QueryCompiler`](crate::QueryCompiler). All of them
//! implement `serde` traits so the parser can hand them over as YAML or JSON.
//!
//! # Examples
//!
//! ```rust
//! use sigma_query::ast::{AggregationExpr, AggregationFunc, ComparisonOp};
//!
//! let expr = AggregationExpr::comparison(
//!     AggregationFunc::count("User").grouped_by("Host"),
//!     ComparisonOp::Gt,
//!     5.0,
//! );
//! assert!(matches!(expr, AggregationExpr::Comparison(_)));
//! ```

use crate::error::SigmaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level aggregation expression of a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AggregationExpr {
    /// Time-windowed correlation of events (`near ...`).
    Near(NearRelation),
    /// Aggregation function compared against a threshold.
    Comparison(Comparison),
    /// Expression kind this backend does not know about.
    #[serde(other)]
    Unknown,
}

impl AggregationExpr {
    /// Shorthand for building a threshold comparison.
    pub fn comparison(func: AggregationFunc, op: ComparisonOp, threshold: f64) -> Self {
        AggregationExpr::Comparison(Comparison {
            func,
            op,
            threshold,
        })
    }

    pub fn near(condition: impl Into<String>) -> Self {
        AggregationExpr::Near(NearRelation {
            condition: condition.into(),
        })
    }
}

/// A `near` relation. Kept opaque: the raw search expression it correlates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearRelation {
    #[serde(default)]
    pub condition: String,
}

/// An aggregation function compared against a numeric threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub func: AggregationFunc,
    pub op: ComparisonOp,
    pub threshold: f64,
}

impl Comparison {
    /// Threshold as rendered in queries, with any fractional part discarded.
    ///
    /// ```rust
    /// use sigma_query::ast::{AggregationFunc, Comparison, ComparisonOp};
    ///
    /// let cmp = Comparison {
    ///     func: AggregationFunc::count(""),
    ///     op: ComparisonOp::Lt,
    ///     threshold: -2.9,
    /// };
    /// assert_eq!(cmp.threshold_literal(), -2);
    /// ```
    pub fn threshold_literal(&self) -> i64 {
        // `as` truncates toward zero and saturates; NaN becomes 0.
        self.threshold as i64
    }
}

/// Field and optional grouping an aggregation function operates on.
///
/// An empty string means "not set" for both members. An empty `field` is only
/// meaningful for `count`, where it counts all records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationField {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub grouped_by: String,
}

impl AggregationField {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            grouped_by: String::new(),
        }
    }

    pub fn with_grouped_by(mut self, grouped_by: impl Into<String>) -> Self {
        self.grouped_by = grouped_by.into();
        self
    }

    pub fn field(&self) -> Option<&str> {
        (!self.field.is_empty()).then_some(self.field.as_str())
    }

    pub fn grouped_by(&self) -> Option<&str> {
        (!self.grouped_by.is_empty()).then_some(self.grouped_by.as_str())
    }
}

/// Aggregation function of a threshold comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "function", rename_all = "snake_case")]
pub enum AggregationFunc {
    Count(AggregationField),
    #[serde(alias = "avg")]
    Average(AggregationField),
    Sum(AggregationField),
    #[serde(alias = "minimum")]
    Min(AggregationField),
    #[serde(alias = "maximum")]
    Max(AggregationField),
    /// Function tag this backend does not know about.
    #[serde(other)]
    Unknown,
}

impl AggregationFunc {
    pub fn count(field: impl Into<String>) -> Self {
        AggregationFunc::Count(AggregationField::new(field))
    }

    pub fn average(field: impl Into<String>) -> Self {
        AggregationFunc::Average(AggregationField::new(field))
    }

    pub fn sum(field: impl Into<String>) -> Self {
        AggregationFunc::Sum(AggregationField::new(field))
    }

    pub fn min(field: impl Into<String>) -> Self {
        AggregationFunc::Min(AggregationField::new(field))
    }

    pub fn max(field: impl Into<String>) -> Self {
        AggregationFunc::Max(AggregationField::new(field))
    }

    /// Set the group-by field. Has no effect on [`AggregationFunc::Unknown`].
    pub fn grouped_by(mut self, grouped_by: impl Into<String>) -> Self {
        if let Some(args) = self.args_mut() {
            args.grouped_by = grouped_by.into();
        }
        self
    }

    fn args_mut(&mut self) -> Option<&mut AggregationField> {
        match self {
            AggregationFunc::Count(args)
            | AggregationFunc::Average(args)
            | AggregationFunc::Sum(args)
            | AggregationFunc::Min(args)
            | AggregationFunc::Max(args) => Some(args),
            AggregationFunc::Unknown => None,
        }
    }
}

/// Comparison operator between an aggregate and its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = "=", alias = "eq")]
    Eq,
    #[serde(rename = "!=", alias = "neq")]
    Neq,
    #[serde(rename = ">", alias = "gt")]
    Gt,
    #[serde(rename = ">=", alias = "gte")]
    Gte,
    #[serde(rename = "<", alias = "lt")]
    Lt,
    #[serde(rename = "<=", alias = "lte")]
    Lte,
}

impl ComparisonOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Neq => "!=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Gte => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Lte => "<=",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonOp {
    type Err = SigmaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" | "==" => Ok(ComparisonOp::Eq),
            "!=" => Ok(ComparisonOp::Neq),
            ">" => Ok(ComparisonOp::Gt),
            ">=" => Ok(ComparisonOp::Gte),
            "<" => Ok(ComparisonOp::Lt),
            "<=" => Ok(ComparisonOp::Lte),
            other => Err(SigmaError::UnsupportedFeature(format!(
                "comparison operator '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_op_round_trips_through_display() {
        for op in [
            ComparisonOp::Eq,
            ComparisonOp::Neq,
            ComparisonOp::Gt,
            ComparisonOp::Gte,
            ComparisonOp::Lt,
            ComparisonOp::Lte,
        ] {
            assert_eq!(op.to_string().parse::<ComparisonOp>().unwrap(), op);
        }
    }

    #[test]
    fn test_comparison_op_rejects_unknown() {
        let err = "=~".parse::<ComparisonOp>().unwrap_err();
        assert!(err.to_string().contains("=~"));
    }

    #[test]
    fn test_threshold_truncates_toward_zero() {
        let mut cmp = Comparison {
            func: AggregationFunc::count(""),
            op: ComparisonOp::Gt,
            threshold: 5.99,
        };
        assert_eq!(cmp.threshold_literal(), 5);

        cmp.threshold = -5.99;
        assert_eq!(cmp.threshold_literal(), -5);

        cmp.threshold = f64::NAN;
        assert_eq!(cmp.threshold_literal(), 0);
    }

    #[test]
    fn test_grouped_by_builder() {
        let func = AggregationFunc::sum("bytes").grouped_by("host");
        match func {
            AggregationFunc::Sum(args) => {
                assert_eq!(args.field(), Some("bytes"));
                assert_eq!(args.grouped_by(), Some("host"));
            }
            other => panic!("Expected Sum, got {other:?}"),
        }

        assert_eq!(AggregationFunc::Unknown.grouped_by("host"), AggregationFunc::Unknown);
    }

    #[test]
    fn test_empty_members_are_unset() {
        let args = AggregationField::default();
        assert_eq!(args.field(), None);
        assert_eq!(args.grouped_by(), None);
    }

    #[test]
    fn test_deserialize_comparison_from_yaml() {
        let yaml = r#"
type: comparison
func:
  function: avg
  field: duration
  grouped_by: host
op: "<"
threshold: 100
"#;
        let expr: AggregationExpr = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            expr,
            AggregationExpr::comparison(
                AggregationFunc::average("duration").grouped_by("host"),
                ComparisonOp::Lt,
                100.0,
            )
        );
    }

    #[test]
    fn test_deserialize_unknown_tags() {
        let expr: AggregationExpr = serde_yaml::from_str("type: sequence").unwrap();
        assert_eq!(expr, AggregationExpr::Unknown);

        let func: AggregationFunc =
            serde_yaml::from_str("function: median\nfield: duration").unwrap();
        assert_eq!(func, AggregationFunc::Unknown);
    }

    #[test]
    fn test_deserialize_near() {
        let expr: AggregationExpr =
            serde_yaml::from_str("type: near\ncondition: selection1 and selection2").unwrap();
        assert_eq!(expr, AggregationExpr::near("selection1 and selection2"));
    }
}
