//! Structured builder for aggregation query fragments.
//!
//! Fragments follow the target grammar
//! `select <fields>, <func>(<arg>)|group having <func>(<arg>)`.

use std::fmt;

/// Select list plus aggregate call of a grouped query fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateQuery<'a> {
    select: Vec<&'a str>,
    function: &'static str,
    argument: &'a str,
}

impl<'a> AggregateQuery<'a> {
    /// Create a fragment aggregating `argument` with `function`.
    pub fn new(function: &'static str, argument: &'a str) -> Self {
        Self {
            select: Vec::new(),
            function,
            argument,
        }
    }

    /// Append a column to the select list.
    pub fn select(mut self, column: &'a str) -> Self {
        self.select.push(column);
        self
    }
}

impl fmt::Display for AggregateQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // An empty select list drops the clause but keeps the leading separator.
        if !self.select.is_empty() {
            write!(f, "select {}", self.select.join(", "))?;
        }
        write!(
            f,
            ", {func}({arg})|group having {func}({arg})",
            func = self.function,
            arg = self.argument
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_select_list() {
        let query = AggregateQuery::new("count", "*");
        assert_eq!(query.to_string(), ", count(*)|group having count(*)");
    }

    #[test]
    fn test_select_columns_in_order() {
        let query = AggregateQuery::new("max", "bytes")
            .select("bytes")
            .select("host");
        assert_eq!(
            query.to_string(),
            "select bytes, host, max(bytes)|group having max(bytes)"
        );
    }
}
