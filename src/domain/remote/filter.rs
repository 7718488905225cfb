//! Filter expressions for registry queries

use std::fmt::Display;

/// Ordered property filter, rendered as URL query parameters
///
/// Repeated properties are kept; the registry service treats them as OR.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    clauses: Vec<(String, String)>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `property` equals `value`
    pub fn eq(mut self, property: impl Into<String>, value: impl Display) -> Self {
        self.clauses.push((property.into(), value.to_string()));
        self
    }

    /// `property` is unset
    pub fn is_null(self, property: impl Into<String>) -> Self {
        self.eq(property, "null")
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.clauses.clone()
    }
}
