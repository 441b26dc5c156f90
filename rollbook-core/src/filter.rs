//! Filter predicates for record queries
//!
//! A predicate is a conjunction of field-equality clauses. An empty
//! predicate matches every row. This is the only filter shape the engine
//! supports: the original query pipeline was a sequence of `$match` stages,
//! which a conjunction expresses exactly.

use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One field-equality clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldFilter {
    /// Field to filter on
    pub field: String,
    /// Value the field must equal (JSON value for flexibility)
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub value: Value,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }

    /// Whether a record satisfies this clause. A missing field never
    /// matches.
    pub fn matches(&self, record: &Record) -> bool {
        record.get(&self.field) == Some(&self.value)
    }
}

/// Conjunction of field-equality clauses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct Predicate {
    clauses: Vec<FieldFilter>,
}

impl Predicate {
    /// Match-all predicate.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality clause.
    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.clauses.push(FieldFilter::new(field, value));
        self
    }

    /// Add an equality clause only when the value is present. Absence of a
    /// clause means "match all" for that field.
    pub fn with_opt(self, field: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.with(field, Value::String(v.into())),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[FieldFilter] {
        &self.clauses
    }

    /// Whether a record satisfies every clause.
    pub fn matches(&self, record: &Record) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }
}
