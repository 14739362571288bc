//! Filter predicates for store queries and subscriptions
//!
//! The predicate language is a conjunction of equality and set-membership
//! clauses. Filters are normalized on construction (clauses sorted,
//! set members sorted and de-duplicated) so that two logically equal
//! predicates compare equal and produce the same [`QueryKey`].

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Collection, Document, RecordId};

/// Reserved field name addressing the document identifier
pub const DOCUMENT_ID: &str = "__name__";

/// A literal compared against a document field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl FilterValue {
    fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Bool(expected), Value::Bool(actual)) => expected == actual,
            (Self::Int(expected), Value::Number(actual)) => {
                actual.as_i64() == Some(*expected)
                    || actual.as_f64().is_some_and(|f| f == *expected as f64)
            }
            (Self::Str(expected), Value::String(actual)) => expected == actual,
            _ => false,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&RecordId> for FilterValue {
    fn from(id: &RecordId) -> Self {
        Self::Str(id.as_str().to_string())
    }
}

impl From<RecordId> for FilterValue {
    fn from(id: RecordId) -> Self {
        Self::Str(id.into_inner())
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FilterValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

/// A single predicate clause
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Clause {
    /// `field == value`
    Eq { field: String, value: FilterValue },
    /// `field ∈ {values}`
    In {
        field: String,
        values: BTreeSet<FilterValue>,
    },
}

impl Clause {
    pub fn field(&self) -> &str {
        match self {
            Self::Eq { field, .. } | Self::In { field, .. } => field,
        }
    }

    fn matches(&self, doc: &Document) -> bool {
        let id_value;
        let value = if self.field() == DOCUMENT_ID {
            id_value = Value::String(doc.id.as_str().to_string());
            &id_value
        } else {
            match doc.get(self.field()) {
                Some(v) => v,
                None => return false,
            }
        };

        match self {
            Self::Eq { value: expected, .. } => expected.matches(value),
            Self::In { values, .. } => values.iter().any(|v| v.matches(value)),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq { field, value } => write!(f, "{field} == {value}"),
            Self::In { field, values } => {
                write!(f, "{field} in [")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// A normalized query predicate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// No clauses: every record in the collection
    #[default]
    All,
    /// Intentionally empty: matches nothing and must never be sent to a store
    Nothing,
    /// Conjunction of clauses, normalized and non-empty
    Where(Vec<Clause>),
}

impl Filter {
    pub fn all() -> Self {
        Self::All
    }

    pub fn nothing() -> Self {
        Self::Nothing
    }

    /// `field == value`
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::All.and_eq(field, value)
    }

    /// `field ∈ values`; an empty set normalizes to [`Filter::Nothing`]
    pub fn is_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        Self::All.and_in(field, values)
    }

    /// Add an equality clause
    pub fn and_eq(self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.with_clause(Clause::Eq {
            field: field.into(),
            value: value.into(),
        })
    }

    /// Add a set-membership clause
    pub fn and_in<I, V>(self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        self.with_clause(Clause::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Build a filter from arbitrary clauses, normalizing them
    pub fn from_clauses(clauses: impl IntoIterator<Item = Clause>) -> Self {
        let mut clauses: Vec<Clause> = clauses.into_iter().collect();

        if clauses
            .iter()
            .any(|c| matches!(c, Clause::In { values, .. } if values.is_empty()))
        {
            return Self::Nothing;
        }

        clauses.sort();
        clauses.dedup();

        if clauses.is_empty() {
            Self::All
        } else {
            Self::Where(clauses)
        }
    }

    fn with_clause(self, clause: Clause) -> Self {
        match self {
            Self::Nothing => Self::Nothing,
            Self::All => Self::from_clauses([clause]),
            Self::Where(mut clauses) => {
                clauses.push(clause);
                Self::from_clauses(clauses)
            }
        }
    }

    #[inline]
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    pub fn clauses(&self) -> &[Clause] {
        match self {
            Self::Where(clauses) => clauses,
            Self::All | Self::Nothing => &[],
        }
    }

    /// Evaluate the predicate against a document
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Self::All => true,
            Self::Nothing => false,
            Self::Where(clauses) => clauses.iter().all(|c| c.matches(doc)),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("*"),
            Self::Nothing => f.write_str("none"),
            Self::Where(clauses) => {
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" & ")?;
                    }
                    write!(f, "{clause}")?;
                }
                Ok(())
            }
        }
    }
}

/// Stable serialization of a (collection, filter) pair.
///
/// Two queries with the same key are the same logical query.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn new(collection: Collection, filter: &Filter) -> Self {
        Self(format!("{collection}?{filter}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
