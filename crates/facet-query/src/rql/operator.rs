//! Operator tokens of RQL nodes.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Name of an RQL node.
///
/// The operators the facet criteria emit or recognise get their own variant;
/// anything else is carried through verbatim as [`Operator::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    /// Field value is one of the listed terms
    In,
    /// Field value is none of the listed terms
    Out,
    /// Field is present, whatever its value
    Exists,
    /// Field is absent
    Missing,
    /// Field value lies within `[low, high]`
    Between,
    /// Field value is at least the bound
    Ge,
    /// Field value is at most the bound
    Le,
    /// Full-text match
    Match,
    /// Boolean conjunction of nested queries
    And,
    /// Boolean disjunction of nested queries
    Or,
    /// Boolean negation of a nested query
    Not,
    /// Any other operator name
    Other(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::In => "in",
            Operator::Out => "out",
            Operator::Exists => "exists",
            Operator::Missing => "missing",
            Operator::Between => "between",
            Operator::Ge => "ge",
            Operator::Le => "le",
            Operator::Match => "match",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Other(name) => name,
        }
    }

    /// `missing` or `exists`: tests the field's presence, not its value
    pub fn is_presence(&self) -> bool {
        matches!(self, Operator::Missing | Operator::Exists)
    }

    /// `in` or `out`: tests membership of an explicit term list
    pub fn is_membership(&self) -> bool {
        matches!(self, Operator::In | Operator::Out)
    }
}

impl From<&str> for Operator {
    fn from(name: &str) -> Self {
        match name {
            "in" => Operator::In,
            "out" => Operator::Out,
            "exists" => Operator::Exists,
            "missing" => Operator::Missing,
            "between" => Operator::Between,
            "ge" => Operator::Ge,
            "le" => Operator::Le,
            "match" => Operator::Match,
            "and" => Operator::And,
            "or" => Operator::Or,
            "not" => Operator::Not,
            other => Operator::Other(other.to_string()),
        }
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        Operator::from(name.as_str())
    }
}

impl From<Operator> for String {
    fn from(operator: Operator) -> Self {
        operator.as_str().to_string()
    }
}

impl FromStr for Operator {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Operator::from(s))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
