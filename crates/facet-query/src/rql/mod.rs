//! RQL query trees
//!
//! A query is a tree of named nodes with positional arguments:
//! `and(in(Mica.sex,(male,female)),ge(Mica.age,18))`.
//! Boolean connectives hold nested queries; every other node is a leaf
//! comparison whose first argument is normally a dotted field path.
//!
//! # Architecture
//!
//! 1. **Lexer**: Converts RQL text to tokens
//! 2. **Parser**: Builds a [`Query`] tree from tokens
//! 3. **Display**: Renders a tree back to RQL text
//!
//! [`Query::walk`] flattens a tree into its leaf comparisons.
//!
//! # Examples
//!
//! ```
//! use facet_query::rql::{Operator, Query};
//!
//! # fn example() -> Result<(), facet_query::rql::RqlError> {
//! let query: Query = "and(in(Mica.sex,(male)),ge(Mica.age,18))".parse()?;
//! let leaves = query.walk();
//! assert_eq!(leaves.len(), 2);
//! assert_eq!(leaves[1].operator, Operator::Ge);
//! # Ok(())
//! # }
//! ```

mod lexer;
mod operator;
mod parser;

pub use lexer::{Lexer, Token};
pub use operator::Operator;
pub use parser::Parser;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading RQL text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RqlError {
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("unexpected end of query")]
    UnexpectedEnd,

    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    #[error("missing closing '{0}'")]
    Unclosed(char),

    #[error("unexpected input after end of query: {0}")]
    TrailingInput(String),

    #[error("invalid percent-encoding in '{0}'")]
    InvalidEncoding(String),

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
}

/// Positional argument of a query node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    /// Result of an integer conversion that found no leading digits
    NotANumber,
    Array(Vec<Value>),
    Query(Query),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_query(&self) -> Option<&Query> {
        match self {
            Value::Query(query) => Some(query),
            _ => None,
        }
    }

    /// Scalar rendered as plain (unencoded) text; `None` for arrays and queries
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(n) => Some(n.to_string()),
            Value::NotANumber => Some("NaN".to_string()),
            Value::Array(_) | Value::Query(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<Query> for Value {
    fn from(query: Query) -> Self {
        Value::Query(query)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => {
                // Keep numeric-looking strings from coming back as numbers
                if parser::is_integer_literal(s) || s == "NaN" {
                    f.write_str("string:")?;
                }
                f.write_str(&urlencoding::encode(s))
            }
            Value::Integer(n) => write!(f, "{}", n),
            Value::NotANumber => f.write_str("NaN"),
            Value::Array(items) => {
                f.write_str("(")?;
                write_list(f, items)?;
                f.write_str(")")
            }
            Value::Query(query) => write!(f, "{}", query),
        }
    }
}

/// One node of a query tree: an operator and its positional arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub operator: Operator,
    pub args: Vec<Value>,
}

impl Query {
    /// Create a node with no arguments
    pub fn new(operator: impl Into<Operator>) -> Self {
        Query {
            operator: operator.into(),
            args: Vec::new(),
        }
    }

    /// Append one positional argument
    pub fn push(&mut self, arg: impl Into<Value>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Builder-style [`Query::push`]
    pub fn with_arg(mut self, arg: impl Into<Value>) -> Self {
        self.push(arg);
        self
    }

    /// Conjunction of the given queries
    pub fn and(children: impl IntoIterator<Item = Query>) -> Self {
        Query {
            operator: Operator::And,
            args: children.into_iter().map(Value::Query).collect(),
        }
    }

    /// Parse RQL text
    pub fn parse(input: &str) -> Result<Self, RqlError> {
        let tokens = Lexer::tokenize(input)?;
        Parser::parse(tokens)
    }

    /// A node whose first argument is a nested query combines sub-queries
    /// rather than comparing a field.
    pub fn is_connective(&self) -> bool {
        matches!(self.args.first(), Some(Value::Query(_)))
    }

    /// Argument at `index`, if present
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// Flatten the tree into its leaf comparisons, in traversal order.
    ///
    /// Connectives are descended into (non-query arguments of a connective
    /// are skipped); a root that is itself a leaf yields just itself.
    pub fn walk(&self) -> Vec<&Query> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        tracing::trace!(leaves = leaves.len(), "walked query tree");
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Query>) {
        if !self.is_connective() {
            leaves.push(self);
            return;
        }

        for child in self.args.iter().filter_map(Value::as_query) {
            child.collect_leaves(leaves);
        }
    }
}

impl FromStr for Query {
    type Err = RqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Query::parse(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operator)?;
        write_list(f, &self.args)?;
        f.write_str(")")
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    // A lone empty string would print as `()`, which reads back as no items
    if let [Value::String(s)] = items {
        if s.is_empty() {
            return f.write_str("string:");
        }
    }

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
