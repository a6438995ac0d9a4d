//! Facet Query Library
//!
//! Translates faceted-search filter state to and from RQL query trees.
//! Vocabularies of a taxonomy are classified into terms, numeric or match
//! criteria; each criterion restores itself from a flattened query, can be
//! edited, and serializes back into a query node plus display text.

pub mod classifier;
pub mod cli;
pub mod commands;
pub mod config;
pub mod criteria;
pub mod criterion;
pub mod localize;
pub mod output;
pub mod rql;
pub mod vocabulary;

// Re-export commonly used types
pub use classifier::{classify, find_matching_query_node, CriterionKind};
pub use commands::CommandExecutor;
pub use criteria::CriteriaSet;
pub use criterion::{Criterion, FacetCriterion};
pub use localize::{FirstText, Localize, PreferredLocale};
pub use output::{ExitCode, JsonError, JsonOutput};
pub use rql::{Operator, Query, RqlError, Value};
pub use vocabulary::{Facet, Taxonomy, Vocabulary};
