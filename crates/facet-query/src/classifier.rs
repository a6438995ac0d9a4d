//! Vocabulary classification and query-node matching.
//!
//! Classification is a pure function of a vocabulary's terms and
//! attributes. Matching locates the leaf node that filters on a facet
//! within a flattened query (see [`Query::walk`]).

use crate::rql::{Operator, Query, Value};
use crate::vocabulary::Vocabulary;
use serde::Serialize;
use std::fmt;

/// Kind of criterion a vocabulary supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriterionKind {
    /// Enumerable: selection among the vocabulary's terms
    Terms,
    /// Integer or decimal range
    Numeric,
    /// Free-text match
    Match,
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CriterionKind::Terms => "TERMS",
            CriterionKind::Numeric => "NUMERIC",
            CriterionKind::Match => "MATCH",
        };
        f.write_str(name)
    }
}

/// Determine which criterion kind a vocabulary supports.
///
/// First match wins: non-empty terms, then exactly one numeric `type`
/// attribute, then a `localized = true` or `type = string` attribute.
/// `None` means no criterion can be built for the vocabulary.
pub fn classify(vocabulary: &Vocabulary) -> Option<CriterionKind> {
    if !vocabulary.terms().is_empty() {
        return Some(CriterionKind::Terms);
    }

    let numeric_types = vocabulary
        .attributes
        .iter()
        .filter(|a| a.key == "type" && matches!(a.value.as_str(), "integer" | "decimal"))
        .count();
    if numeric_types == 1 {
        return Some(CriterionKind::Numeric);
    }

    let textual = vocabulary.attributes.iter().any(|a| {
        (a.key == "localized" && a.value == "true") || (a.key == "type" && a.value == "string")
    });
    if textual {
        return Some(CriterionKind::Match);
    }

    None
}

/// First node in `nodes` that filters on `vocabulary`.
///
/// Returns `None` when the vocabulary is unclassifiable or nothing matches.
pub fn find_matching_query_node<'q>(
    vocabulary: &Vocabulary,
    nodes: impl IntoIterator<Item = &'q Query>,
) -> Option<&'q Query> {
    let kind = classify(vocabulary)?;
    find_node_for_kind(kind, vocabulary, nodes)
}

/// Matching with an already known kind.
///
/// Terms and numeric nodes carry the field path first; match nodes carry it
/// second and must use the `match` operator.
pub(crate) fn find_node_for_kind<'q>(
    kind: CriterionKind,
    vocabulary: &Vocabulary,
    nodes: impl IntoIterator<Item = &'q Query>,
) -> Option<&'q Query> {
    let found = nodes.into_iter().find(|node| match kind {
        CriterionKind::Terms | CriterionKind::Numeric => {
            field_name(node.arg(0)) == Some(vocabulary.name.as_str())
        }
        CriterionKind::Match => {
            node.operator == Operator::Match
                && field_name(node.arg(1)) == Some(vocabulary.name.as_str())
        }
    });

    if let Some(node) = found {
        tracing::debug!(vocabulary = %vocabulary.name, %kind, node = %node, "matched query node");
    }
    found
}

/// Second segment of a dotted field path (`taxonomy.vocabulary`)
fn field_name(arg: Option<&Value>) -> Option<&str> {
    arg?.as_str()?.split('.').nth(1)
}
