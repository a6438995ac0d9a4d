//! Live filter state for one facet.
//!
//! A [`Criterion`] holds the operator and value currently selected for a
//! vocabulary. It can be rebuilt from a flattened query node, serialized back
//! into one, and rendered as display text. Each variant owns the shape of its
//! value:
//!
//! | kind    | default operator | value                         |
//! |---------|------------------|-------------------------------|
//! | terms   | `in`             | selected term ids             |
//! | numeric | `between`        | `[low, high]`, either blank   |
//! | match   | `match`          | one string                    |
//!
//! Setting a presence operator (`missing`/`exists`) replaces the value with
//! the kind's sentinel: every term, an empty pair, or `*`.
//!
//! # Examples
//!
//! ```
//! use facet_query::criterion::{Criterion, FacetCriterion};
//! use facet_query::rql::Operator;
//! use facet_query::Taxonomy;
//!
//! # fn example() -> anyhow::Result<()> {
//! let taxonomy = Taxonomy::from_json_str(r#"{
//!     "name": "Mica",
//!     "vocabularies": [{
//!         "name": "age",
//!         "title": [{ "locale": "en", "text": "Age" }],
//!         "attributes": [{ "key": "type", "value": "integer" }]
//!     }]
//! }"#)?;
//!
//! let facet = taxonomy.facet("age").unwrap();
//! let mut criterion = Criterion::new(facet);
//! if let Criterion::Numeric(numeric) = &mut criterion {
//!     numeric.set_bounds("18", "");
//! }
//!
//! assert_eq!(criterion.to_query_node("Mica").to_string(), "ge(Mica.age,18)");
//! assert_eq!(criterion.to_string(), "Age:>18");
//!
//! criterion.set_operator(Operator::Missing);
//! assert_eq!(criterion.to_string(), "Age:none");
//! # Ok(())
//! # }
//! ```

mod numeric;
mod terms;
mod text_match;

pub use numeric::{Bounds, NumericCriterion};
pub use terms::TermsCriterion;
pub use text_match::MatchCriterion;

use crate::classifier::CriterionKind;
use crate::localize::{FirstText, Localize};
use crate::rql::{Operator, Query};
use crate::vocabulary::{Facet, Vocabulary};
use std::fmt;

/// Behaviour shared by every criterion variant
pub trait FacetCriterion: fmt::Display {
    /// Vocabulary the criterion filters on
    fn vocabulary(&self) -> &Vocabulary;

    fn operator(&self) -> &Operator;

    /// Change the operator; presence operators reset the value to the
    /// kind's sentinel, anything else leaves the value untouched.
    fn set_operator(&mut self, operator: Operator);

    /// Take operator and value from a flattened query node.
    fn apply_query_node(&mut self, node: &Query);

    /// Serialize into a query node on `<taxonomy>.<vocabulary>`.
    fn to_query_node(&self, taxonomy: &str) -> Query;

    /// Whether the criterion restricts anything beyond its fresh state
    fn is_active(&self) -> bool;
}

/// A criterion of one of the three kinds
pub enum Criterion<'a> {
    Terms(TermsCriterion<'a>),
    Numeric(NumericCriterion<'a>),
    Match(MatchCriterion<'a>),
}

impl<'a> Criterion<'a> {
    /// Fresh criterion rendering titles with [`FirstText`]
    pub fn new(facet: Facet<'a>) -> Self {
        Self::with_localizer(facet, &FirstText)
    }

    /// Fresh criterion with the given localizer
    pub fn with_localizer(facet: Facet<'a>, localizer: &'a dyn Localize) -> Self {
        match facet.kind {
            CriterionKind::Terms => {
                Criterion::Terms(TermsCriterion::new(facet.vocabulary, localizer))
            }
            CriterionKind::Numeric => {
                Criterion::Numeric(NumericCriterion::new(facet.vocabulary, localizer))
            }
            CriterionKind::Match => {
                Criterion::Match(MatchCriterion::new(facet.vocabulary, localizer))
            }
        }
    }

    /// Classify `vocabulary` and build a fresh criterion; `None` when the
    /// vocabulary supports no criterion.
    pub fn from_vocabulary(vocabulary: &'a Vocabulary, localizer: &'a dyn Localize) -> Option<Self> {
        Facet::new(vocabulary).map(|facet| Self::with_localizer(facet, localizer))
    }

    /// Criterion restored from the first node in `nodes` filtering on the
    /// facet, or fresh when there is none.
    pub fn from_query_nodes<'q>(
        facet: Facet<'a>,
        nodes: impl IntoIterator<Item = &'q Query>,
        localizer: &'a dyn Localize,
    ) -> Self {
        let mut criterion = Self::with_localizer(facet, localizer);
        if let Some(node) = facet.find_query_node(nodes) {
            criterion.apply_query_node(node);
        }
        criterion
    }

    pub fn kind(&self) -> CriterionKind {
        match self {
            Criterion::Terms(_) => CriterionKind::Terms,
            Criterion::Numeric(_) => CriterionKind::Numeric,
            Criterion::Match(_) => CriterionKind::Match,
        }
    }

    pub fn name(&self) -> &str {
        &self.vocabulary().name
    }

    fn inner(&self) -> &dyn FacetCriterion {
        match self {
            Criterion::Terms(c) => c,
            Criterion::Numeric(c) => c,
            Criterion::Match(c) => c,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn FacetCriterion {
        match self {
            Criterion::Terms(c) => c,
            Criterion::Numeric(c) => c,
            Criterion::Match(c) => c,
        }
    }
}

impl FacetCriterion for Criterion<'_> {
    fn vocabulary(&self) -> &Vocabulary {
        self.inner().vocabulary()
    }

    fn operator(&self) -> &Operator {
        self.inner().operator()
    }

    fn set_operator(&mut self, operator: Operator) {
        self.inner_mut().set_operator(operator)
    }

    fn apply_query_node(&mut self, node: &Query) {
        self.inner_mut().apply_query_node(node)
    }

    fn to_query_node(&self, taxonomy: &str) -> Query {
        self.inner().to_query_node(taxonomy)
    }

    fn is_active(&self) -> bool {
        self.inner().is_active()
    }
}

impl fmt::Display for Criterion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner(), f)
    }
}

impl fmt::Debug for Criterion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criterion")
            .field("kind", &self.kind())
            .field("vocabulary", &self.name())
            .field("operator", self.operator())
            .finish()
    }
}

/// Dotted field path of a vocabulary
fn field_path(taxonomy: &str, vocabulary: &Vocabulary) -> String {
    format!("{}.{}", taxonomy, vocabulary.name)
}

/// Null-or-whitespace test used for every "empty" check on values
fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// `<title>:none` / `<title>:any` for presence operators
fn write_presence(f: &mut fmt::Formatter<'_>, title: &str, operator: &Operator) -> fmt::Result {
    let text = if *operator == Operator::Missing { "none" } else { "any" };
    write!(f, "{}:{}", title, text)
}
