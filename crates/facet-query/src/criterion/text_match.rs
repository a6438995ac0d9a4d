//! Free-text match over string or localized vocabularies.
//!
//! Match nodes put the searched text first and the field path second
//! (`match(cancer,Mica.name)`), the reverse of the other kinds.

use super::{field_path, is_blank, write_presence, FacetCriterion};
use crate::localize::Localize;
use crate::rql::{Operator, Query, Value};
use crate::vocabulary::Vocabulary;
use std::fmt;

/// Text matched by presence operators
const WILDCARD: &str = "*";

/// Criterion over a textual vocabulary
pub struct MatchCriterion<'a> {
    vocabulary: &'a Vocabulary,
    localizer: &'a dyn Localize,
    operator: Operator,
    value: String,
}

impl<'a> MatchCriterion<'a> {
    pub fn new(vocabulary: &'a Vocabulary, localizer: &'a dyn Localize) -> Self {
        Self {
            vocabulary,
            localizer,
            operator: Operator::Match,
            value: String::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

impl FacetCriterion for MatchCriterion<'_> {
    fn vocabulary(&self) -> &Vocabulary {
        self.vocabulary
    }

    fn operator(&self) -> &Operator {
        &self.operator
    }

    fn set_operator(&mut self, operator: Operator) {
        self.operator = operator;
        if self.operator.is_presence() {
            self.value = WILDCARD.to_string();
        }
    }

    fn apply_query_node(&mut self, node: &Query) {
        self.operator = node.operator.clone();
        self.value = node.arg(0).and_then(Value::to_text).unwrap_or_default();
    }

    fn to_query_node(&self, taxonomy: &str) -> Query {
        let text = if is_blank(&self.value) {
            ""
        } else {
            self.value.as_str()
        };

        Query::new(self.operator.clone())
            .with_arg(text)
            .with_arg(field_path(taxonomy, self.vocabulary))
    }

    fn is_active(&self) -> bool {
        self.operator.is_presence() || !is_blank(&self.value)
    }
}

impl fmt::Display for MatchCriterion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.localizer.localize(&self.vocabulary.title);

        if self.operator.is_presence() {
            return write_presence(f, &title, &self.operator);
        }

        if is_blank(&self.value) {
            f.write_str(&title)
        } else {
            write!(f, "{}:match({})", title, self.value)
        }
    }
}
