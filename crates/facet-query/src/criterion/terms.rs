//! Selection among a vocabulary's enumerated terms.

use super::{field_path, write_presence, FacetCriterion};
use crate::localize::Localize;
use crate::rql::{Operator, Query, Value};
use crate::vocabulary::Vocabulary;
use std::fmt;

/// Beyond this many selected terms the display text is elided
const MAX_LISTED_TERMS: usize = 5;

/// Criterion over an enumerable vocabulary
pub struct TermsCriterion<'a> {
    vocabulary: &'a Vocabulary,
    localizer: &'a dyn Localize,
    operator: Operator,
    value: Vec<String>,
}

impl<'a> TermsCriterion<'a> {
    pub fn new(vocabulary: &'a Vocabulary, localizer: &'a dyn Localize) -> Self {
        Self {
            vocabulary,
            localizer,
            operator: Operator::In,
            value: Vec::new(),
        }
    }

    /// Selected term ids
    pub fn value(&self) -> &[String] {
        &self.value
    }

    pub fn set_value(&mut self, value: Vec<String>) {
        self.value = value;
    }

    /// Whether every term counts as selected
    pub fn is_complete(&self) -> bool {
        self.value.len() == self.vocabulary.terms().len()
    }
}

impl FacetCriterion for TermsCriterion<'_> {
    fn vocabulary(&self) -> &Vocabulary {
        self.vocabulary
    }

    fn operator(&self) -> &Operator {
        &self.operator
    }

    fn set_operator(&mut self, operator: Operator) {
        self.operator = operator;
        if self.operator.is_presence() {
            self.value = self.vocabulary.term_names();
        }
    }

    fn apply_query_node(&mut self, node: &Query) {
        self.operator = node.operator.clone();

        // Presence nodes carry no term list, so the selected ids are lost
        self.value = if self.operator.is_presence() {
            self.vocabulary.term_names()
        } else {
            match node.arg(1) {
                Some(Value::Array(items)) => items.iter().filter_map(Value::to_text).collect(),
                Some(scalar) => scalar.to_text().into_iter().collect(),
                None => Vec::new(),
            }
        };
    }

    fn to_query_node(&self, taxonomy: &str) -> Query {
        let operator = if self.is_complete() {
            if self.operator.is_presence() {
                self.operator.clone()
            } else {
                Operator::Exists
            }
        } else if self.operator.is_membership() {
            self.operator.clone()
        } else {
            Operator::In
        };

        let mut query = Query::new(operator);
        query.push(field_path(taxonomy, self.vocabulary));

        if !query.operator.is_presence() {
            query.push(self.value.clone());
        }

        query
    }

    fn is_active(&self) -> bool {
        self.operator.is_presence() || !self.value.is_empty()
    }
}

impl fmt::Display for TermsCriterion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operator.is_presence() {
            let title = self.localizer.localize(&self.vocabulary.title);
            return write_presence(f, &title, &self.operator);
        }

        if self.value.len() > MAX_LISTED_TERMS {
            let title = self.localizer.localize(&self.vocabulary.title);
            return write!(f, "{}:...", title);
        }

        let labels: Vec<&str> = self
            .value
            .iter()
            .map(|id| {
                self.vocabulary
                    .term(id)
                    .and_then(|term| term.title.first_text())
                    .unwrap_or(id.as_str())
            })
            .collect();

        f.write_str(&labels.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::test_support::terms_vocabulary;
    use crate::localize::FirstText;
    use proptest::prelude::*;

    fn sex() -> Vocabulary {
        terms_vocabulary(
            "sex",
            "Sex",
            &[("male", "Male"), ("female", "Female"), ("other", "Other")],
        )
    }

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_serialize_partial_selection() {
        let vocabulary = sex();
        let mut criterion = TermsCriterion::new(&vocabulary, &FirstText);
        criterion.set_value(strings(&["male"]));

        assert_eq!(
            criterion.to_query_node("Mica").to_string(),
            "in(Mica.sex,(male))"
        );
    }

    #[test]
    fn test_serialize_keeps_out_operator() {
        let vocabulary = sex();
        let mut criterion = TermsCriterion::new(&vocabulary, &FirstText);
        criterion.set_operator(Operator::Out);
        criterion.set_value(strings(&["male", "other"]));

        assert_eq!(
            criterion.to_query_node("Mica").to_string(),
            "out(Mica.sex,(male,other))"
        );
    }

    #[test]
    fn test_serialize_partial_selection_collapses_unknown_operator_to_in() {
        let vocabulary = sex();
        let mut criterion = TermsCriterion::new(&vocabulary, &FirstText);
        criterion.set_operator(Operator::Other("like".to_string()));
        criterion.set_value(strings(&["female"]));

        assert_eq!(criterion.to_query_node("Mica").operator, Operator::In);
    }

    #[test]
    fn test_serialize_full_selection_collapses_to_exists() {
        let vocabulary = sex();
        let mut criterion = TermsCriterion::new(&vocabulary, &FirstText);
        criterion.set_value(strings(&["male", "female", "other"]));

        let node = criterion.to_query_node("Mica");
        assert_eq!(node.to_string(), "exists(Mica.sex)");

        // Round trip recovers the full set
        let mut restored = TermsCriterion::new(&vocabulary, &FirstText);
        restored.apply_query_node(&node);
        assert_eq!(*restored.operator(), Operator::Exists);
        assert_eq!(restored.value(), ["male", "female", "other"]);
    }

    #[test]
    fn test_serialize_missing_omits_value() {
        let vocabulary = sex();
        let mut criterion = TermsCriterion::new(&vocabulary, &FirstText);
        criterion.set_operator(Operator::Missing);

        assert_eq!(
            criterion.to_query_node("Mica").to_string(),
            "missing(Mica.sex)"
        );
    }

    #[test]
    fn test_presence_ingest_is_lossy() {
        let vocabulary = sex();
        let mut criterion = TermsCriterion::new(&vocabulary, &FirstText);
        criterion.set_value(strings(&["male"]));

        // `missing(Mica.sex,(male))` still yields every term
        let node: Query = "missing(Mica.sex,(male))".parse().unwrap();
        criterion.apply_query_node(&node);

        assert_eq!(criterion.value(), ["male", "female", "other"]);
    }

    #[test]
    fn test_ingest_scalar_is_wrapped() {
        let vocabulary = sex();
        let mut criterion = TermsCriterion::new(&vocabulary, &FirstText);
        criterion.apply_query_node(&"in(Mica.sex,female)".parse().unwrap());

        assert_eq!(criterion.value(), ["female"]);
    }

    #[test]
    fn test_ingest_numeric_ids_as_text() {
        let vocabulary = terms_vocabulary("year", "Year", &[("2019", "2019"), ("2020", "2020")]);
        let mut criterion = TermsCriterion::new(&vocabulary, &FirstText);
        criterion.apply_query_node(&"in(Mica.year,(2019))".parse().unwrap());

        assert_eq!(criterion.value(), ["2019"]);
    }

    #[test]
    fn test_ingest_without_values() {
        let vocabulary = sex();
        let mut criterion = TermsCriterion::new(&vocabulary, &FirstText);
        criterion.apply_query_node(&"in(Mica.sex)".parse().unwrap());

        assert!(criterion.value().is_empty());
    }

    #[test]
    fn test_blank_id_survives_text_round_trip() {
        let vocabulary = sex();
        let mut criterion = TermsCriterion::new(&vocabulary, &FirstText);
        criterion.set_value(strings(&[""]));

        let text = criterion.to_query_node("Mica").to_string();
        assert_eq!(text, "in(Mica.sex,(string:))");

        let mut restored = TermsCriterion::new(&vocabulary, &FirstText);
        restored.apply_query_node(&text.parse().unwrap());
        assert_eq!(restored.value(), [""]);
    }

    #[test]
    fn test_display_term_titles() {
        let vocabulary = sex();
        let mut criterion = TermsCriterion::new(&vocabulary, &FirstText);
        criterion.set_value(strings(&["male", "unknown", "other"]));

        assert_eq!(criterion.to_string(), "Male | unknown | Other");
    }

    #[test]
    fn test_display_presence() {
        let vocabulary = sex();
        let mut criterion = TermsCriterion::new(&vocabulary, &FirstText);

        criterion.set_operator(Operator::Missing);
        assert_eq!(criterion.to_string(), "Sex:none");

        criterion.set_operator(Operator::Exists);
        assert_eq!(criterion.to_string(), "Sex:any");
    }

    #[test]
    fn test_display_elides_long_selection() {
        let vocabulary = terms_vocabulary(
            "country",
            "Country",
            &[
                ("ca", "Canada"),
                ("fr", "France"),
                ("de", "Germany"),
                ("it", "Italy"),
                ("es", "Spain"),
                ("pt", "Portugal"),
                ("uk", "United Kingdom"),
            ],
        );
        let mut criterion = TermsCriterion::new(&vocabulary, &FirstText);

        criterion.set_value(strings(&["ca", "fr", "de", "it", "es"]));
        assert_eq!(criterion.to_string(), "Canada | France | Germany | Italy | Spain");

        criterion.set_value(strings(&["ca", "fr", "de", "it", "es", "pt"]));
        assert_eq!(criterion.to_string(), "Country:...");
    }

    proptest! {
        #[test]
        fn prop_partial_selection_round_trips(
            mask in prop::collection::vec(any::<bool>(), 6)
        ) {
            let ids = ["a", "b", "c", "d", "e", "f"];
            let vocabulary = terms_vocabulary(
                "letters",
                "Letters",
                &ids.iter().map(|id| (*id, *id)).collect::<Vec<_>>(),
            );
            let selected: Vec<String> = ids
                .iter()
                .zip(&mask)
                .filter(|(_, keep)| **keep)
                .map(|(id, _)| id.to_string())
                .collect();
            prop_assume!(selected.len() < ids.len());

            let mut criterion = TermsCriterion::new(&vocabulary, &FirstText);
            criterion.set_value(selected.clone());
            let node = criterion.to_query_node("Tx");

            let mut restored = TermsCriterion::new(&vocabulary, &FirstText);
            restored.apply_query_node(&node);

            prop_assert_eq!(restored.operator(), &Operator::In);
            prop_assert_eq!(restored.value(), selected.as_slice());
        }
    }
}
