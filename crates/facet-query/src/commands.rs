//! Command implementations behind the CLI.
//!
//! Each command returns a serializable report; printing is left to the
//! binary so the same results back both text and JSON output.

use crate::classifier::CriterionKind;
use crate::config::FacetQueryConfig;
use crate::criteria::CriteriaSet;
use crate::criterion::{Criterion, FacetCriterion};
use crate::rql::{Operator, Query, RqlError};
use crate::vocabulary::{Taxonomy, TaxonomyDocument};
use anyhow::Result;
use serde::Serialize;
use thiserror::Error;

/// Failures with a dedicated exit code
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Vocabulary not found: {0}")]
    VocabularyNotFound(String),

    #[error("Vocabulary '{0}' supports no criterion (no terms, numeric type or text attribute)")]
    NoCriterion(String),

    #[error("Invalid query: {0}")]
    Query(#[from] RqlError),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Classification of one vocabulary
#[derive(Debug, Serialize)]
pub struct ClassifiedVocabulary {
    pub name: String,
    pub kind: Option<CriterionKind>,
}

/// State of one criterion
#[derive(Debug, Serialize)]
pub struct CriterionReport {
    pub vocabulary: String,
    pub kind: CriterionKind,
    pub operator: Operator,
    pub active: bool,
    pub display: String,
    pub query: String,
    pub node: Query,
}

impl CriterionReport {
    fn new(criterion: &Criterion<'_>, prefix: &str) -> Self {
        let node = criterion.to_query_node(prefix);
        CriterionReport {
            vocabulary: criterion.name().to_string(),
            kind: criterion.kind(),
            operator: criterion.operator().clone(),
            active: criterion.is_active(),
            display: criterion.to_string(),
            query: node.to_string(),
            node,
        }
    }
}

/// Every criterion of a taxonomy plus the combined query
#[derive(Debug, Serialize)]
pub struct BuildReport {
    pub criteria: Vec<CriterionReport>,
    pub display: String,
    pub query: Option<String>,
}

/// Runs commands against a loaded configuration
pub struct CommandExecutor {
    config: FacetQueryConfig,
}

impl CommandExecutor {
    pub fn new(config: FacetQueryConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, taxonomy: &Taxonomy) -> Vec<ClassifiedVocabulary> {
        taxonomy
            .vocabularies()
            .iter()
            .map(|v| ClassifiedVocabulary {
                name: v.name.clone(),
                kind: taxonomy.kind_of(&v.name),
            })
            .collect()
    }

    pub fn walk(&self, query: &str) -> Result<Vec<Query>> {
        let query = parse_query(query)?;
        Ok(query.walk().into_iter().cloned().collect())
    }

    pub fn show(
        &self,
        taxonomy: &Taxonomy,
        vocabulary: &str,
        query: Option<&str>,
        prefix: Option<&str>,
    ) -> Result<CriterionReport> {
        self.edit(taxonomy, vocabulary, query, None, &[], prefix)
    }

    /// Restore the criterion from `query`, apply `values` then `operator`,
    /// and report the result.
    ///
    /// The operator goes last so a presence operator's sentinel wins over
    /// any values given alongside it.
    pub fn edit(
        &self,
        taxonomy: &Taxonomy,
        vocabulary: &str,
        query: Option<&str>,
        operator: Option<&str>,
        values: &[String],
        prefix: Option<&str>,
    ) -> Result<CriterionReport> {
        let facet = match taxonomy.facet(vocabulary) {
            Some(facet) => facet,
            None if taxonomy.vocabulary(vocabulary).is_some() => {
                return Err(CommandError::NoCriterion(vocabulary.to_string()).into())
            }
            None => return Err(CommandError::VocabularyNotFound(vocabulary.to_string()).into()),
        };

        let query = query.map(parse_query).transpose()?;
        let nodes = query.as_ref().map(Query::walk).unwrap_or_default();
        let localizer = self.config.localizer();

        let mut criterion = Criterion::from_query_nodes(facet, nodes.iter().copied(), &*localizer);

        if !values.is_empty() {
            apply_values(&mut criterion, values)?;
        }
        if let Some(operator) = operator {
            criterion.set_operator(Operator::from(operator));
        }

        let prefix = self.prefix(taxonomy, prefix);
        Ok(CriterionReport::new(&criterion, &prefix))
    }

    pub fn build(
        &self,
        taxonomy: &Taxonomy,
        query: Option<&str>,
        prefix: Option<&str>,
    ) -> Result<BuildReport> {
        let query = query.map(parse_query).transpose()?;
        let localizer = self.config.localizer();
        let set = CriteriaSet::new(taxonomy, query.as_ref(), &*localizer);
        let prefix = self.prefix(taxonomy, prefix);

        Ok(BuildReport {
            criteria: set
                .iter()
                .map(|criterion| CriterionReport::new(criterion, &prefix))
                .collect(),
            display: set.to_string(),
            query: set.to_query(&prefix).map(|q| q.to_string()),
        })
    }

    /// JSON Schema of the taxonomy file format
    pub fn schema(&self) -> serde_json::Value {
        let schema = schemars::schema_for!(TaxonomyDocument);
        serde_json::to_value(schema).unwrap_or_default()
    }

    fn prefix(&self, taxonomy: &Taxonomy, prefix: Option<&str>) -> String {
        prefix
            .map(str::to_string)
            .unwrap_or_else(|| self.config.taxonomy_prefix(taxonomy))
    }
}

fn parse_query(text: &str) -> Result<Query, CommandError> {
    Ok(Query::parse(text)?)
}

/// Set the criterion's value from command-line strings
fn apply_values(criterion: &mut Criterion<'_>, values: &[String]) -> Result<(), CommandError> {
    match criterion {
        Criterion::Terms(terms) => terms.set_value(values.to_vec()),
        Criterion::Numeric(numeric) => {
            if values.len() > 2 {
                return Err(CommandError::InvalidValue(format!(
                    "numeric vocabulary takes LOW and HIGH, got {} values",
                    values.len()
                )));
            }
            let low = values.first().cloned().unwrap_or_default();
            let high = values.get(1).cloned().unwrap_or_default();
            numeric.set_bounds(low, high);
        }
        Criterion::Match(text) => text.set_value(values.join(" ")),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAXONOMY: &str = r#"{
        "name": "Mica",
        "vocabularies": [
            {
                "name": "sex",
                "title": [{ "locale": "en", "text": "Sex" }, { "locale": "fr", "text": "Sexe" }],
                "terms": [
                    { "name": "male", "title": [{ "locale": "en", "text": "Male" }] },
                    { "name": "female", "title": [{ "locale": "en", "text": "Female" }] }
                ]
            },
            {
                "name": "age",
                "title": [{ "locale": "en", "text": "Age" }],
                "attributes": [{ "key": "type", "value": "integer" }]
            },
            { "name": "blob" }
        ]
    }"#;

    fn executor() -> CommandExecutor {
        CommandExecutor::new(FacetQueryConfig::default())
    }

    fn taxonomy() -> Taxonomy {
        Taxonomy::from_json_str(TAXONOMY).unwrap()
    }

    #[test]
    fn test_classify_lists_all_vocabularies() {
        let report = executor().classify(&taxonomy());

        assert_eq!(report.len(), 3);
        assert_eq!(report[0].kind, Some(CriterionKind::Terms));
        assert_eq!(report[1].kind, Some(CriterionKind::Numeric));
        assert_eq!(report[2].kind, None);
    }

    #[test]
    fn test_walk() {
        let leaves = executor()
            .walk("and(exists(Mica.sex),le(Mica.age,3))")
            .unwrap();
        assert_eq!(leaves.len(), 2);
    }

    #[test]
    fn test_walk_invalid_query() {
        let err = executor().walk("and(").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::Query(_))
        ));
    }

    #[test]
    fn test_edit_numeric_values() {
        let report = executor()
            .edit(&taxonomy(), "age", None, None, &["".to_string(), "40".to_string()], None)
            .unwrap();

        assert_eq!(report.query, "le(Mica.age,40)");
        assert_eq!(report.display, "Age:<40");
        assert!(report.active);
    }

    #[test]
    fn test_edit_operator_wins_over_values() {
        let report = executor()
            .edit(
                &taxonomy(),
                "sex",
                None,
                Some("missing"),
                &["male".to_string()],
                Some("Study"),
            )
            .unwrap();

        assert_eq!(report.query, "missing(Study.sex)");
        assert_eq!(report.display, "Sex:none");
    }

    #[test]
    fn test_show_restores_from_query() {
        let report = executor()
            .show(&taxonomy(), "sex", Some("and(in(Mica.sex,(female)))"), None)
            .unwrap();

        assert_eq!(report.operator, Operator::In);
        assert_eq!(report.display, "Female");
    }

    #[test]
    fn test_show_uses_configured_locale() {
        let config: FacetQueryConfig = toml::from_str("[display]\nlocale = \"fr\"").unwrap();
        let report = CommandExecutor::new(config)
            .edit(&taxonomy(), "sex", None, Some("exists"), &[], None)
            .unwrap();

        assert_eq!(report.display, "Sexe:any");
    }

    #[test]
    fn test_unknown_and_unclassifiable_vocabularies() {
        let err = executor().show(&taxonomy(), "nope", None, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::VocabularyNotFound(_))
        ));

        let err = executor().show(&taxonomy(), "blob", None, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::NoCriterion(_))
        ));
    }

    #[test]
    fn test_too_many_numeric_values() {
        let values = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        let err = executor()
            .edit(&taxonomy(), "age", None, None, &values, None)
            .unwrap_err();
        assert!(err.to_string().contains("LOW and HIGH"));
    }

    #[test]
    fn test_build_combines_active_criteria() {
        let report = executor()
            .build(&taxonomy(), Some("and(exists(Mica.sex),ge(Mica.age,18))"), None)
            .unwrap();

        assert_eq!(report.criteria.len(), 2);
        assert_eq!(report.display, "Sex:any, Age:>18");
        assert_eq!(
            report.query.as_deref(),
            Some("and(exists(Mica.sex),ge(Mica.age,18))")
        );
    }

    #[test]
    fn test_schema_describes_vocabularies() {
        let schema = executor().schema();
        assert!(schema.to_string().contains("vocabularies"));
    }
}
