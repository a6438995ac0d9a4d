//! Taxonomy and vocabulary definitions.
//!
//! A taxonomy groups vocabularies (facets). Each vocabulary is classified
//! once, when the taxonomy is loaded, into the kind of criterion it supports.

use crate::classifier::{self, CriterionKind};
use crate::rql::Query;
use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Text in one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LocalizedString {
    pub locale: String,
    pub text: String,
}

/// Localizable text: ordered `{locale, text}` entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct LocalizedText(pub Vec<LocalizedString>);

impl LocalizedText {
    /// Text with a single entry
    pub fn single(locale: impl Into<String>, text: impl Into<String>) -> Self {
        LocalizedText(vec![LocalizedString {
            locale: locale.into(),
            text: text.into(),
        }])
    }

    pub fn first_text(&self) -> Option<&str> {
        self.0.first().map(|entry| entry.text.as_str())
    }

    pub fn for_locale(&self, locale: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|entry| entry.locale == locale)
            .map(|entry| entry.text.as_str())
    }
}

/// One enumerable value of a vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Term {
    pub name: String,
    #[serde(default)]
    pub title: LocalizedText,
}

/// Facet metadata entry (e.g. `type = integer`, `localized = true`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// A named, typed, filterable attribute of a taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Vocabulary {
    /// Unique within its taxonomy
    pub name: String,
    #[serde(default)]
    pub title: LocalizedText,
    /// Present only for enumerable vocabularies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<Vec<Term>>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Vocabulary {
    /// Terms, or an empty slice for non-enumerable vocabularies
    pub fn terms(&self) -> &[Term] {
        self.terms.as_deref().unwrap_or(&[])
    }

    pub fn term(&self, name: &str) -> Option<&Term> {
        self.terms().iter().find(|term| term.name == name)
    }

    /// Ids of every term, in declaration order
    pub fn term_names(&self) -> Vec<String> {
        self.terms().iter().map(|term| term.name.clone()).collect()
    }
}

/// A vocabulary together with its criterion kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Facet<'a> {
    pub vocabulary: &'a Vocabulary,
    pub kind: CriterionKind,
}

impl<'a> Facet<'a> {
    /// Classify a standalone vocabulary; `None` if no criterion applies
    pub fn new(vocabulary: &'a Vocabulary) -> Option<Self> {
        classifier::classify(vocabulary).map(|kind| Facet { vocabulary, kind })
    }

    pub fn name(&self) -> &'a str {
        &self.vocabulary.name
    }

    /// First node in `nodes` that filters on this facet
    pub fn find_query_node<'q>(
        &self,
        nodes: impl IntoIterator<Item = &'q Query>,
    ) -> Option<&'q Query> {
        classifier::find_node_for_kind(self.kind, self.vocabulary, nodes)
    }
}

/// On-disk taxonomy document
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TaxonomyDocument {
    pub name: String,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub vocabularies: Vec<Vocabulary>,
}

/// A loaded taxonomy with each vocabulary classified
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "TaxonomyDocument")]
pub struct Taxonomy {
    pub name: String,
    pub title: LocalizedText,
    vocabularies: Vec<Vocabulary>,
    kinds: Vec<Option<CriterionKind>>,
}

impl From<TaxonomyDocument> for Taxonomy {
    fn from(document: TaxonomyDocument) -> Self {
        let kinds = document
            .vocabularies
            .iter()
            .map(|vocabulary| {
                let kind = classifier::classify(vocabulary);
                if kind.is_none() {
                    tracing::debug!(
                        taxonomy = %document.name,
                        vocabulary = %vocabulary.name,
                        "vocabulary has no criterion kind, skipping"
                    );
                }
                kind
            })
            .collect();

        Taxonomy {
            name: document.name,
            title: document.title,
            vocabularies: document.vocabularies,
            kinds,
        }
    }
}

impl Taxonomy {
    /// Parse a taxonomy from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse taxonomy JSON")
    }

    /// Load a taxonomy from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read taxonomy file {}", path.display()))?;

        Self::from_json_str(&content)
            .with_context(|| format!("Invalid taxonomy file {}", path.display()))
    }

    /// All vocabularies, classifiable or not
    pub fn vocabularies(&self) -> &[Vocabulary] {
        &self.vocabularies
    }

    pub fn vocabulary(&self, name: &str) -> Option<&Vocabulary> {
        self.vocabularies.iter().find(|v| v.name == name)
    }

    /// Kind computed at load time; `None` if unknown or unclassifiable
    pub fn kind_of(&self, name: &str) -> Option<CriterionKind> {
        self.vocabularies
            .iter()
            .position(|v| v.name == name)
            .and_then(|index| self.kinds[index])
    }

    /// Facets of every classifiable vocabulary, in declaration order
    pub fn facets(&self) -> impl Iterator<Item = Facet<'_>> {
        self.vocabularies
            .iter()
            .zip(&self.kinds)
            .filter_map(|(vocabulary, kind)| kind.map(|kind| Facet { vocabulary, kind }))
    }

    pub fn facet(&self, name: &str) -> Option<Facet<'_>> {
        self.facets().find(|facet| facet.name() == name)
    }
}
