//! Configuration file loading and parsing.
//!
//! The CLI reads an optional `facet-query.toml`. If no config file exists,
//! the system falls back to defaults.

use crate::localize::{FirstText, Localize, PreferredLocale};
use crate::vocabulary::Taxonomy;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "facet-query.toml";

/// Root configuration structure loaded from `facet-query.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacetQueryConfig {
    /// Query serialization settings (optional).
    pub query: Option<QueryConfig>,
    /// Display text settings (optional).
    pub display: Option<DisplayConfig>,
}

/// Query serialization settings.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    /// Field path prefix for emitted nodes (default: the taxonomy name).
    pub taxonomy_prefix: Option<String>,
}

/// Display text settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// Preferred title locale (default: first title entry).
    pub locale: Option<String>,
}

impl FacetQueryConfig {
    /// Load configuration from `path` if it exists.
    ///
    /// Returns the default config if the file doesn't exist.
    /// Returns an error if the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(FacetQueryConfig::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: FacetQueryConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    /// Field path prefix, defaulting to the taxonomy name.
    pub fn taxonomy_prefix(&self, taxonomy: &Taxonomy) -> String {
        self.query
            .as_ref()
            .and_then(|q| q.taxonomy_prefix.clone())
            .unwrap_or_else(|| taxonomy.name.clone())
    }

    /// Preferred locale, if configured.
    pub fn locale(&self) -> Option<&str> {
        self.display.as_ref().and_then(|d| d.locale.as_deref())
    }

    /// Localizer matching the display settings.
    pub fn localizer(&self) -> Box<dyn Localize> {
        match self.locale() {
            Some(locale) => Box::new(PreferredLocale::new(locale)),
            None => Box::new(FirstText),
        }
    }
}
