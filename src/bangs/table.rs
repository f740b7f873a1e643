use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Language key used when a bang has a single template for every language.
pub const ANY_LANG: &str = "any";
/// Placeholder replaced by the leftover search terms.
pub const SEARCH_PLACEHOLDER: &str = "{{{s}}}";
/// Placeholder replaced by the request language.
pub const LANG_PLACEHOLDER: &str = "{{{lang}}}";

const BUILTIN_BANGS: &str = include_str!("../../data/bangs.json");

/// One shortcut token and its redirect templates, keyed by language code or `"any"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct BangEntry {
    pub redirects: HashMap<String, String>,
}

impl BangEntry {
    /// Template for `lang`, falling back to the `"any"` template.
    pub fn template_for(&self, lang: &str) -> Option<&str> {
        self.redirects
            .get(lang)
            .or_else(|| self.redirects.get(ANY_LANG))
            .map(String::as_str)
    }
}

/// Read-only bang definitions, shared by every request once loaded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct BangTable {
    entries: HashMap<String, BangEntry>,
}

impl BangTable {
    /// The table embedded in the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_BANGS).context("Built-in bang table is invalid")
    }

    /// Loads the table from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read bang table {}", path.display()))?;
        let table = Self::from_json(&content)
            .with_context(|| format!("Failed to parse bang table {}", path.display()))?;

        tracing::info!("Loaded {} bangs from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let table: BangTable = serde_json::from_str(json)?;
        Ok(table)
    }

    /// Looks up a token without its leading `!`. Matching is case-sensitive.
    pub fn get(&self, token: &str) -> Option<&BangEntry> {
        self.entries.get(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, BangEntry)> for BangTable {
    fn from_iter<I: IntoIterator<Item = (String, BangEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
