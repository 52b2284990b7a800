use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CliError;
use crate::json_file::read_json;

/// One record of the product database export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erp_id: Option<Value>,

    #[serde(rename = "isActive", default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

pub fn load_canonical(path: &Path) -> Result<Vec<CanonicalRecord>, CliError> {
    read_json(path)
}

/// Record names in file order. With `active_only`, records without
/// `isActive: true` are dropped. Blank names are skipped.
pub fn canonical_names(records: &[CanonicalRecord], active_only: bool) -> Vec<String> {
    records
        .iter()
        .filter(|r| !active_only || r.is_active == Some(true))
        .filter_map(|r| {
            let name = r.name.trim();
            if name.is_empty() {
                tracing::warn!(target: "witsync.model", erp_id = ?r.erp_id, "skipping record with blank name");
                None
            } else {
                Some(r.name.clone())
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// A Wit.ai keyword entity as stored under `entities/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDocument {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub lookups: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<KeywordEntry>,
    /// Fields this tool does not manage, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntityDocument {
    pub fn new(name: impl Into<String>, roles: Vec<String>, lookups: Vec<String>) -> Self {
        Self {
            name: name.into(),
            roles,
            lookups,
            keywords: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn keyword_names(&self) -> Vec<String> {
        self.keywords.iter().map(|k| k.keyword.clone()).collect()
    }
}

/// Intents are forwarded as-is; only the name is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDocument {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IntentDocument {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }
}
