//! The local mirror of a Wit.ai entity and the edits applied to it.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::diff::{synchronize, CasePolicy, DiffResult};
use crate::error::CliError;
use crate::json_file::{read_json, write_json};
use crate::model::{EntityDocument, KeywordEntry};

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("WHITESPACE_RUN is valid");
}

/// Synonyms generated for a newly added keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynonymStyle {
    /// `[name]`
    #[default]
    Plain,
    /// `[name, lowercase, whitespace-normalized]`, deduplicated.
    Expanded,
}

pub fn build_entry(name: &str, style: SynonymStyle) -> KeywordEntry {
    let mut synonyms = vec![name.to_string()];
    if style == SynonymStyle::Expanded {
        for variant in [
            name.to_lowercase(),
            WHITESPACE_RUN.replace_all(name, " ").into_owned(),
        ] {
            if !synonyms.contains(&variant) {
                synonyms.push(variant);
            }
        }
    }
    KeywordEntry {
        keyword: name.to_string(),
        synonyms,
    }
}

/// Drop every entry whose keyword is listed in `to_remove`.
pub fn clean(doc: &mut EntityDocument, to_remove: &[String], policy: CasePolicy) -> usize {
    let before = doc.keywords.len();
    doc.keywords
        .retain(|entry| !to_remove.iter().any(|r| policy.matches(r, &entry.keyword)));
    before - doc.keywords.len()
}

/// Append one entry per name in `to_add`.
pub fn add(doc: &mut EntityDocument, to_add: &[String], style: SynonymStyle) -> usize {
    doc.keywords
        .extend(to_add.iter().map(|name| build_entry(name, style)));
    to_add.len()
}

/// Rebuild the keyword list from scratch, in canonical order. Names equal
/// under `policy` collapse to their first spelling.
pub fn reset(
    doc: &mut EntityDocument,
    canonical: &[String],
    policy: CasePolicy,
    style: SynonymStyle,
) {
    doc.keywords.clear();
    let diff = synchronize(canonical, &[] as &[String], policy);
    add(doc, &diff.to_add, style);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub diff: DiffResult,
    pub removed: usize,
    pub added: usize,
    /// Comparison after the edit came back empty.
    pub synced: bool,
}

/// Clean then add, and re-compare.
pub fn sync_document(
    doc: &mut EntityDocument,
    canonical: &[String],
    policy: CasePolicy,
    style: SynonymStyle,
) -> SyncOutcome {
    let diff = synchronize(canonical, &doc.keyword_names(), policy);
    let removed = clean(doc, &diff.to_remove, policy);
    let added = add(doc, &diff.to_add, style);
    let synced = synchronize(canonical, &doc.keyword_names(), policy).is_synced();
    SyncOutcome {
        diff,
        removed,
        added,
        synced,
    }
}

/// The on-disk location of one mirror document.
#[derive(Debug, Clone)]
pub struct MirrorFile {
    path: PathBuf,
}

impl MirrorFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<EntityDocument, CliError> {
        read_json(&self.path)
    }

    pub fn save(&self, doc: &EntityDocument) -> Result<(), CliError> {
        write_json(&self.path, doc)?;
        tracing::debug!(
            target: "witsync.mirror",
            path = %self.path.display(),
            keywords = doc.keywords.len(),
            "mirror saved"
        );
        Ok(())
    }
}
