//! Set difference between a canonical collection and its mirror.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// How names are compared. Materials are matched ignoring case, most other
/// entities exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CasePolicy {
    #[default]
    Sensitive,
    Insensitive,
}

impl CasePolicy {
    pub fn key<'a>(self, name: &'a str) -> Cow<'a, str> {
        match self {
            CasePolicy::Sensitive => Cow::Borrowed(name),
            CasePolicy::Insensitive => Cow::Owned(name.to_lowercase()),
        }
    }

    pub fn matches(self, a: &str, b: &str) -> bool {
        self.key(a) == self.key(b)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    /// In the canonical collection but not mirrored; canonical order.
    pub to_add: Vec<String>,
    /// Mirrored but no longer canonical; mirror order.
    pub to_remove: Vec<String>,
}

impl DiffResult {
    pub fn is_synced(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

fn key_set<'a, S: AsRef<str>>(items: &'a [S], policy: CasePolicy) -> HashSet<Cow<'a, str>> {
    items.iter().map(|s| policy.key(s.as_ref())).collect()
}

/// Items of `items` whose key is absent from `other`, first occurrence only.
fn missing_from<'a, S: AsRef<str>>(
    items: &'a [S],
    other: &HashSet<Cow<'a, str>>,
    policy: CasePolicy,
) -> Vec<String> {
    let mut seen: HashSet<Cow<'a, str>> = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let name = item.as_ref();
        let key = policy.key(name);
        if other.contains(&key) {
            continue;
        }
        if seen.insert(key) {
            out.push(name.to_string());
        }
    }
    out
}

/// `to_add = canonical - mirror`, `to_remove = mirror - canonical`.
pub fn synchronize<C, M>(canonical: &[C], mirror: &[M], policy: CasePolicy) -> DiffResult
where
    C: AsRef<str>,
    M: AsRef<str>,
{
    let canonical_keys = key_set(canonical, policy);
    let mirror_keys = key_set(mirror, policy);
    DiffResult {
        to_add: missing_from(canonical, &mirror_keys, policy),
        to_remove: missing_from(mirror, &canonical_keys, policy),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncStats {
    pub canonical_total: usize,
    pub mirror_total: usize,
    pub in_both: usize,
    pub only_in_canonical: usize,
    pub only_in_mirror: usize,
    /// Share of distinct canonical names already mirrored, 0..=100.
    pub sync_percentage: f64,
}

pub fn stats<C, M>(canonical: &[C], mirror: &[M], policy: CasePolicy) -> SyncStats
where
    C: AsRef<str>,
    M: AsRef<str>,
{
    let canonical_keys = key_set(canonical, policy);
    let mirror_keys = key_set(mirror, policy);
    let in_both = canonical_keys.intersection(&mirror_keys).count();
    let diff = synchronize(canonical, mirror, policy);

    let sync_percentage = if canonical_keys.is_empty() {
        0.0
    } else {
        in_both as f64 / canonical_keys.len() as f64 * 100.0
    };

    SyncStats {
        canonical_total: canonical.len(),
        mirror_total: mirror.len(),
        in_both,
        only_in_canonical: diff.to_add.len(),
        only_in_mirror: diff.to_remove.len(),
        sync_percentage,
    }
}
