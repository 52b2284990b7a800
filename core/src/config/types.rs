use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::diff::CasePolicy;
use crate::error::CliError;
use crate::mirror::SynonymStyle;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub wit: WitConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub import: ImportConfig,

    /// Entity profiles keyed by the name used on the command line.
    #[serde(default = "default_entities")]
    pub entities: BTreeMap<String, EntityProfile>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            wit: WitConfig::default(),
            logging: LoggingConfig::default(),
            paths: PathsConfig::default(),
            import: ImportConfig::default(),
            entities: default_entities(),
        }
    }
}

impl AppConfig {
    pub fn profile(&self, name: &str) -> Result<&EntityProfile, CliError> {
        self.entities.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.entities.keys().map(String::as_str).collect();
            CliError::Command(format!(
                "unknown entity '{}' (configured: {})",
                name,
                known.join(", ")
            ))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WitConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as the `v` query parameter on every request.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default)]
    pub access_token: String,

    #[serde(default)]
    pub app_id: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl WitConfig {
    /// The bearer token, or a config error when none was supplied.
    pub fn require_access_token(&self) -> Result<&str, CliError> {
        let token = self.access_token.trim();
        if token.is_empty() {
            return Err(CliError::Config(
                "WIT_AI_ACCESS_TOKEN is not set (env or [wit].access_token)".to_string(),
            ));
        }
        Ok(token)
    }

    /// First characters of the token, safe to print.
    pub fn token_preview(&self) -> String {
        let token = self.access_token.trim();
        let head: String = token.chars().take(6).collect();
        if head.is_empty() {
            "<unset>".to_string()
        } else {
            format!("{}...", head)
        }
    }
}

fn default_base_url() -> String {
    "https://api.wit.ai".to_string()
}

fn default_api_version() -> String {
    "20200513".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for WitConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            access_token: String::new(),
            app_id: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or ~/.witsync/logs if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "witsync_plugins=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Base directory; every relative path in the config resolves against it.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_entities_dir")]
    pub entities_dir: String,

    #[serde(default = "default_intents_dir")]
    pub intents_dir: String,

    #[serde(default = "default_utterances_dir")]
    pub utterances_dir: String,
}

impl PathsConfig {
    pub fn resolve(&self, path: &str) -> PathBuf {
        let expanded = PathBuf::from(shellexpand::tilde(path).as_ref());
        if expanded.is_absolute() {
            return expanded;
        }
        Path::new(shellexpand::tilde(&self.data_dir).as_ref()).join(expanded)
    }

    pub fn entities(&self) -> PathBuf {
        self.resolve(&self.entities_dir)
    }

    pub fn intents(&self) -> PathBuf {
        self.resolve(&self.intents_dir)
    }

    pub fn utterances(&self) -> PathBuf {
        self.resolve(&self.utterances_dir)
    }
}

fn default_data_dir() -> String {
    ".".to_string()
}

fn default_entities_dir() -> String {
    "entities".to_string()
}

fn default_intents_dir() -> String {
    "intents".to_string()
}

fn default_utterances_dir() -> String {
    "utterances".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            entities_dir: default_entities_dir(),
            intents_dir: default_intents_dir(),
            utterances_dir: default_utterances_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Intents that must exist remotely before utterances are uploaded.
    #[serde(default = "default_required_intents")]
    pub required_intents: Vec<String>,
}

fn default_required_intents() -> Vec<String> {
    vec!["get_quote".to_string()]
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            required_intents: default_required_intents(),
        }
    }
}

/// How one entity type is compared and written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityProfile {
    /// Mirror entity document, relative to `paths.data_dir`.
    pub mirror: String,

    /// Canonical collection export. Profiles without one are upload-only.
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub case_policy: CasePolicy,

    #[serde(default)]
    pub synonyms: SynonymStyle,

    /// Keep only records whose `isActive` flag is true.
    #[serde(default)]
    pub active_only: bool,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default = "default_lookups")]
    pub lookups: Vec<String>,
}

fn default_lookups() -> Vec<String> {
    vec!["free-text".to_string(), "keywords".to_string()]
}

impl EntityProfile {
    fn upload_only(name: &str) -> Self {
        Self {
            mirror: format!("entities/{}.json", name),
            source: None,
            case_policy: CasePolicy::Sensitive,
            synonyms: SynonymStyle::Plain,
            active_only: false,
            roles: vec![name.to_string()],
            lookups: default_lookups(),
        }
    }

    fn with_source(name: &str, source: &str) -> Self {
        Self {
            source: Some(source.to_string()),
            ..Self::upload_only(name)
        }
    }
}

fn default_entities() -> BTreeMap<String, EntityProfile> {
    let mut entities = BTreeMap::new();
    entities.insert(
        "product".to_string(),
        EntityProfile {
            synonyms: SynonymStyle::Expanded,
            ..EntityProfile::with_source("product", "mylarAiQuotes.products.json")
        },
    );
    entities.insert(
        "material".to_string(),
        EntityProfile {
            case_policy: CasePolicy::Insensitive,
            active_only: true,
            ..EntityProfile::with_source("material", "mylarAiQuotes.materials.json")
        },
    );
    entities.insert(
        "finishes".to_string(),
        EntityProfile::with_source("finishes", "mylarAiQuotes.product_finishes.json"),
    );
    entities.insert(
        "dimensions".to_string(),
        EntityProfile::upload_only("dimensions"),
    );
    entities.insert(
        "quantities".to_string(),
        EntityProfile::upload_only("quantities"),
    );
    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_profiles_follow_entity_conventions() {
        let cfg = AppConfig::default();
        let product = cfg.profile("product").unwrap();
        assert_eq!(product.case_policy, CasePolicy::Sensitive);
        assert_eq!(product.synonyms, SynonymStyle::Expanded);

        let material = cfg.profile("material").unwrap();
        assert_eq!(material.case_policy, CasePolicy::Insensitive);
        assert!(material.active_only);
        assert_eq!(material.mirror, "entities/material.json");

        assert!(cfg.profile("dimensions").unwrap().source.is_none());
    }

    #[test]
    fn unknown_profile_lists_configured_names() {
        let cfg = AppConfig::default();
        let err = cfg.profile("colour").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("colour"));
        assert!(msg.contains("product"));
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let wit = WitConfig::default();
        assert!(matches!(
            wit.require_access_token(),
            Err(CliError::Config(_))
        ));

        let wit = WitConfig {
            access_token: "  tok  ".to_string(),
            ..WitConfig::default()
        };
        assert_eq!(wit.require_access_token().unwrap(), "tok");
    }

    #[test]
    fn relative_paths_resolve_against_data_dir() {
        let paths = PathsConfig {
            data_dir: "/srv/wit".to_string(),
            ..PathsConfig::default()
        };
        assert_eq!(
            paths.resolve("entities/product.json"),
            PathBuf::from("/srv/wit/entities/product.json")
        );
        assert_eq!(paths.resolve("/tmp/x.json"), PathBuf::from("/tmp/x.json"));
        assert_eq!(paths.intents(), PathBuf::from("/srv/wit/intents"));
    }

    #[test]
    fn profile_from_toml_uses_defaults() {
        let profile: EntityProfile = toml::from_str(
            r#"
            mirror = "entities/colour.json"
            source = "colours.json"
            case_policy = "insensitive"
            "#,
        )
        .unwrap();
        assert_eq!(profile.case_policy, CasePolicy::Insensitive);
        assert_eq!(profile.synonyms, SynonymStyle::Plain);
        assert_eq!(profile.lookups, vec!["free-text", "keywords"]);
    }
}
