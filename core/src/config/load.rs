use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default witsync data directory: ~/.witsync
pub fn get_witsync_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".witsync"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("read {} failed: {}", path.display(), e))?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("parse {} failed: {}", path.display(), e))?;
    Ok(cfg)
}

/// Load configuration, then apply environment overrides.
///
/// Lookup order: `explicit`, `~/.witsync/config.toml`, `./witsync.toml`,
/// built-in defaults.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut cfg = match explicit {
        Some(path) => load_from_path(path)?,
        None => {
            let home_config = get_witsync_data_dir().ok().map(|d| d.join("config.toml"));
            let local_config = Path::new("witsync.toml");
            match home_config {
                Some(p) if p.exists() => load_from_path(&p)?,
                _ if local_config.exists() => load_from_path(local_config)?,
                _ => AppConfig::default(),
            }
        }
    };

    if cfg.logging.file
        && cfg
            .logging
            .directory
            .as_deref()
            .map(|s| s.trim().is_empty())
            .unwrap_or(true)
    {
        cfg.logging.directory = Some(
            get_witsync_data_dir()?
                .join("logs")
                .to_string_lossy()
                .to_string(),
        );
    }

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

/// Environment variables win over file values. Blank values are ignored.
pub(crate) fn apply_env_overrides(cfg: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let first = |keys: &[&str]| {
        keys.iter()
            .filter_map(|k| lookup(*k))
            .find(|v| !v.trim().is_empty())
    };

    if let Some(v) = first(&["WIT_AI_ACCESS_TOKEN", "WIT_API_TOKEN"]) {
        cfg.wit.access_token = v;
    }
    if let Some(v) = first(&["WIT_AI_APP_ID", "WIT_APP_ID"]) {
        cfg.wit.app_id = v;
    }
    if let Some(v) = first(&["WITSYNC_API_BASE"]) {
        cfg.wit.base_url = v;
    }
    if let Some(v) = first(&["WITSYNC_DATA_DIR"]) {
        cfg.paths.data_dir = v;
    }
}
