#![allow(dead_code)]

use std::path::Path;

use mockito::Matcher;
use witsync_core::api::AppConfig;

pub fn write(path: &Path, body: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

/// Path matcher that ignores the `v=` query string.
pub fn path(p: &str) -> Matcher {
    Matcher::Regex(format!(r"^{}(\?.*)?$", p))
}

/// Default profiles rooted at `dir`, talking to `base_url`.
pub fn config(dir: &Path, base_url: &str) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.paths.data_dir = dir.display().to_string();
    cfg.wit.base_url = base_url.to_string();
    cfg.wit.access_token = "test-token".to_string();
    cfg.wit.timeout_ms = 2_000;
    cfg
}

pub fn args(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}
