//! Bulk import of the entities, intents and utterances directories.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use witsync_core::api::{
    batch_items, read_json, AppConfig, CliError, EntityDocument, IntentDocument, UtteranceReport,
};

use super::remote::WitRemote;
use super::sync::{ensure_intent, recreate_intent, upload_utterances, upsert_entity};

/// Outcome of one import phase.
///
/// For entities and intents the counters are per file. For utterances they
/// are per utterance, and `skipped` counts files that were not uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub phase: &'static str,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub reports: Vec<UtteranceReport>,
}

impl ImportSummary {
    fn new(phase: &'static str) -> Self {
        Self {
            phase,
            ..Self::default()
        }
    }
}

/// `*.json` files directly under `dir`, sorted by file name.
/// A missing directory yields an empty list.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    if !dir.is_dir() {
        tracing::warn!(target: "witsync.import", dir = %dir.display(), "directory not found, nothing to import");
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| CliError::io(dir, e))? {
        let path = entry.map_err(|e| CliError::io(dir, e))?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub async fn import_entities(
    remote: &dyn WitRemote,
    dir: &Path,
) -> Result<ImportSummary, CliError> {
    let mut summary = ImportSummary::new("entities");
    for path in list_json_files(dir)? {
        let doc = match read_json::<EntityDocument>(&path) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::error!(target: "witsync.import", file = %path.display(), error = %err, "cannot read entity file");
                summary.failed += 1;
                continue;
            }
        };
        match upsert_entity(remote, &doc).await {
            Ok(_) => summary.succeeded += 1,
            Err(err) => {
                tracing::error!(target: "witsync.import", entity = %doc.name, error = %err, "entity import failed");
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

pub async fn import_intents(
    remote: &dyn WitRemote,
    dir: &Path,
) -> Result<ImportSummary, CliError> {
    let mut summary = ImportSummary::new("intents");
    for path in list_json_files(dir)? {
        let doc = match read_json::<IntentDocument>(&path) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::error!(target: "witsync.import", file = %path.display(), error = %err, "cannot read intent file");
                summary.failed += 1;
                continue;
            }
        };
        match recreate_intent(remote, &doc).await {
            Ok(()) => summary.succeeded += 1,
            Err(err) => {
                tracing::error!(target: "witsync.import", intent = %doc.name, error = %err, "intent import failed");
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

pub async fn import_utterances(
    remote: &dyn WitRemote,
    dir: &Path,
) -> Result<ImportSummary, CliError> {
    let mut summary = ImportSummary::new("utterances");
    for path in list_json_files(dir)? {
        let label = file_label(&path);
        let batch = match read_json::<Value>(&path) {
            Ok(batch) => batch,
            Err(err) => {
                tracing::error!(target: "witsync.import", file = %label, error = %err, "cannot read utterance file");
                summary.skipped += 1;
                continue;
            }
        };
        let Some(items) = batch_items(&batch) else {
            tracing::warn!(target: "witsync.import", file = %label, "no utterances array, skipping");
            summary.skipped += 1;
            continue;
        };

        let report = upload_utterances(remote, items, Some(&label)).await;
        summary.succeeded += report.succeeded;
        summary.failed += report.failed;
        summary.reports.push(report);
    }
    Ok(summary)
}

/// Entities, then intents, then the required intents, then utterances.
/// A required intent that cannot be ensured aborts the run.
pub async fn import_all(
    remote: &dyn WitRemote,
    cfg: &AppConfig,
) -> Result<Vec<ImportSummary>, CliError> {
    let intents_dir = cfg.paths.intents();
    let mut summaries = vec![
        import_entities(remote, &cfg.paths.entities()).await?,
        import_intents(remote, &intents_dir).await?,
    ];

    for name in &cfg.import.required_intents {
        let outcome = ensure_intent(remote, name, &intents_dir).await?;
        tracing::info!(target: "witsync.import", intent = %name, outcome = ?outcome, "required intent ready");
    }

    summaries.push(import_utterances(remote, &cfg.paths.utterances()).await?);
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wit::http_client::WitClient;
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;

    fn path(p: &str) -> Matcher {
        Matcher::Regex(format!(r"^{}(\?.*)?$", p))
    }

    fn client(server: &Server) -> WitClient {
        WitClient::new(
            &server.url(),
            "token".to_string(),
            "20200513".to_string(),
            1_000,
        )
        .unwrap()
    }

    #[test]
    fn lists_only_json_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.json", "a.json", "notes.txt"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.json")).unwrap();

        let files = list_json_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| file_label(p)).collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_json_files(&dir.path().join("absent")).unwrap().is_empty());
    }

    #[tokio::test]
    async fn entity_failures_are_counted_and_the_loop_continues() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a_broken.json"), "{ not json").unwrap();
        std::fs::write(
            dir.path().join("product.json"),
            r#"{"name":"product","roles":["product"],"lookups":["keywords"],"keywords":[]}"#,
        )
        .unwrap();

        let mut server = Server::new_async().await;
        let _get = server
            .mock("GET", path("/entities/product"))
            .with_status(404)
            .with_body(r#"{"code":"not-found"}"#)
            .create_async()
            .await;
        let post = server
            .mock("POST", path("/entities"))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let summary = import_entities(&client(&server), dir.path()).await.unwrap();
        assert_eq!((summary.succeeded, summary.failed), (1, 1));
        post.assert_async().await;
    }

    #[tokio::test]
    async fn utterance_file_without_array_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.json"), r#"{"note": "nothing here"}"#).unwrap();
        std::fs::write(
            dir.path().join("quotes.json"),
            r#"{"utterances": [
                {"text": "100 stickers", "intent": "get_quote", "entities": [], "traits": []},
                {"text": "missing intent"}
            ]}"#,
        )
        .unwrap();

        let mut server = Server::new_async().await;
        let post = server
            .mock("POST", path("/utterances"))
            .with_status(200)
            .with_body(r#"{"sent":true,"n":1}"#)
            .expect(1)
            .create_async()
            .await;

        let summary = import_utterances(&client(&server), dir.path())
            .await
            .unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.reports[0].source.as_deref(), Some("quotes.json"));
        post.assert_async().await;
    }

    #[tokio::test]
    async fn import_all_aborts_when_required_intent_cannot_be_ensured() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = AppConfig::default();
        cfg.paths.data_dir = dir.path().display().to_string();

        let mut server = Server::new_async().await;
        let _get = server
            .mock("GET", path("/intents/get_quote"))
            .with_status(500)
            .with_body("down")
            .create_async()
            .await;
        let utterances = server
            .mock("POST", path("/utterances"))
            .expect(0)
            .create_async()
            .await;

        let err = import_all(&client(&server), &cfg).await.unwrap_err();
        assert!(matches!(err, CliError::Api(ref e) if e.is_server_error()));
        utterances.assert_async().await;
    }
}
