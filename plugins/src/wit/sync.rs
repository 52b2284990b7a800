//! Remote apply operations built on [`WitRemote`].
//!
//! Each function awaits one request at a time. Status handling that depends
//! on the operation (idempotent delete, missing-on-GET, create 409) happens here;
//! everything else is returned to the caller untouched.

use std::path::Path;

use serde_json::Value;
use witsync_core::api::{
    read_json, validate_utterance, CliError, EntityDocument, IntentDocument, UtteranceReport,
    WitApiError,
};

use super::remote::WitRemote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    AlreadyAbsent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    Existing,
    Created,
}

/// Look up with `GET`, then `POST` when absent or `PUT` when present.
pub async fn upsert_entity(
    remote: &dyn WitRemote,
    doc: &EntityDocument,
) -> Result<UpsertOutcome, WitApiError> {
    match remote.get_entity(&doc.name).await {
        Ok(_) => {
            remote.update_entity(&doc.name, doc).await?;
            tracing::info!(target: "witsync.sync", entity = %doc.name, "entity updated");
            Ok(UpsertOutcome::Updated)
        }
        Err(err) if err.is_not_found() => {
            remote.create_entity(doc).await?;
            tracing::info!(target: "witsync.sync", entity = %doc.name, "entity created");
            Ok(UpsertOutcome::Created)
        }
        Err(err) => Err(err),
    }
}

/// `POST`, falling back to `PUT` with the same document on 409.
pub async fn create_or_update_entity(
    remote: &dyn WitRemote,
    doc: &EntityDocument,
) -> Result<UpsertOutcome, WitApiError> {
    match remote.create_entity(doc).await {
        Ok(_) => Ok(UpsertOutcome::Created),
        Err(err) if err.is_conflict() => {
            tracing::info!(
                target: "witsync.sync",
                entity = %doc.name,
                "entity already exists, replacing"
            );
            remote.update_entity(&doc.name, doc).await?;
            Ok(UpsertOutcome::Updated)
        }
        Err(err) => Err(err),
    }
}

/// Delete an entity. A missing entity counts as success.
pub async fn delete_entity(
    remote: &dyn WitRemote,
    name: &str,
) -> Result<DeleteOutcome, WitApiError> {
    match remote.delete_entity(name).await {
        Ok(_) => Ok(DeleteOutcome::Deleted),
        Err(err) if err.is_not_found() => {
            tracing::info!(target: "witsync.sync", entity = %name, "entity not present, nothing to delete");
            Ok(DeleteOutcome::AlreadyAbsent)
        }
        Err(err) => Err(err),
    }
}

/// Delete then create. Only 404 and 5xx on the delete are tolerated.
pub async fn force_upload_entity(
    remote: &dyn WitRemote,
    doc: &EntityDocument,
) -> Result<UpsertOutcome, WitApiError> {
    match delete_entity(remote, &doc.name).await {
        Ok(_) => {}
        Err(err) if err.is_server_error() => {
            tracing::warn!(
                target: "witsync.sync",
                entity = %doc.name,
                error = %err,
                "delete failed on the server side, uploading anyway"
            );
        }
        Err(err) => return Err(err),
    }
    create_or_update_entity(remote, doc).await
}

/// Delete then create, ignoring any delete failure.
pub async fn recreate_entity(
    remote: &dyn WitRemote,
    doc: &EntityDocument,
) -> Result<UpsertOutcome, WitApiError> {
    if let Err(err) = delete_entity(remote, &doc.name).await {
        tracing::warn!(
            target: "witsync.sync",
            entity = %doc.name,
            error = %err,
            "delete failed, continuing with create"
        );
    }
    create_or_update_entity(remote, doc).await
}

/// Wit.ai answers for an unknown intent with 404 or with a bare 400.
fn intent_absent(err: &WitApiError) -> bool {
    err.is_not_found() || matches!(err, WitApiError::Rejected { status: 400, .. })
}

pub async fn delete_intent(
    remote: &dyn WitRemote,
    name: &str,
) -> Result<DeleteOutcome, WitApiError> {
    match remote.delete_intent(name).await {
        Ok(_) => Ok(DeleteOutcome::Deleted),
        Err(err) if intent_absent(&err) => Ok(DeleteOutcome::AlreadyAbsent),
        Err(err) => Err(err),
    }
}

/// Intents cannot be updated in place.
pub async fn recreate_intent(
    remote: &dyn WitRemote,
    doc: &IntentDocument,
) -> Result<(), WitApiError> {
    delete_intent(remote, &doc.name).await?;
    remote.create_intent(doc).await?;
    tracing::info!(target: "witsync.sync", intent = %doc.name, "intent created");
    Ok(())
}

/// Make sure `name` exists remotely. When it does not, it is created from
/// `<intents_dir>/<name>.json`, or from the bare name if that file is absent.
pub async fn ensure_intent(
    remote: &dyn WitRemote,
    name: &str,
    intents_dir: &Path,
) -> Result<EnsureOutcome, CliError> {
    match remote.get_intent(name).await {
        Ok(_) => return Ok(EnsureOutcome::Existing),
        Err(err) if intent_absent(&err) => {}
        Err(err) => return Err(err.into()),
    }

    let path = intents_dir.join(format!("{}.json", name));
    let doc = if path.exists() {
        read_json::<IntentDocument>(&path)?
    } else {
        IntentDocument::named(name)
    };
    remote.create_intent(&doc).await?;
    tracing::info!(target: "witsync.sync", intent = %name, "required intent created");
    Ok(EnsureOutcome::Created)
}

/// Post utterances one at a time. Invalid items are counted as failures
/// without a request; request failures are recorded and the loop goes on.
pub async fn upload_utterances(
    remote: &dyn WitRemote,
    items: &[Value],
    source: Option<&str>,
) -> UtteranceReport {
    let mut report = match source {
        Some(source) => UtteranceReport::for_source(source),
        None => UtteranceReport::default(),
    };

    for (index, item) in items.iter().enumerate() {
        if let Err(err) = validate_utterance(item) {
            tracing::warn!(target: "witsync.sync", index, reason = %err, "skipping invalid utterance");
            report.record_failure(index, err.to_string());
            continue;
        }
        match remote.post_utterance(item).await {
            Ok(_) => report.record_success(),
            Err(err) => {
                tracing::warn!(target: "witsync.sync", index, error = %err, "utterance upload failed");
                report.record_failure(index, err.to_string());
            }
        }
    }

    tracing::info!(
        target: "witsync.sync",
        source = source.unwrap_or("-"),
        succeeded = report.succeeded,
        failed = report.failed,
        "utterance batch finished"
    );
    report
}
