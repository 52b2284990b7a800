//! `witsync import-all`, `witsync utterances`, `witsync train`
use witsync_core::api::{AppConfig, CliError};
use witsync_plugins::wit::{self, ImportSummary, WitClient, WitRemote};

use crate::report;

fn exit_code(summaries: &[ImportSummary]) -> i32 {
    if summaries.iter().any(|s| s.failed > 0) {
        1
    } else {
        0
    }
}

pub async fn handle_import_all(cfg: &AppConfig) -> Result<i32, CliError> {
    let client = WitClient::from_config(&cfg.wit)?;
    run_import_all(cfg, &client).await
}

pub async fn run_import_all(cfg: &AppConfig, remote: &dyn WitRemote) -> Result<i32, CliError> {
    let summaries = wit::import_all(remote, cfg).await?;
    for summary in &summaries {
        report::print(&report::import_lines(summary));
    }
    Ok(exit_code(&summaries))
}

pub async fn handle_utterances(cfg: &AppConfig) -> Result<i32, CliError> {
    let client = WitClient::from_config(&cfg.wit)?;
    let summary = wit::import_utterances(&client, &cfg.paths.utterances()).await?;
    report::print(&report::import_lines(&summary));
    Ok(exit_code(std::slice::from_ref(&summary)))
}

pub async fn handle_train(cfg: &AppConfig) -> Result<i32, CliError> {
    let client = WitClient::from_config(&cfg.wit)?;
    let response = client.train().await?;
    tracing::debug!(target: "witsync.cli", response = %response, "train response");
    println!("training requested");
    Ok(0)
}
