//! `witsync <entity> [command]`
use std::path::PathBuf;

use clap::ValueEnum;
use witsync_core::api::{
    self as core_api, canonical_names, load_canonical, stats, synchronize, AppConfig, CliError,
    EntityDocument, EntityProfile, MirrorFile,
};
use witsync_plugins::wit::{self, WitClient};

use crate::commands::cli::{EntityInvocation, ManageCommand};
use crate::report;

/// One resolved entity profile.
struct EntityTarget<'a> {
    name: &'a str,
    profile: &'a EntityProfile,
    mirror: MirrorFile,
    source: Option<PathBuf>,
}

impl<'a> EntityTarget<'a> {
    fn resolve(cfg: &'a AppConfig, name: &'a str) -> Result<Self, CliError> {
        let profile = cfg.profile(name)?;
        Ok(Self {
            name,
            profile,
            mirror: MirrorFile::new(cfg.paths.resolve(&profile.mirror)),
            source: profile.source.as_deref().map(|s| cfg.paths.resolve(s)),
        })
    }

    fn canonical(&self) -> Result<Vec<String>, CliError> {
        let source = self.source.as_ref().ok_or_else(|| {
            CliError::Command(format!(
                "entity '{}' has no source collection; only import, force-upload, upload and delete apply",
                self.name
            ))
        })?;
        let records = load_canonical(source)?;
        Ok(canonical_names(&records, self.profile.active_only))
    }

    fn fresh_document(&self) -> EntityDocument {
        EntityDocument::new(
            self.name,
            self.profile.roles.clone(),
            self.profile.lookups.clone(),
        )
    }
}

pub fn usage_lines(entity: &str) -> Vec<String> {
    let mut lines = vec![
        format!("Usage: witsync {} <command>", entity),
        String::new(),
        "Commands:".to_string(),
    ];
    for cmd in ManageCommand::value_variants() {
        if let Some(value) = cmd.to_possible_value() {
            let help = value.get_help().map(|h| h.to_string()).unwrap_or_default();
            lines.push(format!("  {:<14}{}", value.get_name(), help));
        }
    }
    lines
}

pub async fn handle_entity(cfg: &AppConfig, raw: &[String]) -> Result<i32, CliError> {
    let invocation = EntityInvocation::parse(raw).map_err(CliError::Command)?;
    let target = EntityTarget::resolve(cfg, &invocation.entity)?;

    let Some(command) = invocation.command else {
        report::print(&usage_lines(target.name));
        return Ok(0);
    };
    tracing::debug!(target: "witsync.cli", entity = %target.name, command = ?command, "entity command");

    if command.needs_source() {
        run_local(&target, command)
    } else {
        let client = WitClient::from_config(&cfg.wit)?;
        run_remote(&target, command, &client).await
    }
}

fn run_local(target: &EntityTarget<'_>, command: ManageCommand) -> Result<i32, CliError> {
    let canonical = target.canonical()?;
    let policy = target.profile.case_policy;
    let style = target.profile.synonyms;

    if command == ManageCommand::Reset {
        let mut doc = if target.mirror.exists() {
            target.mirror.load().unwrap_or_else(|err| {
                tracing::warn!(target: "witsync.cli", error = %err, "mirror unreadable, starting from an empty document");
                target.fresh_document()
            })
        } else {
            target.fresh_document()
        };
        core_api::reset(&mut doc, &canonical, policy, style);
        target.mirror.save(&doc)?;
        println!(
            "{}: mirror rebuilt with {} keywords",
            target.name,
            doc.keywords.len()
        );
        return Ok(0);
    }

    let mut doc = target.mirror.load()?;
    let mirror_names = doc.keyword_names();

    match command {
        ManageCommand::Compare => {
            let diff = synchronize(&canonical, &mirror_names, policy);
            report::print(&report::comparison_lines(target.name, &diff));
            Ok(0)
        }
        ManageCommand::Validate => {
            let diff = synchronize(&canonical, &mirror_names, policy);
            report::print(&report::comparison_lines(target.name, &diff));
            Ok(if diff.is_synced() { 0 } else { 1 })
        }
        ManageCommand::Stats => {
            let s = stats(&canonical, &mirror_names, policy);
            report::print(&report::stats_lines(target.name, &s));
            Ok(0)
        }
        ManageCommand::Clean => {
            let diff = synchronize(&canonical, &mirror_names, policy);
            let removed = core_api::clean(&mut doc, &diff.to_remove, policy);
            if removed > 0 {
                target.mirror.save(&doc)?;
            }
            println!("{}: removed {} keywords", target.name, removed);
            Ok(0)
        }
        ManageCommand::Add => {
            let diff = synchronize(&canonical, &mirror_names, policy);
            let added = core_api::add(&mut doc, &diff.to_add, style);
            if added > 0 {
                target.mirror.save(&doc)?;
            }
            println!("{}: added {} keywords", target.name, added);
            Ok(0)
        }
        ManageCommand::Sync => {
            let outcome = core_api::sync_document(&mut doc, &canonical, policy, style);
            if outcome.removed + outcome.added > 0 {
                target.mirror.save(&doc)?;
            }
            report::print(&report::sync_lines(target.name, &outcome));
            Ok(if outcome.synced { 0 } else { 1 })
        }
        other => Err(CliError::Command(format!(
            "'{:?}' is not a local command",
            other
        ))),
    }
}

async fn run_remote(
    target: &EntityTarget<'_>,
    command: ManageCommand,
    remote: &dyn wit::WitRemote,
) -> Result<i32, CliError> {
    if command == ManageCommand::Delete {
        let remote_name = match target.mirror.load() {
            Ok(doc) => doc.name,
            Err(_) => target.name.to_string(),
        };
        let outcome = wit::delete_entity(remote, &remote_name).await?;
        println!("{}: {:?}", remote_name, outcome);
        return Ok(0);
    }

    let doc = target.mirror.load()?;
    let outcome = match command {
        ManageCommand::Import => wit::upsert_entity(remote, &doc).await?,
        ManageCommand::ForceUpload => wit::force_upload_entity(remote, &doc).await?,
        ManageCommand::Upload => wit::recreate_entity(remote, &doc).await?,
        other => {
            return Err(CliError::Command(format!(
                "'{:?}' is not a remote command",
                other
            )))
        }
    };
    println!(
        "{}: {:?} with {} keywords",
        doc.name,
        outcome,
        doc.keywords.len()
    );
    Ok(0)
}
