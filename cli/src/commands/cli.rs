use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "witsync",
    version,
    about = "Keep Wit.ai keyword entities in sync with the product database",
    after_help = "Entity usage: witsync [--config <path>] <entity> [command]\n\
                  Run `witsync <entity>` to list the entity commands."
)]
pub struct Args {
    /// Configuration file (default: ~/.witsync/config.toml, then ./witsync.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Upload every entity, intent and utterance file.
    ImportAll,
    /// Upload the utterance batch files only.
    Utterances,
    /// Trigger training of the Wit.ai app.
    Train,
    /// `<entity> [command]` for a configured entity profile.
    #[command(external_subcommand)]
    Entity(Vec<String>),
}

/// Commands available on one entity profile.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManageCommand {
    /// Show what is missing from or extra in the mirror file
    #[value(alias = "check")]
    Compare,
    /// Exit 1 unless the mirror matches the database
    Validate,
    /// Remove mirror keywords that are not in the database
    Clean,
    /// Add database names missing from the mirror
    Add,
    /// Clean then add
    Sync,
    /// Rebuild the mirror keywords from the database
    Reset,
    /// Create or update the entity on Wit.ai
    Import,
    /// Delete the remote entity, then upload the mirror
    ForceUpload,
    /// Delete and recreate the remote entity, ignoring delete errors
    Upload,
    /// Delete the remote entity
    Delete,
    /// Overlap counts and sync percentage
    Stats,
}

impl ManageCommand {
    /// Commands that talk to Wit.ai and need an access token.
    pub fn is_remote(self) -> bool {
        matches!(
            self,
            Self::Import | Self::ForceUpload | Self::Upload | Self::Delete
        )
    }

    /// Commands that read the canonical collection and edit the mirror file.
    pub fn needs_source(self) -> bool {
        !self.is_remote()
    }
}

/// An entity invocation split out of the external subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityInvocation {
    pub entity: String,
    pub command: Option<ManageCommand>,
}

impl EntityInvocation {
    pub fn parse(raw: &[String]) -> Result<Self, String> {
        let (entity, rest) = raw
            .split_first()
            .ok_or_else(|| "missing entity name".to_string())?;
        let command = match rest {
            [] => None,
            [cmd] => Some(ManageCommand::from_str(cmd, true).map_err(|_| {
                format!("unknown command '{}' for entity '{}'", cmd, entity)
            })?),
            [_, extra, ..] => return Err(format!("unexpected argument '{}'", extra)),
        };
        Ok(Self {
            entity: entity.clone(),
            command,
        })
    }
}
