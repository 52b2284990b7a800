use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use witsync_cli::commands::{cli, entity, import};
use witsync_core::api::{self as core_api, CliError};

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = core_api::load(args.config.as_deref())
        .map_err(|e| CliError::Config(format!("{e:#}")))?;
    init_tracing(&cfg.logging)?;
    tracing::debug!(
        target: "witsync.cli",
        base_url = %cfg.wit.base_url,
        token = %cfg.wit.token_preview(),
        "configuration loaded"
    );

    let Some(cmd) = args.command else {
        cli::Args::command()
            .print_help()
            .map_err(|e| CliError::Command(e.to_string()))?;
        return Ok(0);
    };

    dispatch(cmd, &cfg).await
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 1: validation mismatch or partial import failure (returned as a normal exit code)
    // 2: usage error
    // 11: config error
    // 20: file IO / JSON error
    // 30: Wit.ai API error
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Command(_) => 2,
        CliError::Io { .. } | CliError::Json { .. } => 20,
        CliError::Api(_) => 30,
        CliError::Anyhow(_) => 50,
    }
}

async fn dispatch(cmd: cli::Commands, cfg: &core_api::AppConfig) -> Result<i32, CliError> {
    match cmd {
        cli::Commands::ImportAll => import::handle_import_all(cfg).await,
        cli::Commands::Utterances => import::handle_utterances(cfg).await,
        cli::Commands::Train => import::handle_train(cfg).await,
        cli::Commands::Entity(raw) => entity::handle_entity(cfg, &raw).await,
    }
}

/// The configured `[logging].directory`, else `~/.witsync/logs`.
fn log_directory(logging: &core_api::LoggingConfig) -> Result<PathBuf, CliError> {
    match logging
        .directory
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => core_api::get_witsync_data_dir()
            .map(|d| d.join("logs"))
            .map_err(|e| CliError::Config(e.to_string())),
    }
}

fn init_tracing(logging: &core_api::LoggingConfig) -> Result<(), CliError> {
    if !logging.enabled {
        return Ok(());
    }
    if !logging.console && !logging.file {
        return Err(CliError::Config(
            "logging is enabled but both console and file output are off".to_string(),
        ));
    }

    let filter = std::env::var("RUST_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| EnvFilter::try_new(&logging.level), EnvFilter::try_new)
        .map_err(|e| CliError::Config(format!("invalid log filter: {e}")))?;

    let file_layer = if logging.file {
        let dir = log_directory(logging)?;
        std::fs::create_dir_all(&dir).map_err(|e| CliError::io(dir.clone(), e))?;
        let appender = tracing_appender::rolling::daily(&dir, "witsync.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        Some(fmt::layer().with_writer(writer).with_ansi(false))
    } else {
        None
    };

    // stderr keeps stdout free for command reports
    let console_layer = logging.console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Config(format!("tracing init failed: {e}")))
}
