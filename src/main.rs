//! Pomodoro Timer CLI
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after 4 pomodoros

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::warn;

use pomodoro::cli::{Cli, Commands, ConfigAction, Display, RunArgs, Session};
use pomodoro::settings;
use pomodoro::{BellSoundPlayer, PomodoroConfig, TerminalNotifier, TimerEngine};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    let code = match execute(cli).await {
        Ok(()) => 0,
        Err(e) => {
            Display::show_error(&format!("{:#}", e));
            1
        }
    };

    // A blocked stdin read would otherwise hold up runtime shutdown.
    std::process::exit(code);
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let config_path = cli.config;

    match cli.command {
        Some(Commands::Run(args)) => {
            run_session(&resolve_settings_path(config_path)?, &args).await?;
        }
        Some(Commands::Config { action }) => {
            run_config_action(&resolve_settings_path(config_path)?, &action)?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, run a session with saved settings
            run_session(&resolve_settings_path(config_path)?, &RunArgs::default()).await?;
        }
    }

    Ok(())
}

/// Returns the explicit settings path, or the platform default.
fn resolve_settings_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => settings::default_settings_path().context("failed to locate settings file"),
    }
}

/// Loads settings and applies the command-line overrides.
fn effective_config(path: &Path, args: &RunArgs) -> Result<PomodoroConfig> {
    let saved = settings::load(path)
        .with_context(|| format!("failed to load settings from {}", path.display()))?;
    let config = args.apply(saved);
    config.validate().context("invalid timer configuration")?;
    Ok(config)
}

/// Runs an interactive session on stdin until quit, EOF or Ctrl-C.
async fn run_session(path: &Path, args: &RunArgs) -> Result<()> {
    let config = effective_config(path, args)?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(config, event_tx).context("failed to create timer")?;
    let session = Session::new(engine, TerminalNotifier::new(), BellSoundPlayer::new());

    Display::show_status(&session.engine().snapshot(), &session.engine().config());
    Display::show_session_help();

    if args.start {
        session.engine().start();
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    session
        .run(BufReader::new(tokio::io::stdin()), event_rx, shutdown)
        .await
}

/// Handles `config show|path|init`.
fn run_config_action(path: &Path, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = settings::load(path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?;
            let json = serde_json::to_string_pretty(&config).context("failed to encode settings")?;
            println!("{}", json);
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "settings file already exists: {} (use --force to overwrite)",
                    path.display()
                );
            }
            settings::save(path, &PomodoroConfig::default())
                .with_context(|| format!("failed to write settings to {}", path.display()))?;
            println!("* Wrote default settings to {}", path.display());
        }
    }
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
