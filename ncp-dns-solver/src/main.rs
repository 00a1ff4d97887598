//! One-shot runner for the NCP DNS challenge solver
//!
//! Reads a single challenge request (JSON, from a file or stdin), performs
//! `present` or `clean-up` against NCP Global DNS and exits.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ncp_dns_solver::{
    ChallengeInput, ChallengeRequest, FileSecretResolver, NcpDnsSolver, SolverError,
    SolverSettings,
};
use tokio::io::AsyncReadExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ncp-dns-solver", version, about = "ACME DNS-01 solver for NCP Global DNS")]
struct Cli {
    /// TOML settings file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// API group the solver is registered under (overrides the settings file)
    #[arg(long, env = "GROUP_NAME", global = true)]
    group_name: Option<String>,

    /// Mounted secrets directory (overrides the settings file)
    #[arg(long, global = true)]
    secrets_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create and publish the challenge TXT record
    Present(RequestArgs),
    /// Delete the challenge TXT record and publish the removal
    CleanUp(RequestArgs),
    /// Act on the request's own `action` field
    Run(RequestArgs),
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Challenge request JSON file, or `-` for stdin
    #[arg(long, short, default_value = "-")]
    request: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match resolve_settings(&cli).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("ncp-dns-solver: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&settings.log_filter) {
        eprintln!("ncp-dns-solver: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli.command, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<SolverError>() {
                Some(solver_error) if solver_error.is_expected() => {
                    tracing::warn!("{e:#}");
                }
                _ => tracing::error!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Settings file first, then command-line / environment overrides.
async fn resolve_settings(cli: &Cli) -> Result<SolverSettings, SolverError> {
    let mut settings = match &cli.config {
        Some(path) => SolverSettings::load(path).await?,
        None => SolverSettings::default(),
    };
    if let Some(group_name) = &cli.group_name {
        settings.group_name.clone_from(group_name);
    }
    if let Some(secrets_dir) = &cli.secrets_dir {
        settings.secrets_dir.clone_from(secrets_dir);
    }
    settings.validate()?;
    Ok(settings)
}

/// Logs go to stderr; stdout is left free for callers piping the process.
fn init_logging(default_filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter {default_filter:?}"))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(filter)
        .try_init()?;
    Ok(())
}

async fn run(command: Command, settings: SolverSettings) -> anyhow::Result<()> {
    let solver = NcpDnsSolver::builder(
        settings.group_name.clone(),
        Arc::new(FileSecretResolver::new(settings.secrets_dir.clone())),
    )
    .build()?;

    tracing::info!(
        "Running {} for group {} (secrets from {})",
        solver.name(),
        solver.group_name(),
        settings.secrets_dir.display()
    );

    match command {
        Command::Present(args) => {
            let ch = read_request(&args.request).await?;
            solver.present(&ch).await?;
        }
        Command::CleanUp(args) => {
            let ch = read_request(&args.request).await?;
            solver.clean_up(&ch).await?;
        }
        Command::Run(args) => {
            let ch = read_request(&args.request).await?;
            solver.handle(&ch).await?;
        }
    }
    Ok(())
}

async fn read_request(path: &Path) -> anyhow::Result<ChallengeRequest> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read challenge request from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    let input: ChallengeInput =
        serde_json::from_str(&text).context("failed to decode challenge request")?;
    Ok(input.into_request())
}
