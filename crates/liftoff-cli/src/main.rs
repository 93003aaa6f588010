mod commands;

use clap::{Parser, Subcommand};
use liftoff_cloud::ReleaseError;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "liftoff",
    about = "Provision the service key and deploy to Fly.io with a remote build"
)]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set the key secret (if a key file exists), then deploy
    Release {
        /// Key file to provision (default: private_key)
        #[arg(long)]
        key_file: Option<PathBuf>,
        /// Abort the release if the secret cannot be set
        #[arg(long)]
        strict_secrets: bool,
        /// Target Fly app (default: the one in fly.toml)
        #[arg(long)]
        app: Option<String>,
    },
    /// Write a Dockerfile that runs the precompiled service binary
    Dockerfile {
        /// Overwrite an existing Dockerfile
        #[arg(long)]
        force: bool,
        /// Print to stdout instead of writing the file
        #[arg(long, conflicts_with = "force")]
        stdout: bool,
    },
    /// Check flyctl, login, and project files
    Doctor,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Release {
            key_file,
            strict_secrets,
            app,
        } => {
            commands::release(commands::ReleaseOptions {
                key_file,
                strict_secrets,
                app,
            })
            .await
        }
        Commands::Dockerfile { force, stdout } => commands::dockerfile(force, stdout),
        Commands::Doctor => commands::doctor().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

/// A failed deploy exits with flyctl's own code; everything else exits 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ReleaseError>()
        .map_or(1, |e| e.exit_code().clamp(1, 255) as u8)
}
