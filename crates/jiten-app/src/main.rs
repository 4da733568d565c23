use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use clap::error::ErrorKind;
use tracing_subscriber::EnvFilter;

use jiten_config::Config;
use jiten_import::{import_archive, import_dir};
use jiten_store::{RemoteBackend, RetryPolicy, SqliteBackend, StoreBackend};

#[derive(Parser)]
#[command(name = "jiten")]
#[command(about = "Import dictionary archives into a searchable store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a dictionary zip archive, or a directory of archives
    Import {
        /// Path to the archive (or a directory of `*.zip` archives)
        archive: PathBuf,

        /// SQLite database path; omit to write to the remote store
        destination: Option<PathBuf>,

        /// Mark the dictionary as bundled with the application
        #[arg(long)]
        bundled: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let usage_only = matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            );
            let _ = err.print();
            return if usage_only {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Import {
            archive,
            destination,
            bundled,
        } => {
            let config = Config::new();
            match destination {
                Some(path) => {
                    let mut backend = SqliteBackend::open(&path)
                        .with_context(|| format!("opening database {}", path.display()))?;
                    import(&mut backend, &archive, bundled).await
                }
                None => {
                    let url = config
                        .store
                        .remote_url
                        .context("no destination given and JITEN_REMOTE_URL is not set")?;
                    let retry = RetryPolicy {
                        max_attempts: config.import.retry_max_attempts,
                        base_delay: Duration::from_millis(config.import.retry_base_delay_ms),
                        multiplier: 2,
                    };
                    let mut backend = RemoteBackend::connect(
                        url,
                        config.store.remote_token,
                        retry,
                        config.import.batch_size,
                    )
                    .await
                    .context("connecting to remote store")?;
                    import(&mut backend, &archive, bundled).await
                }
            }
        }
    }
}

async fn import<B: StoreBackend>(
    backend: &mut B,
    archive: &Path,
    bundled: bool,
) -> anyhow::Result<()> {
    if archive.is_dir() {
        import_dir(backend, archive, bundled).await?;
    } else {
        import_archive(backend, archive, bundled).await?;
    }
    Ok(())
}
