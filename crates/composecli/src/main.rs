// crates/composecli/src/main.rs

use anyhow::Result;
use clap::Parser;
use composecore::ComposeVersion;
use composeinspect::DockerCli;
use composeruntime::{Composer, ComposerConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "autocompose")]
#[command(about = "Generate a docker-compose definition from running containers", long_about = None)]
struct Cli {
    /// Compose file version (1 or 3)
    #[arg(short = 'v', long = "version", default_value = "3")]
    version: String,

    /// Names or ids of the containers to process
    #[arg(required = true)]
    containers: Vec<String>,

    /// Seconds to wait for each docker call
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Docker client binary
    #[arg(long, default_value = "docker")]
    docker_bin: PathBuf,

    /// Show debug logging on stderr
    #[arg(long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries the document, so logs go to stderr
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(document) => {
            print!("{document}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    // Rejected before any docker call is made
    let version: ComposeVersion = cli.version.parse()?;

    let config = ComposerConfig {
        version,
        inspect_timeout: Duration::from_secs(cli.timeout),
        ..ComposerConfig::default()
    };
    let composer = Composer::with_config(Arc::new(DockerCli::with_binary(cli.docker_bin)), config);

    tracing::debug!("Generating version {} document for {:?}", version, cli.containers);
    Ok(composer.render(cli.containers.as_slice()).await?)
}
