//! Command-line checks for an incident-bridge deployment.
//!
//! - `check` loads and validates configuration, printing the effective values
//! - `test-notice` sends one warning notice and one failed test job, then
//!   waits briefly so the background worker can deliver them
//!
//! Configuration comes from `--config <file>` or, without it, from the
//! `AB_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use incident_bridge::config::{load_config, load_from_env, BridgeConfig};
use incident_bridge::observability::init_logging;
use incident_bridge::{JobContext, NotifierState};

#[derive(Parser)]
#[command(name = "incident-bridge")]
#[command(about = "Configuration and delivery checks for the incident bridge", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults to AB_* environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and print it
    Check,
    /// Send a test notice and a test queue metric
    TestNotice {
        /// Seconds to wait for delivery before exiting
        #[arg(long, default_value_t = 3)]
        wait_secs: u64,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("test job failure")]
struct TestJobError;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };

    match cli.command {
        Commands::Check => print_config(&config),
        Commands::TestNotice { wait_secs } => {
            let state = NotifierState::from_config(&config)?;
            init_logging(&config.observability, &state)?;

            tracing::warn!(
                target: "incident_bridge_cli",
                check = "test-notice",
                "incident-bridge test notice"
            );

            let jobs = state.jobs();
            let ctx = jobs.start_job(JobContext::new(), "incident-bridge-test");
            jobs.end_job(ctx, "incident-bridge-test", Some(&TestJobError));

            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
            println!("Submitted 1 notice, 1 job notice and 1 queue metric");
        }
    }

    Ok(())
}

fn print_config(config: &BridgeConfig) {
    let notifier = &config.notifier;
    println!("Configuration OK");
    println!("  project_id:         {}", notifier.project_id);
    println!("  environment:        {}", notifier.environment);
    println!(
        "  source_path_prefix: {}",
        notifier.source_path_prefix.as_deref().unwrap_or("<none>")
    );
    println!("  build_root:         {}", notifier.build_root);
    println!("  report_caller:      {}", notifier.report_caller);
    println!("  host:               {}", config.delivery.host);
    println!("  queue_capacity:     {}", config.delivery.queue_capacity);
}
