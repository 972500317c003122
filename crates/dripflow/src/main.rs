// SPDX-FileCopyrightText: 2026 Dripflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dripflow - campaign orchestration and quota-aware scheduling.
//!
//! This is the binary entry point for the Dripflow daemon.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod serve;

/// Dripflow - staged email outreach and scheduled social publishing.
#[derive(Parser, Debug)]
#[command(name = "dripflow", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scheduler daemon until interrupted.
    Serve,
    /// Run one sales outreach tick now and exit.
    Sales,
    /// Run one social publishing tick now and exit.
    Social,
    /// Collect post metrics now and exit.
    Metrics,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match dripflow_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            dripflow_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run(&config).await,
        Some(Commands::Sales) => serve::run_sales_once(&config).await,
        Some(Commands::Social) => serve::run_social_once(&config).await,
        Some(Commands::Metrics) => serve::run_metrics_once(&config).await,
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => {
                println!("{rendered}");
                Ok(())
            }
            Err(e) => Err(dripflow_core::DripflowError::Internal(format!(
                "failed to render configuration: {e}"
            ))),
        },
        None => {
            println!("dripflow: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("dripflow: {e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dripflow={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed)
        let config = dripflow_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.app.name, "dripflow");
        assert_eq!(config.schedule.sales_time, "09:00");
    }
}
