//! triggerd command line
//!
//! Run with: cargo run -- check 'integralByInterval(my.metric, "6h")'
//!
//! Environment variables:
//! - TRIGGERD_LOCAL_METRIC_TTL: local metric retention (default: 1h)
//! - TRIGGERD_REMOTE_METRIC_TTL: remote metric retention (default: 168h)
//! - RUST_LOG: Log level (default: info)

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triggerd::config::{MetricTtlConfig, LOCAL_METRIC_TTL_ENV, REMOTE_METRIC_TTL_ENV};
use triggerd::controller::check_targets;
use triggerd::target::{extract_patterns, parse_duration};

#[derive(Parser)]
#[command(name = "triggerd", version, about = "Trigger target tooling")]
struct Opts {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Verify targets against the metric retention
    Check {
        #[arg(long, help = "Check against the remote metric source")]
        remote: bool,

        #[arg(long, env = LOCAL_METRIC_TTL_ENV, value_parser = parse_duration)]
        local_ttl: Option<Duration>,

        #[arg(long, env = REMOTE_METRIC_TTL_ENV, value_parser = parse_duration)]
        remote_ttl: Option<Duration>,

        #[arg(required = true)]
        targets: Vec<String>,
    },
    /// Print the metric patterns referenced by targets
    Patterns {
        #[arg(required = true)]
        targets: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "triggerd=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Opts::parse().cmd {
        Command::Check {
            remote,
            local_ttl,
            remote_ttl,
            targets,
        } => {
            let defaults = MetricTtlConfig::default();
            let ttl = MetricTtlConfig::new(
                local_ttl.unwrap_or(defaults.local),
                remote_ttl.unwrap_or(defaults.remote),
            );
            tracing::info!(%ttl, remote, count = targets.len(), "Checking targets");

            let response = check_targets(&targets, remote, &ttl);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Patterns { targets } => {
            let patterns = extract_patterns(&targets)?;
            println!("{}", serde_json::to_string_pretty(&patterns)?);
        }
    }

    Ok(())
}
