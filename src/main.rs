//! syncable - operation log inspector.
//!
//! Streams each configured operation log through the protocol codec,
//! checks that it re-serializes byte for byte and prints the entries that
//! fit the input's filter.

mod config;
mod inspect;
mod telemetry;

use crate::config::{Config, validate};
use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "syncable.toml".to_string());

    let config =
        Config::load(&config_path).with_context(|| format!("failed to load {config_path}"))?;

    telemetry::init(&config.log)?;

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(path = %config_path, error = %e, "Invalid configuration");
        }
        anyhow::bail!(
            "{} configuration error(s) in {}",
            errors.len(),
            config_path
        );
    }

    info!(
        config = %config_path,
        inputs = config.input.len(),
        diff_ops = ?config.protocol.diff_ops,
        "Starting syncable"
    );

    let mut stdout = tokio::io::stdout();
    let mut failed = 0;

    for input in &config.input {
        let path = input.path.display();
        match inspect::inspect(input, &config.protocol, &config.output, &mut stdout).await {
            Ok(report) if report.is_ok() => info!(
                path = %path,
                bytes = report.bytes,
                entries = report.entries,
                diffs = report.diffs,
                patch_entries = report.patch_entries,
                matched = report.matched,
                verified = report.round_trip.is_some(),
                "Inspected log"
            ),
            Ok(report) => {
                failed += 1;
                error!(
                    path = %path,
                    entries = report.entries,
                    "Log does not round-trip"
                );
            }
            Err(e) => {
                failed += 1;
                error!(path = %path, error = %format!("{e:#}"), "Inspection failed");
            }
        }
    }

    stdout.flush().await?;

    if failed > 0 {
        anyhow::bail!("{failed} of {} input(s) failed", config.input.len());
    }
    Ok(())
}
