use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use resources::config::SupervisorConfig;

mod marathon;
mod nginx;
mod reconciler;
mod render;

use reconciler::Reconciler;

/// Exit status for an unreachable or unparseable Marathon API. Reconciling
/// against unknown cluster state could delete live routes, so the process
/// aborts instead of continuing.
const EXIT_FETCH_FAILED: i32 = 3;

fn load_config() -> Result<SupervisorConfig> {
    Config::builder()
        .add_source(File::with_name("/etc/marathon-deploy/supervisor.yaml").required(false))
        .add_source(Environment::default())
        .build()?
        .try_deserialize::<SupervisorConfig>()
        .with_context(|| "Failed to parse config".to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = load_config().unwrap_or_else(|e| {
        tracing::warn!("{:#}, falling back to defaults", e);
        SupervisorConfig::default()
    });
    tracing::info!(
        "Nginx supervisor started, watching {} every {}s",
        config.marathon_url,
        config.poll_interval_secs
    );

    let reconciler = Reconciler::new(&config)?;
    let mut interval = tokio::time::interval(Duration::from_secs(config.poll_interval_secs));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received shutdown signal, exiting");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = reconciler.run_cycle().await {
                    tracing::error!("Cannot get data from Marathon's API: {}", e);
                    std::process::exit(EXIT_FETCH_FAILED);
                }
            }
        }
    }
    Ok(())
}
