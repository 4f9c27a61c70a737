use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use resources::config::DeployConfig;

mod delete;
mod deploy;
mod generate;
mod query;
mod restart;
mod utils;

#[derive(Parser)]
#[clap(author, version, long_about = None)]
#[clap(propagate_version = true)]
/// Deployment tool for Docker containers on a Marathon cluster.
///
/// App definitions are JSON files kept under the apps directory, one
/// subdirectory per app, e.g. apps/awesome-app.example.com/awesome-app.example.com.json.
/// The app name needs to be a valid FQDN.
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a basic app definition file from the template.
    Generate(generate::Arg),
    /// Send the app definition to Marathon, creating or updating the app.
    Deploy(deploy::Arg),
    /// Show the currently running config of an app.
    Query(query::Arg),
    /// Trigger a rolling restart of an app.
    Restart(restart::Arg),
    /// Delete an app from the Marathon cluster.
    Delete(delete::Arg),
}

fn load_config() -> Result<DeployConfig> {
    Config::builder()
        .add_source(File::with_name("/etc/marathon-deploy/deploy.yaml").required(false))
        .add_source(Environment::default())
        .build()?
        .try_deserialize::<DeployConfig>()
        .with_context(|| "Failed to parse config".to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config()?;

    match &cli.command {
        Commands::Generate(arg) => arg.handle(&config)?,
        Commands::Deploy(arg) => arg.handle(&config)?,
        Commands::Query(arg) => arg.handle(&config)?,
        Commands::Restart(arg) => arg.handle(&config)?,
        Commands::Delete(arg) => arg.handle(&config)?,
    }

    Ok(())
}
