use anyhow::{Context, Result};
use clap::Args;
use resources::config::DeployConfig;
use serde_json::Value;

use crate::utils;

#[derive(Args)]
pub struct Arg {
    /// App name; must be a valid FQDN
    name: String,
    /// Marathon cluster hostname to query
    #[clap(long)]
    cluster: Option<String>,
}

impl Arg {
    pub fn handle(&self, config: &DeployConfig) -> Result<()> {
        utils::ensure_fqdn(&self.name)?;
        let cluster = utils::cluster(config, &self.cluster);
        let client = utils::client()?;
        let base = format!("{}/{}", utils::apps_url(&cluster), self.name);

        let app: Value = client
            .get(&base)
            .basic_auth(&config.user, Some(&config.password))
            .send()
            .and_then(|res| res.json())
            .with_context(|| format!("Can not get the config from {}", base))?;
        let versions: Value = client
            .get(format!("{}/versions", base))
            .basic_auth(&config.user, Some(&config.password))
            .send()
            .and_then(|res| res.json())
            .with_context(|| format!("Can not get the versions from {}", base))?;

        println!("{}", self.name);
        println!("---------------------------------");
        println!("{}", serde_json::to_string_pretty(&app["app"])?);
        println!("old_versions: {}", versions["versions"]);
        Ok(())
    }
}
