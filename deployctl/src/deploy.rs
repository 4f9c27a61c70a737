use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use clap::Args;
use resources::config::DeployConfig;
use serde_json::Value;

use crate::utils;

#[derive(Args)]
pub struct Arg {
    /// App name; must be a valid FQDN
    name: String,
    /// Marathon cluster hostname to run this app on
    #[clap(long)]
    cluster: Option<String>,
    /// Force the deployment even if another one is in flight
    #[clap(long)]
    force: bool,
}

impl Arg {
    pub fn handle(&self, config: &DeployConfig) -> Result<()> {
        utils::ensure_fqdn(&self.name)?;
        let cluster = utils::cluster(config, &self.cluster);

        let path = Path::new(&config.apps_dir)
            .join(&self.name)
            .join(format!("{}.json", self.name));
        let file = File::open(&path)
            .with_context(|| format!("Can not read config file {}", path.display()))?;
        let definition: Value = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        println!("Deploying the application to the {} cluster.", cluster);
        let mut request = utils::client()?
            .put(format!("{}/{}", utils::apps_url(&cluster), self.name))
            .basic_auth(&config.user, Some(&config.password))
            .json(&definition);
        if self.force {
            request = request.query(&[("force", "true")]);
        }
        let response = request
            .send()
            .with_context(|| format!("Can not send config to {}", cluster))?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if status.is_success() {
            println!(
                "Successfully deployed app {} to {}!\n{}\n\nYou can follow it here: https://{}/ui/#/deployments",
                self.name, cluster, body, cluster
            );
            utils::commit_reminder(&self.name, "commit");
        } else {
            println!(
                "{}'s API received the config but didn't like it:\n{}. Status code: {}",
                cluster, body, status
            );
        }
        Ok(())
    }
}
