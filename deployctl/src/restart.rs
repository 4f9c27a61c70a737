use anyhow::{Context, Result};
use clap::Args;
use resources::config::DeployConfig;

use crate::utils;

#[derive(Args)]
pub struct Arg {
    /// App name; must be a valid FQDN
    name: String,
    /// Marathon cluster hostname to run this app on
    #[clap(long)]
    cluster: Option<String>,
}

impl Arg {
    pub fn handle(&self, config: &DeployConfig) -> Result<()> {
        utils::ensure_fqdn(&self.name)?;
        let cluster = utils::cluster(config, &self.cluster);

        let response = utils::client()?
            .post(format!("{}/{}/restart", utils::apps_url(&cluster), self.name))
            .basic_auth(&config.user, Some(&config.password))
            .send()
            .with_context(|| format!("Can not trigger the restart of {}", self.name))?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if status.is_success() {
            println!(
                "Successfully restarted app {}!\n{}\nYou can follow it here: https://{}/ui/#/deployments",
                self.name, body, cluster
            );
        } else {
            println!(
                "{}'s API received our command but didn't like it:\n{}. Status code: {}",
                cluster, body, status
            );
        }
        Ok(())
    }
}
