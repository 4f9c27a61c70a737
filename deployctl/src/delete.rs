use anyhow::{Context, Result};
use clap::Args;
use reqwest::StatusCode;
use resources::config::DeployConfig;

use crate::utils;

#[derive(Args)]
pub struct Arg {
    /// App name; must be a valid FQDN
    name: String,
    /// Marathon cluster hostname to delete this app from
    #[clap(long)]
    cluster: Option<String>,
}

impl Arg {
    pub fn handle(&self, config: &DeployConfig) -> Result<()> {
        utils::ensure_fqdn(&self.name)?;
        let cluster = utils::cluster(config, &self.cluster);

        println!("Deleting the application from the {} cluster.", cluster);
        let response = utils::client()?
            .delete(format!("{}/{}", utils::apps_url(&cluster), self.name))
            .basic_auth(&config.user, Some(&config.password))
            .send()
            .with_context(|| format!("Can not delete app from {}", cluster))?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if status.is_success() {
            println!("Successfully deleted app {} from {}!\n{}", self.name, cluster, body);
            utils::commit_reminder(&self.name, "rm");
        } else if status == StatusCode::NOT_FOUND {
            println!("No such app in the {} cluster: {}", cluster, self.name);
        } else {
            println!(
                "{}'s API received the delete command but didn't like it:\n{}. Status code: {}",
                cluster, body, status
            );
        }
        Ok(())
    }
}
