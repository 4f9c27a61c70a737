use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Args;
use resources::{config::DeployConfig, template};

use crate::utils;

#[derive(Args)]
pub struct Arg {
    /// App name; must be a valid FQDN
    name: String,
    /// Marathon cluster hostname to run this app on
    #[clap(long)]
    cluster: Option<String>,
    /// Set to "on" to make the app reachable from the outside world
    #[clap(long, default_value = "off")]
    external: String,
}

impl Arg {
    pub fn handle(&self, config: &DeployConfig) -> Result<()> {
        utils::ensure_fqdn(&self.name)?;
        let cluster = utils::cluster(config, &self.cluster);

        let dir = Path::new(&config.apps_dir).join(&self.name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Can not create app dir {}", dir.display()))?;

        let rendered = template::render_file(
            &Path::new(&config.template_dir).join("marathon.json"),
            &[
                ("app_name", self.name.clone()),
                ("cluster", cluster),
                ("external", self.external.clone()),
            ],
        )?;
        let path = dir.join(format!("{}.json", self.name));
        fs::write(&path, rendered)
            .with_context(|| format!("Can not write template {}", path.display()))?;

        println!(
            "Template file {} has been successfully generated!",
            path.display()
        );
        Ok(())
    }
}
