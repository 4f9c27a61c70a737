use std::time::Duration;

use anyhow::{bail, Result};
use reqwest::blocking::Client;
use resources::config::DeployConfig;

/// HTTP client for Marathon API calls, built without proxy support so
/// inherited proxy environment variables never divert them.
pub fn client() -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(10))
        .no_proxy()
        .build()?)
}

/// Cluster targeted by a command: the `--cluster` flag if given, otherwise
/// the configured live cluster.
pub fn cluster(config: &DeployConfig, flag: &Option<String>) -> String {
    flag.clone().unwrap_or_else(|| config.live_cluster.clone())
}

pub fn apps_url(cluster: &str) -> String {
    format!("https://{}/v2/apps", cluster)
}

pub fn ensure_fqdn(name: &str) -> Result<()> {
    if !is_valid_hostname(name) {
        bail!("{} is not a valid hostname", name);
    }
    Ok(())
}

/// RFC-style hostname check: dot-separated labels of up to 63 alphanumeric
/// or hyphen characters, no leading or trailing hyphen, 255 chars total.
pub fn is_valid_hostname(name: &str) -> bool {
    if name.is_empty() || name.len() > 255 {
        return false;
    }
    let name = name.strip_suffix('.').unwrap_or(name);
    name.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// The definition files are the only place an app's config lives; remind
/// the operator to commit them.
pub fn commit_reminder(name: &str, action: &str) {
    println!(
        "Do not forget to commit your changes to the conf file to git!\n\
         These configs do not exist anywhere else but in this repo!\n\n\
         git {} apps/{}/{}.json",
        action, name, name
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_fqdns() {
        assert!(is_valid_hostname("myapp.example.com"));
        assert!(is_valid_hostname("my-app.staging.example.com"));
        assert!(is_valid_hostname("myapp.example.com."));
    }

    #[test]
    fn rejects_bad_hostnames() {
        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname("my_app.example.com"));
        assert!(!is_valid_hostname("-myapp.example.com"));
        assert!(!is_valid_hostname("myapp-.example.com"));
        assert!(!is_valid_hostname("my..example.com"));
        assert!(!is_valid_hostname(&"a".repeat(64)));
        assert!(!is_valid_hostname(&format!("{}.com", "a.".repeat(130))));
    }
}
