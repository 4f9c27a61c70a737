use serde::{Deserialize, Serialize};

/// Settings of the nginx supervisor daemon.
///
/// Built once at startup from `/etc/marathon-deploy/supervisor.yaml` plus the
/// environment and passed by reference into every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Base URL of the Marathon API
    pub marathon_url: String,
    /// Seconds to sleep between reconciliation cycles
    pub poll_interval_secs: u64,
    /// Directory candidate configs are staged in before activation
    pub staging_dir: String,
    /// Directory nginx loads per-app configs from
    pub live_dir: String,
    /// Directory holding the nginx config templates
    pub template_dir: String,
    /// Binary used for `-t -c <conf>` config checks
    pub check_command: String,
    /// Command run to reload nginx, split on whitespace
    pub reload_command: String,
    /// Upper bound on check/reload subprocess runtime
    pub command_timeout_secs: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        SupervisorConfig {
            marathon_url: "http://localhost:8080".to_string(),
            poll_interval_secs: 3,
            staging_dir: "/tmp".to_string(),
            live_dir: "/etc/nginx/sites-enabled".to_string(),
            template_dir: "/etc/marathon-deploy/templates".to_string(),
            check_command: "/sbin/nginx".to_string(),
            reload_command: "service nginx reload".to_string(),
            command_timeout_secs: 30,
        }
    }
}

/// Settings of the deployment CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub user: String,
    pub password: String,
    /// Cluster used when no `--cluster` flag is given
    pub live_cluster: String,
    pub backup_clusters: Vec<String>,
    /// Directory holding the marathon.json app definition template
    pub template_dir: String,
    /// Directory app definition files are kept in, one subdir per app
    pub apps_dir: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        DeployConfig {
            user: String::new(),
            password: String::new(),
            live_cluster: "marathon.example.com".to_string(),
            backup_clusters: vec![],
            template_dir: "/etc/marathon-deploy/templates".to_string(),
            apps_dir: "apps".to_string(),
        }
    }
}
