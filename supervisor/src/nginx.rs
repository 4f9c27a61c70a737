use std::{path::Path, process::Stdio, time::Duration};

use anyhow::{bail, Context, Result};
use resources::config::SupervisorConfig;
use tokio::process::Command;

/// Handle on the live nginx process: config checks before activation and
/// reloads after it. Both commands are bounded by a timeout so a wedged
/// nginx cannot stall the reconciliation loop forever.
pub struct NginxControl {
    check_command: String,
    reload_command: Vec<String>,
    timeout: Duration,
}

impl NginxControl {
    pub fn new(config: &SupervisorConfig) -> NginxControl {
        NginxControl {
            check_command: config.check_command.clone(),
            reload_command: config
                .reload_command
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            timeout: Duration::from_secs(config.command_timeout_secs),
        }
    }

    /// Runs `<check_command> -t -c <conf>` and reports whether the config
    /// passed. A failure to run the command at all is an error distinct
    /// from a failing check.
    pub async fn check(&self, conf: &Path) -> Result<bool> {
        let status = self
            .run(
                Command::new(&self.check_command)
                    .arg("-t")
                    .arg("-c")
                    .arg(conf),
            )
            .await
            .with_context(|| format!("Failed to run {}", self.check_command))?;
        Ok(status)
    }

    /// Triggers an nginx reload. Best effort: the caller logs failures and
    /// moves on.
    pub async fn reload(&self) -> Result<()> {
        let (program, args) = match self.reload_command.split_first() {
            Some(split) => split,
            None => bail!("reload command is empty"),
        };
        let ok = self
            .run(Command::new(program).args(args))
            .await
            .with_context(|| format!("Failed to run {}", program))?;
        if !ok {
            bail!("{} exited with a failure status", program);
        }
        Ok(())
    }

    async fn run(&self, command: &mut Command) -> Result<bool> {
        let status = tokio::time::timeout(
            self.timeout,
            command.stdout(Stdio::null()).stderr(Stdio::null()).status(),
        )
        .await
        .with_context(|| "command timed out")??;
        Ok(status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(check: &str, reload: &str) -> NginxControl {
        NginxControl::new(&SupervisorConfig {
            check_command: check.to_string(),
            reload_command: reload.to_string(),
            command_timeout_secs: 5,
            ..SupervisorConfig::default()
        })
    }

    #[tokio::test]
    async fn check_reports_exit_status() {
        let nginx = control("true", "true");
        assert!(nginx.check(Path::new("/dev/null")).await.unwrap());
        let nginx = control("false", "true");
        assert!(!nginx.check(Path::new("/dev/null")).await.unwrap());
    }

    #[tokio::test]
    async fn missing_check_binary_is_an_error() {
        let nginx = control("/nonexistent/nginx", "true");
        assert!(nginx.check(Path::new("/dev/null")).await.is_err());
    }

    #[tokio::test]
    async fn failing_reload_is_an_error() {
        let nginx = control("true", "false");
        assert!(nginx.reload().await.is_err());
        let nginx = control("true", "true");
        assert!(nginx.reload().await.is_ok());
    }
}
