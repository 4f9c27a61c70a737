use std::{collections::HashSet, fs, io::ErrorKind, path::PathBuf};

use anyhow::{Context, Result};
use resources::{
    config::SupervisorConfig,
    objects::{app::App, labels::ProxyLabels},
};

use crate::{
    marathon::{FetchError, MarathonClient},
    nginx::NginxControl,
    render::{RenderedConfig, TemplateSet, CONF_PREFIX, CONF_SUFFIX},
};

/// What one application's reconciliation ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Candidate differed from the live config and was activated
    Activated,
    /// Live config already matches the candidate byte for byte
    Unchanged,
    /// Candidate failed the nginx config check; live config untouched
    Rejected,
    /// App carries no nginx_server_names label, nothing to do
    Skipped,
}

/// Drives one reconciliation cycle: fetch cluster state, drop configs of
/// decommissioned apps, then render / diff / validate / activate each app
/// strictly in sequence. The reconciler is the sole writer of the live
/// directory; apps share one nginx process and one reload command, so no
/// two activations may interleave.
pub struct Reconciler {
    marathon: MarathonClient,
    templates: TemplateSet,
    nginx: NginxControl,
    live_dir: PathBuf,
}

impl Reconciler {
    pub fn new(config: &SupervisorConfig) -> Result<Reconciler> {
        Ok(Reconciler {
            marathon: MarathonClient::new(&config.marathon_url)?,
            templates: TemplateSet::new(config),
            nginx: NginxControl::new(config),
            live_dir: PathBuf::from(&config.live_dir),
        })
    }

    /// One full pass. Fetch failures bubble up as fatal; everything
    /// per-application is logged and skipped.
    pub async fn run_cycle(&self) -> Result<(), FetchError> {
        let apps = self.marathon.list_apps().await?;
        let present: HashSet<String> = apps.iter().cloned().collect();
        self.cleanup_stale(&present);

        for id in &apps {
            let app = self.marathon.get_app(id).await?;
            match self.process_app(&app).await {
                Ok(Outcome::Activated) => tracing::info!("Activated new config for {}", id),
                Ok(Outcome::Unchanged) => tracing::debug!("No changes detected for {}", id),
                Ok(_) => {},
                Err(e) => tracing::warn!("Not updating config for {}: {:#}", id, e),
            }
        }
        Ok(())
    }

    /// Renders and, if needed, validates and activates the config of one
    /// application. Staging artifacts are removed whatever the outcome.
    pub async fn process_app(&self, app: &App) -> Result<Outcome> {
        let labels = match ProxyLabels::from_app(app) {
            Some(labels) => labels,
            None => {
                tracing::warn!(
                    "App {} has no nginx_server_names label, not generating a config",
                    app.name()
                );
                return Ok(Outcome::Skipped);
            },
        };

        let candidate = self.templates.render(app, &labels)?;
        let outcome = match self.stage(&candidate) {
            Ok(()) => self.activate_if_changed(app, &candidate).await,
            Err(e) => Err(e),
        };
        // A partially staged candidate must not survive either
        self.discard_staging(&candidate);
        outcome
    }

    fn stage(&self, candidate: &RenderedConfig) -> Result<()> {
        fs::write(&candidate.staged_path, &candidate.content).with_context(|| {
            format!("Failed to stage config at {}", candidate.staged_path.display())
        })?;
        fs::write(&candidate.staged_default_path, &candidate.default_content).with_context(
            || {
                format!(
                    "Failed to stage default config at {}",
                    candidate.staged_default_path.display()
                )
            },
        )?;
        Ok(())
    }

    async fn activate_if_changed(&self, app: &App, candidate: &RenderedConfig) -> Result<Outcome> {
        let live = &candidate.live_path;
        let changed = match fs::read(live) {
            Ok(bytes) => bytes != candidate.content.as_bytes(),
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to compare against {}", live.display()))
            },
        };
        if !changed {
            return Ok(Outcome::Unchanged);
        }

        tracing::info!("Changes detected for {}", app.name());
        if !self.nginx.check(&candidate.staged_default_path).await? {
            tracing::warn!("Config check failed for {}, not activating it", app.name());
            return Ok(Outcome::Rejected);
        }

        // Rename, never copy: the live path must not be absent or truncated
        // at any point.
        fs::rename(&candidate.staged_path, live)
            .with_context(|| format!("Failed to move new config to {}", live.display()))?;

        // The new config is already live; a failed reload is an operator
        // problem, not a reason to roll back.
        if let Err(e) = self.nginx.reload().await {
            tracing::warn!("Error reloading nginx: {:#}", e);
        }
        Ok(Outcome::Activated)
    }

    fn discard_staging(&self, candidate: &RenderedConfig) {
        for path in [&candidate.staged_path, &candidate.staged_default_path] {
            if let Err(e) = fs::remove_file(path) {
                if e.kind() != ErrorKind::NotFound {
                    tracing::warn!("Failed to remove staging file {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Deletes every live config whose app is not in the freshly fetched
    /// set. Runs before per-app processing so a renamed app never keeps a
    /// stale config alongside its fresh one beyond a single cycle.
    pub fn cleanup_stale(&self, present: &HashSet<String>) {
        let entries = match fs::read_dir(&self.live_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    "Cannot read live directory {}: {}",
                    self.live_dir.display(),
                    e
                );
                return;
            },
        };
        for entry in entries.flatten() {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let id = match file_name
                .strip_prefix(CONF_PREFIX)
                .and_then(|rest| rest.strip_suffix(CONF_SUFFIX))
            {
                Some(id) => id,
                None => continue,
            };
            if present.contains(id) {
                continue;
            }
            tracing::info!("Deleting stale config {}", entry.path().display());
            if let Err(e) = fs::remove_file(entry.path()) {
                tracing::warn!("Failed to delete {}: {}", entry.path().display(), e);
            }
        }
    }
}
