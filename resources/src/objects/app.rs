use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An application descriptor as returned by Marathon's `/v2/apps/{id}`.
///
/// The descriptor is fetched once per reconciliation cycle and discarded at
/// the end of it; nothing mutates it after deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    pub id: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// One running instance of an application, bound to a host and its
/// scheduler-assigned ports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub host: String,
    #[serde(default)]
    pub ports: Vec<u16>,
}

impl App {
    /// Application id with the hierarchical path separators stripped,
    /// e.g. `/myapp.example.com` becomes `myapp.example.com`.
    pub fn name(&self) -> String {
        self.id.replace('/', "")
    }

    /// Backend endpoints in task order. A backend is `host:port` using the
    /// first assigned port; a task without ports contributes no backend.
    pub fn backends(&self) -> Vec<String> {
        self.tasks
            .iter()
            .filter_map(|task| task.ports.first().map(|port| format!("{}:{}", task.host, port)))
            .collect()
    }
}

/// Envelope of `GET /v2/apps`.
#[derive(Debug, Deserialize)]
pub struct AppsResponse {
    pub apps: Vec<AppSummary>,
}

#[derive(Debug, Deserialize)]
pub struct AppSummary {
    pub id: String,
}

/// Envelope of `GET /v2/apps/{id}`.
#[derive(Debug, Deserialize)]
pub struct AppResponse {
    pub app: App,
}
