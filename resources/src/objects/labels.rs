use crate::objects::app::App;

/// Typed view over an application's labels controlling proxy behavior.
///
/// Every field except `server_names` has a default, so any app carrying the
/// `nginx_server_names` label gets a complete set of settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyLabels {
    pub server_names: String,
    pub ssl: String,
    pub ssl_redirect: String,
    pub auth: String,
    pub auth_group: String,
    pub protocol: String,
    pub custom_conf_inc: String,
    pub external: String,
}

impl ProxyLabels {
    /// Extracts proxy settings from an app descriptor. Returns `None` when
    /// the required `nginx_server_names` label is absent, which callers
    /// treat as "skip this application".
    pub fn from_app(app: &App) -> Option<ProxyLabels> {
        let get = |key: &str, default: &str| {
            app.labels
                .get(key)
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };
        let server_names = app.labels.get("nginx_server_names")?.to_owned();
        Some(ProxyLabels {
            server_names,
            ssl: get("ssl", "on"),
            ssl_redirect: get("ssl_redirect", "on"),
            auth: get("auth", "off"),
            auth_group: get("auth_group", "nginx"),
            protocol: get("protocol", "http"),
            custom_conf_inc: get("custom_conf_inc", "none"),
            external: get("external", "off"),
        })
    }

    pub fn ssl_enabled(&self) -> bool {
        self.ssl == "on"
    }

    pub fn ssl_redirect_enabled(&self) -> bool {
        self.ssl_redirect == "on"
    }

    pub fn externally_available(&self) -> bool {
        self.external == "on"
    }

    /// Environment tag derived from the server name: a name with exactly 3
    /// dot-separated segments maps to "default", anything else to its second
    /// segment. A name with no second segment falls back to "default".
    pub fn environment(&self) -> String {
        let segments: Vec<&str> = self.server_names.split('.').collect();
        if segments.len() == 3 {
            "default".to_string()
        } else {
            segments.get(1).unwrap_or(&"default").to_string()
        }
    }
}
