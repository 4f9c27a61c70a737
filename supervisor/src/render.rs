use std::path::PathBuf;

use anyhow::Result;
use resources::{
    config::SupervisorConfig,
    objects::{app::App, labels::ProxyLabels},
    template,
};

pub const CONF_PREFIX: &str = "marathonapp-";
pub const CONF_SUFFIX: &str = ".conf";
/// Shared fallback config rendered next to every candidate; nginx loads it
/// as the entry point during `-t` validation.
pub const DEFAULT_CONF: &str = "nginx_default.conf";

/// File name of the active (or staged) config for an application.
pub fn conf_file_name(app: &str) -> String {
    format!("{}{}{}", CONF_PREFIX, app, CONF_SUFFIX)
}

/// The three per-app template variants, chosen by the TLS labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateVariant {
    Ssl,
    SslNoRedirect,
    NoSsl,
}

impl TemplateVariant {
    /// ssl off always wins; with ssl on the redirect flag decides.
    pub fn select(ssl_enabled: bool, redirect_enabled: bool) -> TemplateVariant {
        if !ssl_enabled {
            TemplateVariant::NoSsl
        } else if !redirect_enabled {
            TemplateVariant::SslNoRedirect
        } else {
            TemplateVariant::Ssl
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            TemplateVariant::Ssl => "nginx_conf_ssl.conf",
            TemplateVariant::SslNoRedirect => "nginx_conf_ssl_noredirect.conf",
            TemplateVariant::NoSsl => "nginx_conf_nossl.conf",
        }
    }
}

/// A freshly rendered candidate config and where it goes.
#[derive(Debug)]
pub struct RenderedConfig {
    pub content: String,
    pub default_content: String,
    pub staged_path: PathBuf,
    pub staged_default_path: PathBuf,
    pub live_path: PathBuf,
}

pub struct TemplateSet {
    template_dir: PathBuf,
    staging_dir: PathBuf,
    live_dir: PathBuf,
}

impl TemplateSet {
    pub fn new(config: &SupervisorConfig) -> TemplateSet {
        TemplateSet {
            template_dir: PathBuf::from(&config.template_dir),
            staging_dir: PathBuf::from(&config.staging_dir),
            live_dir: PathBuf::from(&config.live_dir),
        }
    }

    /// Renders the variant template chosen by the app's labels plus the
    /// shared default config. Internal-only apps listen on 80/443,
    /// externally available ones on the segregated 81/8443.
    pub fn render(&self, app: &App, labels: &ProxyLabels) -> Result<RenderedConfig> {
        let name = app.name();
        let (http_port, https_port) = if labels.externally_available() {
            (81, 8443)
        } else {
            (80, 443)
        };
        let variant = TemplateVariant::select(labels.ssl_enabled(), labels.ssl_redirect_enabled());
        let backends = app
            .backends()
            .iter()
            .map(|backend| format!("    server {};", backend))
            .collect::<Vec<_>>()
            .join("\n");

        let values = [
            ("app", name.clone()),
            ("nginx_server_name", labels.server_names.clone()),
            ("auth", labels.auth.clone()),
            ("auth_group", labels.auth_group.clone()),
            ("env", labels.environment()),
            ("custom_conf_inc", labels.custom_conf_inc.clone()),
            ("backends", backends),
            ("protocol", labels.protocol.clone()),
            ("http_port", http_port.to_string()),
            ("https_port", https_port.to_string()),
        ];
        let content = template::render_file(&self.template_dir.join(variant.file_name()), &values)?;

        let default_values = [
            ("staging_dir", self.staging_dir.display().to_string()),
            ("app", name.clone()),
        ];
        let default_content =
            template::render_file(&self.template_dir.join(DEFAULT_CONF), &default_values)?;

        Ok(RenderedConfig {
            content,
            default_content,
            staged_path: self.staging_dir.join(conf_file_name(&name)),
            staged_default_path: self.staging_dir.join(DEFAULT_CONF),
            live_path: self.live_dir.join(conf_file_name(&name)),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use resources::objects::app::Task;

    use super::*;

    #[test]
    fn variant_selection_covers_the_label_matrix() {
        assert_eq!(TemplateVariant::select(true, true), TemplateVariant::Ssl);
        assert_eq!(
            TemplateVariant::select(true, false),
            TemplateVariant::SslNoRedirect
        );
        // ssl off wins regardless of the redirect flag
        assert_eq!(TemplateVariant::select(false, true), TemplateVariant::NoSsl);
        assert_eq!(TemplateVariant::select(false, false), TemplateVariant::NoSsl);
    }

    fn test_app(external: &str) -> App {
        let mut labels = BTreeMap::new();
        labels.insert(
            "nginx_server_names".to_string(),
            "myapp.example.com".to_string(),
        );
        labels.insert("external".to_string(), external.to_string());
        App {
            id: "/myapp.example.com".to_string(),
            labels,
            tasks: vec![
                Task {
                    host: "host1".to_string(),
                    ports: vec![9000],
                },
                Task {
                    host: "host2".to_string(),
                    ports: vec![9100],
                },
            ],
        }
    }

    fn test_templates(config: &SupervisorConfig) {
        let dir = PathBuf::from(&config.template_dir);
        std::fs::write(
            dir.join("nginx_conf_ssl.conf"),
            "server_name {{nginx_server_name}};\nlisten {{http_port}};\nlisten {{https_port}} ssl;\nupstream {{app}} {\n{{backends}}\n}\n",
        )
        .unwrap();
        std::fs::write(
            dir.join(DEFAULT_CONF),
            "include {{staging_dir}}/marathonapp-{{app}}.conf;\n",
        )
        .unwrap();
    }

    fn test_config(dir: &std::path::Path) -> SupervisorConfig {
        SupervisorConfig {
            template_dir: dir.join("templates").display().to_string(),
            staging_dir: dir.join("staging").display().to_string(),
            live_dir: dir.join("live").display().to_string(),
            ..SupervisorConfig::default()
        }
    }

    #[test]
    fn internal_app_uses_standard_ports() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        std::fs::create_dir_all(&config.template_dir).unwrap();
        test_templates(&config);

        let app = test_app("off");
        let labels = ProxyLabels::from_app(&app).unwrap();
        let rendered = TemplateSet::new(&config).render(&app, &labels).unwrap();
        assert!(rendered.content.contains("listen 80;"));
        assert!(rendered.content.contains("listen 443 ssl;"));
        assert!(rendered.content.contains("server host1:9000;"));
        assert!(rendered.content.contains("server host2:9100;"));
    }

    #[test]
    fn external_app_uses_segregated_ports() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        std::fs::create_dir_all(&config.template_dir).unwrap();
        test_templates(&config);

        let app = test_app("on");
        let labels = ProxyLabels::from_app(&app).unwrap();
        let rendered = TemplateSet::new(&config).render(&app, &labels).unwrap();
        assert!(rendered.content.contains("listen 81;"));
        assert!(rendered.content.contains("listen 8443 ssl;"));
    }

    #[test]
    fn rendering_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        std::fs::create_dir_all(&config.template_dir).unwrap();
        test_templates(&config);

        let app = test_app("off");
        let labels = ProxyLabels::from_app(&app).unwrap();
        let templates = TemplateSet::new(&config);
        let first = templates.render(&app, &labels).unwrap();
        let second = templates.render(&app, &labels).unwrap();
        assert_eq!(first.content, second.content);
        assert_eq!(first.default_content, second.default_content);
    }

    #[test]
    fn missing_variant_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        std::fs::create_dir_all(&config.template_dir).unwrap();
        // only the default template exists
        std::fs::write(
            PathBuf::from(&config.template_dir).join(DEFAULT_CONF),
            "include {{staging_dir}}/marathonapp-{{app}}.conf;\n",
        )
        .unwrap();

        let app = test_app("off");
        let labels = ProxyLabels::from_app(&app).unwrap();
        assert!(TemplateSet::new(&config).render(&app, &labels).is_err());
    }
}
