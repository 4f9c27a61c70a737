//! Minimal `{{name}}` placeholder substitution over external template files.
//!
//! Templates are opaque resources maintained next to the deployment config;
//! rendering only substitutes the placeholders it is given and rejects
//! templates that still contain one afterwards, so a typo in a template
//! surfaces as an error instead of leaking into a live nginx config.

use std::path::Path;

use anyhow::{bail, Context, Result};

/// Substitutes every `(key, value)` pair as `{{key}}` in `text`.
pub fn render_str(text: &str, values: &[(&str, String)]) -> Result<String> {
    let mut out = text.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{{{}}}}}", key), value);
    }
    if let Some(pos) = out.find("{{") {
        let end = out[pos..].find("}}").map(|i| pos + i + 2).unwrap_or(out.len());
        bail!("unresolved template placeholder {}", &out[pos..end]);
    }
    Ok(out)
}

/// Reads a template file and renders it with [`render_str`].
pub fn render_file(path: &Path, values: &[(&str, String)]) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template {}", path.display()))?;
    render_str(&text, values).with_context(|| format!("In template {}", path.display()))
}
