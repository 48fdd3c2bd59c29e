use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::FormSettings;
use serde::Deserialize;
use tracing::warn;
use url::Url;

const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub school_id: Option<String>,
    pub debounce_ms: u64,
    pub requester_role: String,
    pub http_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:3000".into(),
            school_id: None,
            debounce_ms: 300,
            requester_role: "admin_1".into(),
            http_timeout_seconds: 30,
        }
    }
}

impl Settings {
    pub fn form_settings(&self) -> FormSettings {
        FormSettings {
            validation_debounce: Duration::from_millis(self.debounce_ms),
            requester_role: self.requester_role.clone(),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        Url::parse(&self.api_base_url)
            .with_context(|| format!("invalid api_base_url '{}'", self.api_base_url))?;
        anyhow::ensure!(
            !self.requester_role.trim().is_empty(),
            "requester_role must not be empty"
        );
        anyhow::ensure!(
            self.http_timeout_seconds > 0,
            "http_timeout_seconds must be greater than zero"
        );
        Ok(())
    }
}

/// Defaults, then the config file, then environment variables.
///
/// A missing file is only an error when its path was given explicitly.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) => read_settings_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                read_settings_file(default_path)?
            } else {
                Settings::default()
            }
        }
    };
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    parse_settings(&raw).with_context(|| format!("invalid config file '{}'", path.display()))
}

fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str(raw)?)
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let first = |keys: &[&str]| keys.iter().find_map(|key| lookup(*key));

    if let Some(v) = first(&["APP__API_BASE_URL", "DASHBOARD_API_BASE_URL"]) {
        settings.api_base_url = v;
    }
    if let Some(v) = first(&["APP__SCHOOL_ID", "DASHBOARD_SCHOOL_ID", "UDISE_ID"]) {
        settings.school_id = Some(v).filter(|id| !id.trim().is_empty());
    }
    if let Some(v) = first(&["APP__REQUESTER_ROLE", "DASHBOARD_REQUESTER_ROLE"]) {
        settings.requester_role = v;
    }
    if let Some(v) = first(&["APP__DEBOUNCE_MS", "DASHBOARD_DEBOUNCE_MS"]) {
        match v.parse() {
            Ok(parsed) => settings.debounce_ms = parsed,
            Err(_) => warn!(value = %v, "ignoring non-numeric debounce override"),
        }
    }
    if let Some(v) = first(&["APP__HTTP_TIMEOUT_SECONDS", "DASHBOARD_HTTP_TIMEOUT_SECONDS"]) {
        match v.parse() {
            Ok(parsed) => settings.http_timeout_seconds = parsed,
            Err(_) => warn!(value = %v, "ignoring non-numeric http timeout override"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
