//! Configuration management.
//!
//! Precedence, highest first: command-line flag, environment variable,
//! config file, built-in default.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use dirowner::LdapConfig;
use serde::Deserialize;

use crate::cli::args::LdapArgs;

/// Config file contents.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory service settings.
    #[serde(default)]
    pub ldap: LdapSection,
}

/// The `[ldap]` table.
#[derive(Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LdapSection {
    pub url: Option<String>,
    pub bind_dn: Option<String>,
    pub bind_password: Option<String>,
    pub base_dn: Option<String>,
    /// Seconds.
    pub connect_timeout: Option<u64>,
    pub starttls: Option<bool>,
}

impl Config {
    /// Default config file location, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dirowner").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::read(&path),
            _ => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Merge flags/environment over this file and the built-in defaults.
    pub fn ldap_config(&self, args: &LdapArgs) -> LdapConfig {
        let file = &self.ldap;
        let mut config = LdapConfig::default();

        if let Some(url) = args.url.as_ref().or(file.url.as_ref()) {
            config.url.clone_from(url);
        }
        if let Some(dn) = args.bind_dn.as_ref().or(file.bind_dn.as_ref()) {
            config.bind_dn.clone_from(dn);
        }
        if let Some(password) = args.bind_password.as_ref().or(file.bind_password.as_ref()) {
            config.bind_password.clone_from(password);
        }
        if let Some(dn) = args.base_dn.as_ref().or(file.base_dn.as_ref()) {
            config.base_dn.clone_from(dn);
        }

        config
    }
}
