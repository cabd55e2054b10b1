use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::model::common::Address;

/// Config file read when `LEDGER_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "Ledger.toml";

/// Ledger configuration, derived from `Ledger.toml` and `LEDGER_*`
/// environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    admin: Address,
    #[serde(default)]
    journal: Option<PathBuf>,
    #[serde(default = "default_log_config")]
    log_config: PathBuf,
}

fn default_log_config() -> PathBuf {
    PathBuf::from("log4rs.yaml")
}

impl Config {
    /// An in-memory configuration with the given administrator.
    pub fn new(admin: impl Into<Address>) -> Self {
        Self {
            admin: admin.into(),
            journal: None,
            log_config: default_log_config(),
        }
    }

    /// Persist the audit trail to `path`.
    pub fn with_journal(mut self, path: impl Into<PathBuf>) -> Self {
        self.journal = Some(path.into());
        self
    }

    /// The figment this config is extracted from. The TOML file is
    /// `$LEDGER_CONFIG` if set, else [`DEFAULT_CONFIG_FILE`]; environment
    /// variables take precedence over it.
    pub fn figment() -> Figment {
        let file = Env::var_or("LEDGER_CONFIG", DEFAULT_CONFIG_FILE);
        Figment::new()
            .merge(Toml::file(file))
            .merge(Env::prefixed("LEDGER_"))
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// The configured log4rs YAML path, for tools that need logging without
    /// a full ledger config. Falls back to the default if unset or invalid.
    pub fn load_log_config() -> PathBuf {
        Self::figment()
            .extract_inner::<PathBuf>("log_config")
            .unwrap_or_else(|_| default_log_config())
    }

    /// The single identity allowed to create, start and end elections.
    pub fn admin(&self) -> &Address {
        &self.admin
    }

    /// Where the audit journal lives, if it is persisted.
    pub fn journal(&self) -> Option<&Path> {
        self.journal.as_deref()
    }

    /// Path of the log4rs YAML config.
    pub fn log_config(&self) -> &Path {
        &self.log_config
    }
}
