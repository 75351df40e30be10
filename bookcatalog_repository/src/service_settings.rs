use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;

const ENV_PREFIX: &str = "BOOKCATALOG";
const CONFIG_FILE: &str = "bookcatalog";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServiceSettings {
    pub host: String,
    pub port: u16,
    /// Fills the catalog with sample books on startup
    pub seed_sample_books: bool,
    /// Exports spans to a local jaeger agent
    pub jaeger_enabled: bool,
    /// Used when RUST_LOG is not set
    pub log_filter: String,
}

impl ServiceSettings {
    /// Reads settings from defaults, optional bookcatalog.{toml,yaml,json} file
    /// and BOOKCATALOG_* environment variables, later sources take precedence
    pub fn load() -> anyhow::Result<Self> {
        Self::builder()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Failed to deserialize settings")
    }

    fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("seed_sample_books", false)?
            .set_default("jaeger_enabled", false)?
            .set_default("log_filter", "info")?)
    }

    pub fn bind_address(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}
