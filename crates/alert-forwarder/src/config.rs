use crate::errors::Error;
use crate::event::AbsentFields;
use crate::resolve::Strategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Config of the forwarder, as fixed at deployment time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// URL of the ingestion endpoint, such as `http://localhost:8081/zabbix/events`.
    #[serde(default)]
    pub endpoint: Option<url::Url>,
    /// Strategy for resolving alert fields, matching the host version in use.
    #[serde(default)]
    pub strategy: Option<Strategy>,
    /// Bound on the duration of a delivery attempt.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
    /// How absent alert fields are rendered.
    #[serde(default)]
    pub absent_fields: AbsentFields,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            strategy: None,
            timeout: DEFAULT_TIMEOUT,
            absent_fields: AbsentFields::default(),
        }
    }
}

impl Config {
    /// Parse a Config from a YAML file. JSON is accepted as well.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;

        serde_yaml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn endpoint(&self) -> Result<&url::Url, Error> {
        self.endpoint.as_ref().ok_or(Error::MissingEndpoint)
    }

    pub fn strategy(&self) -> Result<Strategy, Error> {
        self.strategy.ok_or(Error::MissingStrategy)
    }
}

/// Arguments which configure the forwarder. Each overrides its counterpart in
/// the config file, if one is given.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Path to a YAML config file.
    #[clap(long, env = "FORWARDER_CONFIG", global = true)]
    pub config: Option<PathBuf>,
    /// URL of the ingestion endpoint which receives alert events.
    #[clap(long, env = "FORWARDER_ENDPOINT", global = true)]
    pub endpoint: Option<url::Url>,
    /// Strategy for resolving alert fields from the invocation.
    #[clap(long, value_enum, env = "FORWARDER_STRATEGY", global = true)]
    pub strategy: Option<Strategy>,
    /// Bound on the duration of a delivery attempt, such as `5s`.
    #[clap(long, env = "FORWARDER_TIMEOUT", global = true)]
    pub timeout: Option<humantime::Duration>,
    /// How absent alert fields are rendered.
    #[clap(long, value_enum, env = "FORWARDER_ABSENT_FIELDS", global = true)]
    pub absent_fields: Option<AbsentFields>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = Some(endpoint.clone());
        }
        if let Some(strategy) = self.strategy {
            config.strategy = Some(strategy);
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout.into();
        }
        if let Some(absent_fields) = self.absent_fields {
            config.absent_fields = absent_fields;
        }

        if config.timeout.is_zero() {
            return Err(Error::ZeroTimeout);
        }
        tracing::debug!(?config, "loaded configuration");

        Ok(config)
    }
}
