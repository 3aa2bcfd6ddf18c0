/// ErrorKind is the coarse classification of a failed invocation reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The forwarder isn't usably configured.
    Configuration,
    /// The host supplied malformed invocation arguments.
    Invocation,
    /// The ingestion endpoint didn't accept the alert.
    Delivery,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no ingestion endpoint is configured (set --endpoint or FORWARDER_ENDPOINT)")]
    MissingEndpoint,

    #[error("no resolution strategy is configured (set --strategy or FORWARDER_STRATEGY)")]
    MissingStrategy,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("failed to read config file {path}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("invalid parameter {0:?}: expected KEY=VALUE")]
    BadBinding(String),

    #[error("failed to parse --params as JSON")]
    ParamsObject(#[source] serde_json::Error),

    #[error("--params must be a JSON object, not {0}")]
    ParamsNotObject(&'static str),

    #[error("{0}")]
    Delivery(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingEndpoint
            | Error::MissingStrategy
            | Error::ZeroTimeout
            | Error::ConfigRead { .. }
            | Error::ConfigParse { .. }
            | Error::HttpClient(_) => ErrorKind::Configuration,
            Error::BadBinding(_) | Error::ParamsObject(_) | Error::ParamsNotObject(_) => {
                ErrorKind::Invocation
            }
            Error::Delivery(_) => ErrorKind::Delivery,
        }
    }
}
