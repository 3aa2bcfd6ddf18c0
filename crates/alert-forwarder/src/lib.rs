//! alert-forwarder relays alert notifications raised by a monitoring system's
//! action engine to an event-ingestion HTTP endpoint.
//!
//! Each invocation handles exactly one alert:
//!
//! - The configured resolution `Strategy` extracts an `AlertEvent` from the
//!   `InvocationContext` supplied by the host. Hosts differ in whether alert
//!   attributes are bound individually, collected into a params object, or
//!   encoded as JSON in a single message body, and the strategy is chosen at
//!   deployment time to match the host.
//! - The `Forwarder` POSTs the resolved payload to the ingestion endpoint once,
//!   and classifies 200 and 202 responses as success.
//! - The outcome is returned to the host: the `OK` token on success, or an
//!   error with a diagnostic message. Retries are the host's concern.
//!
//! When resolution fails, a diagnostic document describing the failure is
//! forwarded in place of the alert, so that the ingestion service still
//! observes it.
pub mod config;
pub mod context;
pub mod errors;
pub mod event;
pub mod forward;
mod logging;
pub mod resolve;

pub use config::{Config, ConfigArgs};
pub use context::{ContextArgs, InvocationContext};
pub use errors::{Error, ErrorKind};
pub use event::{AbsentFields, AlertEvent, Diagnostic, DiagnosticKind, FieldValue, Payload};
pub use forward::{ForwardResult, Forwarder, Status};
pub use logging::{init_logging, LogArgs, LogFormat, LogLevel};
pub use resolve::{resolve, Strategy};

/// Token reported to the host when an alert was delivered.
pub const SUCCESS_TOKEN: &str = "OK";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,

    #[clap(flatten)]
    pub config: ConfigArgs,

    #[clap(flatten)]
    pub log_args: LogArgs,
}

#[derive(Debug, clap::Subcommand)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Resolve the alert and deliver it to the ingestion endpoint.
    Forward(ContextArgs),
    /// Resolve the alert and print the document which would be delivered,
    /// without sending it.
    Inspect(ContextArgs),
}

impl Cli {
    /// Run the selected command, returning the output to report to the host.
    pub async fn run(self) -> Result<String, Error> {
        let config = self.config.load()?;

        match self.command {
            Command::Forward(args) => {
                let context = args.into_context()?;
                invoke(&config, &context).await?;
                Ok(SUCCESS_TOKEN.to_string())
            }
            Command::Inspect(args) => {
                let context = args.into_context()?;
                inspect(&config, &context)
            }
        }
    }
}

/// Resolve and deliver one alert from `context`.
///
/// Configuration is validated before anything is resolved or sent, so an
/// invocation produces either zero or one outbound request.
pub async fn invoke(config: &Config, context: &InvocationContext) -> Result<ForwardResult, Error> {
    let strategy = config.strategy()?;
    let forwarder = Forwarder::new(
        config.endpoint()?.clone(),
        config.timeout,
        config.absent_fields,
    )?;

    let payload = resolve(strategy, context);
    let result = forwarder.forward(&payload).await;

    if result.ok {
        tracing::debug!(status = %result.status, "alert delivered");
    } else {
        tracing::error!(
            endpoint = %forwarder.endpoint(),
            diagnostic = %result.diagnostic(),
            "alert delivery failed"
        );
    }
    result.into_result()
}

/// Resolve one alert from `context` and describe what `invoke` would deliver.
pub fn inspect(config: &Config, context: &InvocationContext) -> Result<String, Error> {
    let strategy = config.strategy()?;
    let payload = resolve(strategy, context);

    let diagnostic = match &payload {
        Payload::Event(_) => None,
        Payload::Diagnostic(diagnostic) => Some(format!("{:?}", diagnostic.kind)),
    };

    let report = serde_json::json!({
        "strategy": strategy,
        "shapes": context.shapes(),
        "endpoint": config.endpoint.as_ref().map(url::Url::as_str),
        "diagnostic": diagnostic,
        "document": payload.render(config.absent_fields),
    });
    Ok(format!("{report:#}"))
}
