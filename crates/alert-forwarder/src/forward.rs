use crate::errors::Error;
use crate::event::{AbsentFields, Payload};
use std::time::Duration;

/// Status of a single delivery attempt: either the HTTP status code returned
/// by the ingestion endpoint, or a transport-level failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Code(u16),
    Error(String),
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Code(code) => write!(f, "{code}"),
            Status::Error(_) => f.write_str("error"),
        }
    }
}

/// ForwardResult is the outcome of exactly one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardResult {
    pub status: Status,
    /// Raw response body, if a response was read.
    pub body: Option<String>,
    pub ok: bool,
}

impl ForwardResult {
    fn response(code: u16, body: Option<String>) -> Self {
        Self {
            status: Status::Code(code),
            body,
            ok: is_accepted(code),
        }
    }

    fn transport(cause: String) -> Self {
        Self {
            status: Status::Error(cause),
            body: None,
            ok: false,
        }
    }

    /// Human-readable description of this result, suitable for reporting to the host.
    pub fn diagnostic(&self) -> String {
        match (&self.status, self.body.as_deref()) {
            (Status::Error(cause), _) => format!("transport error: {cause}"),
            (Status::Code(code), None | Some("")) => format!("HTTP {code}"),
            (Status::Code(code), Some(body)) => format!("HTTP {code}: {body}"),
        }
    }

    /// Map a failed result into an Error carrying its diagnostic.
    pub fn into_result(self) -> Result<ForwardResult, Error> {
        if self.ok {
            Ok(self)
        } else {
            Err(Error::Delivery(self.diagnostic()))
        }
    }
}

/// Only 200 OK and 202 Accepted indicate the ingestion endpoint took the alert.
pub fn is_accepted(code: u16) -> bool {
    matches!(code, 200 | 202)
}

/// Forwarder delivers Payloads to a fixed ingestion endpoint.
#[derive(Debug, Clone)]
pub struct Forwarder {
    http_client: reqwest::Client,
    endpoint: url::Url,
    timeout: Duration,
    absent: AbsentFields,
}

impl Forwarder {
    pub fn new(endpoint: url::Url, timeout: Duration, absent: AbsentFields) -> Result<Self, Error> {
        // The client timeout bounds the entire exchange,
        // from connecting through reading the response body.
        // Redirects aren't followed: each invocation sends at most one request.
        let http_client = reqwest::ClientBuilder::new()
            .user_agent(concat!("alert-forwarder/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(Error::HttpClient)?;

        Ok(Self {
            http_client,
            endpoint,
            timeout,
            absent,
        })
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    /// POST `payload` to the ingestion endpoint exactly once, and classify the outcome.
    /// No retries are attempted: that policy belongs to the host.
    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint))]
    pub async fn forward(&self, payload: &Payload) -> ForwardResult {
        let document = payload.render(self.absent);
        tracing::debug!(%document, "sending alert payload");

        let result = match self
            .http_client
            .post(self.endpoint.clone())
            .json(&document)
            .send()
            .await
        {
            Ok(response) => {
                let code = response.status().as_u16();

                // The endpoint has answered: its status decides the outcome
                // even if the body can't be read.
                match response.text().await {
                    Ok(body) => ForwardResult::response(code, Some(body)),
                    Err(err) => {
                        tracing::warn!(
                            code,
                            error = %self.describe(err),
                            "failed to read response body"
                        );
                        ForwardResult::response(code, None)
                    }
                }
            }
            Err(err) => ForwardResult::transport(self.describe(err)),
        };

        tracing::debug!(status = %result.status, body = ?result.body, ok = result.ok, "received response");
        result
    }

    fn describe(&self, err: reqwest::Error) -> String {
        if err.is_timeout() {
            format!(
                "request timed out after {}",
                humantime::format_duration(self.timeout)
            )
        } else {
            err.to_string()
        }
    }
}
