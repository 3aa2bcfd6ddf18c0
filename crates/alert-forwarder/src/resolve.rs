use crate::context::{json_type_name, InvocationContext};
use crate::event::{AlertEvent, Diagnostic, FieldValue, Payload};
use serde::{Deserialize, Serialize};

/// Strategy is the method used to extract an AlertEvent from an InvocationContext.
/// It's chosen at deployment time to match the host version in use,
/// and exactly one Strategy is applied to each invocation.
#[derive(
    Serialize, Deserialize, clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Each alert field is bound individually by name.
    DirectBinding,
    /// Alert fields are keys of a single params object.
    AggregateObject,
    /// A single message body holds the alert as a JSON object.
    MessageBody,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Strategy::DirectBinding => "direct-binding",
            Strategy::AggregateObject => "aggregate-object",
            Strategy::MessageBody => "message-body",
        })
    }
}

/// Resolve the Payload to forward for `context` under `strategy`.
///
/// Individually missing fields are simply absent from the returned AlertEvent.
/// If the strategy can't locate its context shape at all, or the message body
/// isn't a JSON object, a Diagnostic is returned in place of an AlertEvent.
/// Resolution never fails outright: there's always something to forward.
pub fn resolve(strategy: Strategy, context: &InvocationContext) -> Payload {
    let payload = match strategy {
        Strategy::DirectBinding => from_bindings(context),
        Strategy::AggregateObject => from_object(context),
        Strategy::MessageBody => from_message(context),
    };

    match &payload {
        Payload::Event(event) => {
            tracing::debug!(%strategy, ?event, "resolved alert event");
        }
        Payload::Diagnostic(diagnostic) => {
            tracing::warn!(
                %strategy,
                kind = ?diagnostic.kind,
                error = %diagnostic.error,
                "couldn't resolve alert event; forwarding a diagnostic instead"
            );
        }
    }
    payload
}

fn from_bindings(context: &InvocationContext) -> Payload {
    if context.bindings.is_empty() {
        return Payload::Diagnostic(Diagnostic::missing_context(
            "no alert parameters were bound; check the media type parameters",
        ));
    }
    let event = AlertEvent::from_lookup(|name| {
        context
            .bindings
            .get(name)
            .map(|value| FieldValue::from(value.as_str()))
    });

    non_empty(event, "none of the bound parameters is an alert field")
}

fn from_object(context: &InvocationContext) -> Payload {
    let Some(object) = &context.object else {
        return Payload::Diagnostic(Diagnostic::missing_context(
            "no params object was provided",
        ));
    };

    non_empty(
        AlertEvent::from_object(object),
        "params object contains no alert fields",
    )
}

fn from_message(context: &InvocationContext) -> Payload {
    let message = match context.message.as_deref() {
        Some(message) if !message.is_empty() => message,
        _ => {
            return Payload::Diagnostic(Diagnostic::missing_context(
                "no message body provided; check the action configuration",
            ))
        }
    };
    let malformed = |error: String| {
        Payload::Diagnostic(Diagnostic::malformed(Some(message.to_string()), error))
    };

    match serde_json::from_str::<serde_json::Value>(message) {
        Ok(serde_json::Value::Object(object)) => non_empty(
            AlertEvent::from_object(&object),
            "message body contains no alert fields",
        ),
        Ok(other) => malformed(format!(
            "message body is a JSON {}, not an object",
            json_type_name(&other)
        )),
        Err(err) => malformed(format!("failed to parse JSON: {err}")),
    }
}

fn non_empty(event: AlertEvent, otherwise: &str) -> Payload {
    if event.is_empty() {
        Payload::Diagnostic(Diagnostic::missing_context(otherwise))
    } else {
        Payload::Event(event)
    }
}
