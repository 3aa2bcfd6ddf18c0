use serde::{Deserialize, Serialize};

/// Rendered in place of an absent field when `AbsentFields::Sentinel` is configured.
pub const SENTINEL: &str = "UNDEFINED";

/// Canonical field names of an AlertEvent, in the order they're rendered.
pub const FIELD_NAMES: [&str; 10] = [
    "event_id",
    "event_status",
    "event_severity",
    "host_id",
    "host_name",
    "host_ip",
    "trigger_id",
    "trigger_name",
    "trigger_description",
    "timestamp",
];

/// FieldValue is the value of one canonical alert field, carried verbatim.
/// Bindings are always text, but a message body may hold any JSON value for a
/// field (an unquoted `{EVENT.ID}` macro yields a bare number), and that value
/// is forwarded as it was received.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Json(serde_json::Value),
}

impl FieldValue {
    /// Map a JSON value onto a FieldValue. `null` is absent.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(Self::Text(text.clone())),
            other => Some(Self::Json(other.clone())),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(text) => serde_json::Value::String(text.clone()),
            Self::Json(value) => value.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// AlertEvent is the canonical representation of a single alert notification.
/// Every field is optional: hosts don't reliably expose all of them, and a
/// partially-populated event is still worth forwarding.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct AlertEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_status: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_severity: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_id: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_name: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_ip: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_id: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_name: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_description: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<FieldValue>,
}

impl AlertEvent {
    /// Build an AlertEvent by looking up each canonical field name.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&'static str) -> Option<FieldValue>,
    {
        let mut event = AlertEvent::default();
        for name in FIELD_NAMES {
            *event.field_mut(name) = lookup(name);
        }
        event
    }

    /// Build an AlertEvent from the canonical keys of a JSON object.
    /// Other keys are dropped.
    pub fn from_object(object: &serde_json::Map<String, serde_json::Value>) -> Self {
        Self::from_lookup(|name| object.get(name).and_then(FieldValue::from_json))
    }

    /// Canonical fields paired with their values, in `FIELD_NAMES` order.
    pub fn fields(&self) -> [(&'static str, Option<&FieldValue>); 10] {
        [
            ("event_id", self.event_id.as_ref()),
            ("event_status", self.event_status.as_ref()),
            ("event_severity", self.event_severity.as_ref()),
            ("host_id", self.host_id.as_ref()),
            ("host_name", self.host_name.as_ref()),
            ("host_ip", self.host_ip.as_ref()),
            ("trigger_id", self.trigger_id.as_ref()),
            ("trigger_name", self.trigger_name.as_ref()),
            ("trigger_description", self.trigger_description.as_ref()),
            ("timestamp", self.timestamp.as_ref()),
        ]
    }

    /// True if no canonical field is present.
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_none())
    }

    fn field_mut(&mut self, name: &str) -> &mut Option<FieldValue> {
        match name {
            "event_id" => &mut self.event_id,
            "event_status" => &mut self.event_status,
            "event_severity" => &mut self.event_severity,
            "host_id" => &mut self.host_id,
            "host_name" => &mut self.host_name,
            "host_ip" => &mut self.host_ip,
            "trigger_id" => &mut self.trigger_id,
            "trigger_name" => &mut self.trigger_name,
            "trigger_description" => &mut self.trigger_description,
            "timestamp" => &mut self.timestamp,
            other => unreachable!("{other} is not a canonical field name"),
        }
    }
}

/// DiagnosticKind classifies why a Diagnostic was produced in place of an AlertEvent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The configured strategy found no usable context shape.
    MissingContext,
    /// A message body couldn't be parsed as a JSON object.
    MalformedMessage,
}

/// Diagnostic is forwarded in place of an AlertEvent when resolution fails,
/// so that the ingestion service still observes the failed alert.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    #[serde(skip)]
    pub kind: DiagnosticKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_message: Option<String>,
    pub error: String,
}

impl Diagnostic {
    pub fn missing_context(error: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::MissingContext,
            raw_message: None,
            error: error.into(),
        }
    }

    pub fn malformed(raw_message: Option<String>, error: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::MalformedMessage,
            raw_message,
            error: error.into(),
        }
    }
}

/// Payload is the body of one outbound delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Event(AlertEvent),
    Diagnostic(Diagnostic),
}

impl Payload {
    /// Render this Payload as the JSON document to POST.
    pub fn render(&self, absent: AbsentFields) -> serde_json::Value {
        match self {
            Payload::Event(event) => {
                let mut doc = serde_json::Map::new();
                for (name, value) in event.fields() {
                    let value = match (value, absent) {
                        (Some(value), _) => value.to_json(),
                        (None, AbsentFields::Omit) => continue,
                        (None, AbsentFields::Null) => serde_json::Value::Null,
                        (None, AbsentFields::Sentinel) => {
                            serde_json::Value::String(SENTINEL.to_string())
                        }
                    };
                    doc.insert(name.to_string(), value);
                }
                serde_json::Value::Object(doc)
            }
            Payload::Diagnostic(diagnostic) => serde_json::json!(diagnostic),
        }
    }
}

/// AbsentFields controls how absent AlertEvent fields are rendered.
#[derive(
    Serialize, Deserialize, clap::ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq,
)]
#[serde(rename_all = "camelCase")]
pub enum AbsentFields {
    /// Leave absent fields out of the document.
    #[default]
    Omit,
    /// Render absent fields as JSON null.
    Null,
    /// Render absent fields as the string "UNDEFINED".
    Sentinel,
}
