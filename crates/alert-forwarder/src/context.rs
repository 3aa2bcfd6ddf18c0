use crate::errors::Error;
use std::collections::BTreeMap;

/// InvocationContext is the data a host makes available to a single invocation.
/// Hosts expose alert attributes in one of three shapes, and don't say which:
/// individually bound names, an aggregate object, or a single message body.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InvocationContext {
    /// Named scalar bindings.
    pub bindings: BTreeMap<String, String>,
    /// Aggregate object keyed by attribute name.
    pub object: Option<serde_json::Map<String, serde_json::Value>>,
    /// Message body which is expected to hold a JSON-encoded object.
    pub message: Option<String>,
}

impl InvocationContext {
    pub fn with_binding(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }

    pub fn with_object(mut self, object: serde_json::Map<String, serde_json::Value>) -> Self {
        self.object = Some(object);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Names of the context shapes which were supplied.
    pub fn shapes(&self) -> Vec<&'static str> {
        let mut shapes = Vec::new();
        if !self.bindings.is_empty() {
            shapes.push("bindings");
        }
        if self.object.is_some() {
            shapes.push("object");
        }
        if self.message.is_some() {
            shapes.push("message");
        }
        shapes
    }
}

/// Arguments through which a host supplies the InvocationContext.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ContextArgs {
    /// Named alert parameter, as KEY=VALUE. May be repeated.
    #[clap(short = 'p', long = "param", value_name = "KEY=VALUE", value_parser = parse_binding)]
    pub params: Vec<(String, String)>,
    /// JSON object of alert parameters keyed by name.
    #[clap(long = "params", value_name = "JSON", env = "ALERT_PARAMS")]
    pub params_object: Option<String>,
    /// Message body holding a JSON-encoded alert.
    #[clap(long, value_name = "TEXT", env = "ALERT_MESSAGE")]
    pub message: Option<String>,
}

impl ContextArgs {
    pub fn into_context(self) -> Result<InvocationContext, Error> {
        let ContextArgs {
            params,
            params_object,
            message,
        } = self;

        let object = match params_object {
            Some(raw) => match serde_json::from_str::<serde_json::Value>(&raw)
                .map_err(Error::ParamsObject)?
            {
                serde_json::Value::Object(object) => Some(object),
                other => {
                    return Err(Error::ParamsNotObject(json_type_name(&other)));
                }
            },
            None => None,
        };

        Ok(InvocationContext {
            bindings: params.into_iter().collect(),
            object,
            message,
        })
    }
}

fn parse_binding(arg: &str) -> Result<(String, String), Error> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(Error::BadBinding(arg.to_string())),
    }
}

pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_binding_parsing() {
        assert_eq!(
            parse_binding("host_name=srv01").unwrap(),
            ("host_name".to_string(), "srv01".to_string())
        );
        // Only the first '=' separates; values may be empty or contain '='.
        assert_eq!(
            parse_binding("trigger_description=load > 5 == bad").unwrap(),
            (
                "trigger_description".to_string(),
                "load > 5 == bad".to_string()
            )
        );
        assert_eq!(
            parse_binding("host_ip=").unwrap(),
            ("host_ip".to_string(), String::new())
        );

        assert!(matches!(parse_binding("host_ip"), Err(Error::BadBinding(_))));
        assert!(matches!(parse_binding("=10.0.0.1"), Err(Error::BadBinding(_))));
    }

    #[test]
    fn test_context_from_args() {
        let args = ContextArgs {
            params: vec![
                ("event_id".to_string(), "1".to_string()),
                ("event_id".to_string(), "2".to_string()),
            ],
            params_object: Some(r#"{"host_name": "srv01"}"#.to_string()),
            message: None,
        };
        let ctx = args.into_context().unwrap();

        // Later bindings of the same name win.
        assert_eq!(ctx.bindings.get("event_id").map(String::as_str), Some("2"));
        assert_eq!(ctx.object.as_ref().unwrap()["host_name"], "srv01");
        assert_eq!(ctx.shapes(), vec!["bindings", "object"]);
    }

    #[test]
    fn test_params_must_be_an_object() {
        let args = ContextArgs {
            params_object: Some("[1, 2]".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            args.into_context(),
            Err(Error::ParamsNotObject("array"))
        ));

        let args = ContextArgs {
            params_object: Some("{oops".to_string()),
            ..Default::default()
        };
        assert!(matches!(args.into_context(), Err(Error::ParamsObject(_))));
    }

    #[test]
    fn test_empty_context_has_no_shapes() {
        assert!(InvocationContext::default().shapes().is_empty());
        let ctx = InvocationContext::default().with_message("");
        assert_eq!(ctx.shapes(), vec!["message"]);
    }
}
