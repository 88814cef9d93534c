//! Turns a One Call JSON document into a [`WeatherInfo`].
//!
//! Deserialization runs through `serde_path_to_error`, so a field of the wrong
//! type is reported with its path (`hourly[1].humidity`) instead of being
//! coerced. `null` counts as absent everywhere.

use serde_json::Value;

use crate::{error::ParseError, model::WeatherInfo};

/// Parse a provider response body.
pub fn parse(json: &str) -> Result<WeatherInfo, ParseError> {
    let value: Value = serde_json::from_str(json).map_err(|e| ParseError::malformed(e.to_string()))?;
    parse_value(value)
}

/// Parse an already-decoded document.
pub fn parse_value(value: Value) -> Result<WeatherInfo, ParseError> {
    let root = value
        .as_object()
        .ok_or_else(|| ParseError::malformed("document is not a JSON object"))?;

    match root.get("current") {
        None | Some(Value::Null) => {
            return Err(ParseError {
                reason: "missing current block".to_string(),
                field: Some("current".to_string()),
            });
        }
        Some(Value::Object(_)) => {}
        Some(_) => return Err(ParseError::wrong_type("current", "object")),
    }

    serde_path_to_error::deserialize(value).map_err(located)
}

fn located(err: serde_path_to_error::Error<serde_json::Error>) -> ParseError {
    // The root path renders as ".".
    let path = match err.path().to_string() {
        root if root == "." => String::new(),
        path => path,
    };
    let reason = err.into_inner().to_string();

    // Missing-field errors point at the enclosing object; name the field itself.
    if let Some(name) = reason
        .strip_prefix("missing field `")
        .and_then(|rest| rest.strip_suffix('`'))
    {
        return ParseError::missing(join(&path, name));
    }

    ParseError {
        reason,
        field: (!path.is_empty()).then_some(path),
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
