//! Shape validation of raw model output.
//!
//! This layer answers "is it well-formed?" only. Whether the claimed ids exist
//! is decided later by the reconciler, so a shape failure and a grounding miss
//! stay distinguishable.

use crate::domain::model::{MatchClaim, ModelResponse};
use crate::utils::error::{Result, ScoutError, Violation};
use serde_json::{Map, Value};

/// Parse and validate `raw`. All violations are collected before rejecting;
/// nothing is partially accepted.
pub fn validate(raw: &str) -> Result<ModelResponse> {
    let value: Value = serde_json::from_str(raw).map_err(|e| ScoutError::MalformedJson {
        message: e.to_string(),
    })?;

    let mut violations = Vec::new();
    let response = check_root(&value, &mut violations);

    match response {
        Some(response) if violations.is_empty() => Ok(response),
        _ => Err(ScoutError::SchemaViolation { violations }),
    }
}

fn check_root(value: &Value, violations: &mut Vec<Violation>) -> Option<ModelResponse> {
    let Some(root) = value.as_object() else {
        violations.push(violation("", "object", value));
        return None;
    };

    let matches = check_matches(root, violations);
    let message = check_message(root, violations);

    Some(ModelResponse {
        matches: matches?,
        message,
    })
}

fn check_matches(root: &Map<String, Value>, violations: &mut Vec<Violation>) -> Option<Vec<MatchClaim>> {
    let Some(value) = root.get("matches") else {
        violations.push(missing("matches", "array"));
        return None;
    };
    let Some(items) = value.as_array() else {
        violations.push(violation("matches", "array", value));
        return None;
    };

    let mut claims = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let path = format!("matches[{}]", i);
        let Some(obj) = item.as_object() else {
            violations.push(violation(&path, "object", item));
            continue;
        };

        let id = match obj.get("id") {
            None => {
                violations.push(missing(&format!("{}.id", path), "integer"));
                None
            }
            Some(v) => {
                let id = v.as_i64();
                if id.is_none() {
                    violations.push(violation(&format!("{}.id", path), "integer", v));
                }
                id
            }
        };

        let reasoning = match obj.get("reasoning") {
            None => {
                violations.push(missing(&format!("{}.reasoning", path), "string"));
                None
            }
            Some(v) => {
                let reasoning = v.as_str();
                if reasoning.is_none() {
                    violations.push(violation(&format!("{}.reasoning", path), "string", v));
                }
                reasoning
            }
        };

        if let (Some(id), Some(reasoning)) = (id, reasoning) {
            claims.push(MatchClaim {
                id,
                reasoning: reasoning.to_string(),
            });
        }
    }

    Some(claims)
}

fn check_message(root: &Map<String, Value>, violations: &mut Vec<Violation>) -> Option<String> {
    match root.get("message") {
        None => None,
        Some(Value::String(message)) => Some(message.clone()),
        Some(other) => {
            violations.push(violation("message", "string", other));
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn violation(path: &str, expected: &str, received: &Value) -> Violation {
    let received = type_name(received);
    let message = if received == "integer" && expected == "integer" {
        // u64 beyond i64::MAX
        "Integer out of range".to_string()
    } else {
        format!("Expected {}, received {}", expected, received)
    };
    Violation {
        path: path.to_string(),
        expected: expected.to_string(),
        received: received.to_string(),
        message,
    }
}

fn missing(path: &str, expected: &str) -> Violation {
    Violation {
        path: path.to_string(),
        expected: expected.to_string(),
        received: "undefined".to_string(),
        message: "Required".to_string(),
    }
}
