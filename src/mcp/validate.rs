//! Argument validation against a tool's declarative parameter schema.
//!
//! Validation collects every violation rather than stopping at the first one,
//! so a client can fix all problems in a single round trip.

use serde_json::{Map, Value};

use crate::models::{FieldViolation, ParamSpec, ParamType, ToolDefinition};

/// Validate raw arguments and fill in defaults for absent optional parameters.
///
/// `null` or missing arguments are treated as an empty object.
pub fn validate_arguments(
    tool: &ToolDefinition,
    arguments: &Value,
) -> Result<Map<String, Value>, Vec<FieldViolation>> {
    let supplied = match arguments {
        Value::Null => Map::new(),
        Value::Object(map) => map.clone(),
        other => {
            return Err(vec![FieldViolation::new(
                "arguments",
                format!("must be an object, got {}", json_type_name(other)),
            )])
        }
    };

    let mut violations = Vec::new();

    for key in supplied.keys() {
        if tool.param(key).is_none() {
            violations.push(FieldViolation::new(key, "is not a recognized parameter"));
        }
    }

    let mut resolved = Map::new();
    for param in &tool.params {
        match supplied.get(param.name) {
            Some(value) => match check_value(param, value) {
                Ok(accepted) => {
                    resolved.insert(param.name.to_string(), accepted);
                }
                Err(reason) => violations.push(FieldViolation::new(param.name, reason)),
            },
            None if param.required => {
                violations.push(FieldViolation::new(param.name, "is required"));
            }
            None => {
                if let Some(default) = &param.default {
                    resolved.insert(param.name.to_string(), default.clone());
                }
            }
        }
    }

    if violations.is_empty() {
        Ok(resolved)
    } else {
        Err(violations)
    }
}

/// Check one supplied value, returning the value to forward.
///
/// Integral floats such as `10.0` are accepted for integer parameters and
/// forwarded as integers.
fn check_value(param: &ParamSpec, value: &Value) -> Result<Value, String> {
    if value.is_null() {
        return if param.nullable {
            Ok(Value::Null)
        } else if param.required {
            Err("is required and must not be null".to_string())
        } else {
            Err(format!("must be {}, got null", param.ty.describe()))
        };
    }

    let mismatch = || format!("must be {}, got {}", param.ty.describe(), json_type_name(value));

    match &param.ty {
        ParamType::String => value.as_str().map(|_| value.clone()).ok_or_else(mismatch),
        ParamType::Boolean => value.as_bool().map(|_| value.clone()).ok_or_else(mismatch),
        ParamType::Integer { min, max } => {
            let out_of_range = || format!("must be {}, got {}", param.ty.describe(), value);
            let n = match integral(value) {
                Some(Integral::Fits(n)) => n,
                Some(Integral::TooLarge) => return Err(out_of_range()),
                None => return Err(mismatch()),
            };
            let below = min.is_some_and(|lo| n < lo);
            let above = max.is_some_and(|hi| n > hi);
            if below || above {
                Err(out_of_range())
            } else {
                Ok(Value::from(n))
            }
        }
        ParamType::StringList { min_items } => {
            let items = value.as_array().ok_or_else(mismatch)?;
            if items.iter().any(|item| !item.is_string()) {
                return Err(mismatch());
            }
            if items.len() < *min_items {
                return Err(format!(
                    "must contain at least {} item(s), got {}",
                    min_items,
                    items.len()
                ));
            }
            Ok(value.clone())
        }
        ParamType::Choice(allowed) => {
            let s = value.as_str().ok_or_else(mismatch)?;
            if allowed.contains(&s) {
                Ok(value.clone())
            } else {
                Err(format!("must be {}, got '{}'", param.ty.describe(), s))
            }
        }
        ParamType::ChoiceList(allowed) => {
            let items = value.as_array().ok_or_else(mismatch)?;
            let invalid: Vec<String> = items
                .iter()
                .filter(|item| !item.as_str().is_some_and(|s| allowed.contains(&s)))
                .map(|item| item.to_string())
                .collect();
            if invalid.is_empty() {
                Ok(value.clone())
            } else {
                Err(format!(
                    "must be {}, got invalid item(s) {}",
                    param.ty.describe(),
                    invalid.join(", ")
                ))
            }
        }
    }
}

enum Integral {
    Fits(i64),
    TooLarge,
}

/// Interpret a JSON number as an integer, if it has no fractional part
fn integral(value: &Value) -> Option<Integral> {
    if let Some(n) = value.as_i64() {
        return Some(Integral::Fits(n));
    }
    if value.as_u64().is_some() {
        return Some(Integral::TooLarge);
    }
    let f = value.as_f64()?;
    if !f.is_finite() || f.fract() != 0.0 {
        return None;
    }
    if f < i64::MIN as f64 || f >= i64::MAX as f64 {
        Some(Integral::TooLarge)
    } else {
        Some(Integral::Fits(f as i64))
    }
}

fn json_type_name(value: &Value) -> &'static str {
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
