use log::debug;
use serde_json::Value as JsonValue;

use super::error::ValidationError;
use super::schema::{
    FilterColumn, NumericOperator, TextOperator, DEFAULT_LIMIT, MAX_CONDITIONS, MAX_LIMIT,
    MAX_LIST_VALUES, MAX_TEXT_LEN, MIN_LIMIT,
};
use super::spec::{Condition, FilterSpec, Mode, NumericPredicate, TextPredicate};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Turn an untrusted JSON structure into a [`FilterSpec`].
///
/// Checks shape, membership and bounds only; the payload is never
/// interpreted. `mode` and `limit` are tolerant (fall back to `all` and 50),
/// every other problem rejects the whole structure.
pub fn validate(raw: &JsonValue) -> Result<FilterSpec, ValidationError> {
    let result = validate_object(raw);
    if let Err(err) = &result {
        debug!("rejected filter specification ({}): {}", err.label(), err.reason());
    }
    result
}

fn validate_object(raw: &JsonValue) -> Result<FilterSpec, ValidationError> {
    let obj = raw.as_object().ok_or_else(|| {
        ValidationError::ValueShapeViolation(format!(
            "filter specification must be an object, got {}",
            type_name(raw)
        ))
    })?;

    let mode = match obj.get("mode").and_then(JsonValue::as_str) {
        Some("any") => Mode::Any,
        _ => Mode::All,
    };

    let raw_conditions: &[JsonValue] = match obj.get("conditions") {
        None | Some(JsonValue::Null) => &[],
        Some(JsonValue::Array(items)) => items,
        Some(other) => {
            return Err(ValidationError::ValueShapeViolation(format!(
                "'conditions' must be a list, got {}",
                type_name(other)
            )))
        }
    };
    if raw_conditions.len() > MAX_CONDITIONS {
        return Err(ValidationError::LimitExceededViolation(format!(
            "too many conditions: {} (max {MAX_CONDITIONS})",
            raw_conditions.len()
        )));
    }

    let conditions = raw_conditions
        .iter()
        .enumerate()
        .map(|(index, cond)| validate_condition(index, cond))
        .collect::<Result<Vec<_>, _>>()?;

    let limit = coerce_limit(obj.get("limit"));

    Ok(FilterSpec::new(mode, conditions, limit))
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

fn validate_condition(index: usize, raw: &JsonValue) -> Result<Condition, ValidationError> {
    let obj = raw.as_object().ok_or_else(|| {
        ValidationError::ValueShapeViolation(format!(
            "condition {index} must be an object, got {}",
            type_name(raw)
        ))
    })?;

    let raw_column = obj.get("column");
    let column = raw_column
        .and_then(JsonValue::as_str)
        .and_then(FilterColumn::from_name)
        .ok_or_else(|| {
            ValidationError::SchemaViolation(format!("column not allowed: {}", describe(raw_column)))
        })?;

    let raw_operator = obj.get("operator");
    let operator = raw_operator.and_then(JsonValue::as_str);
    let value = obj.get("value").unwrap_or(&JsonValue::Null);

    match column {
        FilterColumn::Numeric(column) => {
            let op = operator.and_then(NumericOperator::from_symbol).ok_or_else(|| {
                ValidationError::OperatorViolation(format!(
                    "operator {} not allowed for numeric column '{}'",
                    describe(raw_operator),
                    column.name()
                ))
            })?;
            Ok(Condition::Numeric {
                column,
                predicate: numeric_predicate(op, value)?,
            })
        }
        FilterColumn::Text(column) => {
            let op = operator.and_then(TextOperator::from_symbol).ok_or_else(|| {
                ValidationError::OperatorViolation(format!(
                    "operator {} not allowed for text column '{}'",
                    describe(raw_operator),
                    column.name()
                ))
            })?;
            Ok(Condition::Text {
                column,
                predicate: text_predicate(op, value)?,
            })
        }
    }
}

fn numeric_predicate(
    op: NumericOperator,
    value: &JsonValue,
) -> Result<NumericPredicate, ValidationError> {
    let build: fn(f64) -> NumericPredicate = match op {
        NumericOperator::Gt => NumericPredicate::Gt,
        NumericOperator::Ge => NumericPredicate::Ge,
        NumericOperator::Lt => NumericPredicate::Lt,
        NumericOperator::Le => NumericPredicate::Le,
        NumericOperator::Eq => NumericPredicate::Eq,
        NumericOperator::Ne => NumericPredicate::Ne,
        NumericOperator::Between => {
            let bounds = match value.as_array() {
                Some(items) if items.len() == 2 => items,
                _ => {
                    return Err(ValidationError::ValueShapeViolation(format!(
                        "'between' requires a 2-item list, got {}",
                        describe(Some(value))
                    )))
                }
            };
            let low = require_real(&bounds[0], op)?;
            let high = require_real(&bounds[1], op)?;
            return Ok(NumericPredicate::Between { low, high });
        }
    };
    Ok(build(require_real(value, op)?))
}

fn text_predicate(op: TextOperator, value: &JsonValue) -> Result<TextPredicate, ValidationError> {
    match op {
        TextOperator::Contains | TextOperator::Equals => {
            let text = coerce_text(value);
            let len = text.chars().count();
            if len > MAX_TEXT_LEN {
                return Err(ValidationError::LimitExceededViolation(format!(
                    "text value too long: {len} characters (max {MAX_TEXT_LEN})"
                )));
            }
            Ok(if op == TextOperator::Contains {
                TextPredicate::Contains(text)
            } else {
                TextPredicate::Equals(text)
            })
        }
        TextOperator::In | TextOperator::NotIn => {
            let items = value.as_array().ok_or_else(|| {
                ValidationError::ValueShapeViolation(format!(
                    "operator '{}' requires a list, got {}",
                    op.symbol(),
                    type_name(value)
                ))
            })?;
            if items.len() > MAX_LIST_VALUES {
                return Err(ValidationError::LimitExceededViolation(format!(
                    "too many values in list: {} (max {MAX_LIST_VALUES})",
                    items.len()
                )));
            }
            let values: Vec<String> = items
                .iter()
                .map(|item| coerce_text(item).chars().take(MAX_TEXT_LEN).collect())
                .collect();
            Ok(if op == TextOperator::In {
                TextPredicate::In(values)
            } else {
                TextPredicate::NotIn(values)
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Coercions
// ---------------------------------------------------------------------------

/// Numbers and numeric strings; the result must be finite.
fn coerce_real(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn require_real(value: &JsonValue, op: NumericOperator) -> Result<f64, ValidationError> {
    coerce_real(value).ok_or_else(|| {
        ValidationError::ValueCoercionViolation(format!(
            "operator '{}' requires a numeric value, got {}",
            op.symbol(),
            describe(Some(value))
        ))
    })
}

/// Total: every JSON value has a text form.
/// Total text coercion. Null (including a missing value) renders as `None`
/// and booleans as `True` / `False`, so they never match everything.
fn coerce_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => "None".to_string(),
        JsonValue::Bool(true) => "True".to_string(),
        JsonValue::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

fn coerce_limit(value: Option<&JsonValue>) -> usize {
    let parsed = match value {
        Some(JsonValue::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Some(JsonValue::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let limit = parsed.unwrap_or(DEFAULT_LIMIT as i64);
    limit.clamp(MIN_LIMIT as i64, MAX_LIMIT as i64) as usize
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "an object",
    }
}

/// Short rendering of an offending value for error messages.
fn describe(value: Option<&JsonValue>) -> String {
    const MAX: usize = 60;
    let text = match value {
        None => return "<missing>".to_string(),
        Some(JsonValue::String(s)) => format!("'{s}'"),
        Some(other) => other.to_string(),
    };
    if text.chars().count() > MAX {
        let head: String = text.chars().take(MAX).collect();
        format!("{head}...")
    } else {
        text
    }
}
