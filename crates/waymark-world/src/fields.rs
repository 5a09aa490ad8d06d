//! Typed readers for optional fields of pack objects.
//!
//! Every reader treats a missing key and an explicit `null` as "absent"
//! and returns the caller's default. A value of the wrong kind also falls
//! back to the default, after recording an
//! [`InvalidField`](DiagnosticKind::InvalidField) diagnostic.

use serde_json::{Map, Value};

use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// JSON object as produced by `serde_json`.
pub type Object = Map<String, Value>;

/// Return a short name for the JSON kind of `value`.
pub const fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Look up `field`, mapping an explicit `null` to `None`.
pub fn present<'a>(node: &'a Object, field: &str) -> Option<&'a Value> {
    node.get(field).filter(|v| !v.is_null())
}

/// Read a string field, falling back to `default`.
pub fn string_field(
    node: &Object,
    field: &'static str,
    default: &str,
    subject: &str,
    diagnostics: &mut Diagnostics,
) -> String {
    match present(node, field) {
        None => default.to_owned(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            invalid(field, other, "a string", subject, diagnostics);
            default.to_owned()
        }
    }
}

/// Read an integer field, falling back to `default`.
///
/// Fractional numbers are truncated toward zero. Numbers outside the
/// `i32` range are rejected.
pub fn int_field(
    node: &Object,
    field: &'static str,
    default: i32,
    subject: &str,
    diagnostics: &mut Diagnostics,
) -> i32 {
    match present(node, field) {
        None => default,
        Some(value) => coerce_int(value).unwrap_or_else(|| {
            invalid(field, value, "an integer", subject, diagnostics);
            default
        }),
    }
}

/// Read a boolean field, falling back to `default`.
pub fn bool_field(
    node: &Object,
    field: &'static str,
    default: bool,
    subject: &str,
    diagnostics: &mut Diagnostics,
) -> bool {
    match present(node, field) {
        None => default,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            invalid(field, other, "a boolean", subject, diagnostics);
            default
        }
    }
}

/// Convert a JSON number to `i32`, truncating fractions.
///
/// Returns `None` for non-numbers and out-of-range values.
pub fn coerce_int(value: &Value) -> Option<i32> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        return i32::try_from(i).ok();
    }
    let f = n.as_f64()?.trunc();
    if f.is_finite() && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) {
        // Range checked above.
        #[allow(clippy::cast_possible_truncation)]
        let i = f as i32;
        Some(i)
    } else {
        None
    }
}

/// Split a comma-separated list into trimmed, non-empty tokens.
pub fn split_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

fn invalid(
    field: &'static str,
    value: &Value,
    expected: &str,
    subject: &str,
    diagnostics: &mut Diagnostics,
) {
    diagnostics.push(
        DiagnosticKind::InvalidField { field },
        subject,
        format!("invalid {field}: expected {expected}, got {}", kind_name(value)),
    );
}
