//! Human-readable renderings for audit records.
//!
//! String values are rendered without JSON quoting so the audit line reads
//! like the call that was made; everything else is rendered as compact JSON.

use serde_json::Value;

/// Placeholder recorded instead of the result of a sensitive operation.
pub const HIDDEN_VALUE: &str = "******";

/// Rendering of a result that is not known yet.
pub const UNKNOWN_VALUE: &str = "<unknown>";

/// Render a single value.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render an argument list as `[a, b, c]`.
#[must_use]
pub fn render_args(args: &[Value]) -> String {
    let rendered: Vec<String> = args.iter().map(render_value).collect();
    format!("[{}]", rendered.join(", "))
}
