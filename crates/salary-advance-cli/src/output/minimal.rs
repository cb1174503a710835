use serde_json::Value;
use std::io::{self, Write};

use super::scalar_text;

/// Key answer fields, most specific first.
const PRIORITY_KEYS: [&str; 7] = [
    "approvedAmount",
    "totalRepayable",
    "monthlySalary",
    "monthlyPayment",
    "stored",
    "fee",
    "version",
];

/// Print just the key answer value from the output.
///
/// Looks for a well-known field in priority order, then falls back to
/// the first field of the result object.
pub fn write_minimal(out: &mut impl Write, value: &Value) -> io::Result<()> {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        let hit = PRIORITY_KEYS
            .iter()
            .find_map(|key| map.get(*key).filter(|v| !v.is_null()));
        if let Some(val) = hit {
            return writeln!(out, "{}", minimal_text(val));
        }

        if let Some((key, val)) = map.iter().next() {
            return writeln!(out, "{}: {}", key, minimal_text(val));
        }
    }

    writeln!(out, "{}", minimal_text(result_obj))
}

fn minimal_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        other => scalar_text(other),
    }
}
