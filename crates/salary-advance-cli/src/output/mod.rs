pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;
use std::io::{self, Write};

/// Dispatch output to the appropriate formatter on stdout.
pub fn format_output(format: &OutputFormat, value: &Value) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => json::write_json(&mut out, value)?,
        OutputFormat::Table => table::write_table(&mut out, value)?,
        OutputFormat::Csv => csv_out::write_csv(&mut out, value)?,
        OutputFormat::Minimal => minimal::write_minimal(&mut out, value)?,
    }
    out.flush()
}

/// Render a scalar for human-oriented output.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Row arrays (arrays of objects) nested directly under an object,
/// e.g. an amortization schedule.
pub(crate) fn row_arrays(map: &serde_json::Map<String, Value>) -> Vec<(&str, &[Value])> {
    map.iter()
        .filter_map(|(key, val)| match val {
            Value::Array(items) if items.first().is_some_and(Value::is_object) => {
                Some((key.as_str(), items.as_slice()))
            }
            _ => None,
        })
        .collect()
}
