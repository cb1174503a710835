use serde_json::{Map, Value};
use std::io::{self, Write};
use tabled::{builder::Builder, Table};

use super::{row_arrays, scalar_text};

/// Format output as tables: scalar fields as a two-column table, then
/// one table per nested row array (schedules, batch results, records).
pub fn write_table(out: &mut impl Write, value: &Value) -> io::Result<()> {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                write_object(out, result)?;
                write_envelope_notes(out, map)
            }
            _ => write_object(out, map),
        },
        Value::Array(arr) => write_rows(out, arr),
        other => writeln!(out, "{}", scalar_text(other)),
    }
}

fn write_object(out: &mut impl Write, map: &Map<String, Value>) -> io::Result<()> {
    let nested = row_arrays(map);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if nested.iter().any(|(name, _)| *name == key.as_str()) {
            continue;
        }
        builder.push_record([key.as_str(), &cell_text(val)]);
    }
    writeln!(out, "{}", Table::from(builder))?;

    for (name, rows) in nested {
        writeln!(out, "\n{name}:")?;
        write_rows(out, rows)?;
    }
    Ok(())
}

fn write_envelope_notes(out: &mut impl Write, envelope: &Map<String, Value>) -> io::Result<()> {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            writeln!(out, "\nWarnings:")?;
            for w in warnings.iter().filter_map(Value::as_str) {
                writeln!(out, "  - {w}")?;
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        writeln!(out, "\nMethodology: {meth}")?;
    }
    Ok(())
}

fn write_rows(out: &mut impl Write, arr: &[Value]) -> io::Result<()> {
    let Some(Value::Object(first)) = arr.first() else {
        if arr.is_empty() {
            return writeln!(out, "(empty)");
        }
        for item in arr {
            writeln!(out, "{}", cell_text(item))?;
        }
        return Ok(());
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(String::as_str));
    for item in arr {
        if let Value::Object(map) = item {
            builder.push_record(
                headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(cell_text).unwrap_or_default()),
            );
        }
    }
    writeln!(out, "{}", Table::from(builder))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(cell_text).collect::<Vec<_>>().join(", "),
        other => scalar_text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: Value) -> String {
        let mut buf = Vec::new();
        write_table(&mut buf, &value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_schedule_gets_its_own_table() {
        let text = render(json!({
            "result": {
                "totalRepayable": "10511.62",
                "schedule": [
                    {"month": 1, "payment": "856.07"},
                    {"month": 2, "payment": "856.07"}
                ]
            },
            "methodology": "Monthly compounding",
            "warnings": []
        }));
        assert!(text.contains("totalRepayable"));
        assert!(text.contains("schedule:"));
        assert!(text.contains("856.07"));
        assert!(text.contains("Methodology: Monthly compounding"));
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(render(json!([])), "(empty)\n");
    }
}
