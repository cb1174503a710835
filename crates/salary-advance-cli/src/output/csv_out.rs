use serde_json::Value;
use std::io::{self, Write};

use super::{row_arrays, scalar_text};

/// Write output as CSV.
///
/// Row arrays (an amortization schedule, batch results) become a header
/// row plus one line per element; anything else becomes `field,value`
/// pairs.
pub fn write_csv(out: &mut impl Write, value: &Value) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Object(map) => match row_arrays(map).first() {
            Some((_, rows)) => write_rows(&mut wtr, rows)?,
            None => {
                wtr.write_record(["field", "value"])?;
                for (key, val) in map {
                    wtr.write_record([key.as_str(), &scalar_text(val)])?;
                }
            }
        },
        Value::Array(arr) => write_rows(&mut wtr, arr)?,
        other => wtr.write_record([scalar_text(other)])?,
    }

    wtr.flush()
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> io::Result<()> {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            wtr.write_record([scalar_text(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for item in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| item.get(*h).map(scalar_text).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, &value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_schedule_rows() {
        let text = render(json!({
            "result": {
                "monthlyPayment": "505.00",
                "schedule": [{"month": 1, "payment": "505.00"}]
            }
        }));
        assert_eq!(text, "month,payment\n1,505.00\n");
    }

    #[test]
    fn test_flat_object_pairs() {
        let text = render(json!({"eligible": false, "fee": "0"}));
        assert_eq!(text, "field,value\neligible,false\nfee,0\n");
    }
}
