use serde_json::{Map, Value};
use std::io;

/// Row arrays exported in preference to the field/value listing.
const ROW_KEYS: [&str; 2] = ["series", "schedule"];

/// Write output as CSV to stdout.
///
/// A comparison writes its month-by-month `series`, a loan with a schedule
/// writes the schedule. Anything else becomes a two-column field/value
/// listing with nested keys joined by dots.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                let rows = ROW_KEYS
                    .iter()
                    .find_map(|k| result.get(*k).and_then(Value::as_array));
                match rows {
                    Some(rows) => write_array_csv(&mut wtr, rows),
                    None => write_fields(&mut wtr, result),
                }
            } else {
                write_fields(&mut wtr, map);
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    let mut flat = Vec::new();
    flatten("", map, &mut flat);
    for (key, val) in flat {
        let _ = wtr.write_record([key.as_str(), &val]);
    }
}

fn flatten(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, String)>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => flatten(&name, inner, out),
            _ => out.push((name, format_csv_value(val))),
        }
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
