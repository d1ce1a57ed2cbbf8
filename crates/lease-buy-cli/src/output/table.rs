use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as tables using the tabled crate.
///
/// Scalars in the result share one Field/Value table. Nested objects get a
/// titled Field/Value table each, and arrays of rows (cost series,
/// amortization schedule) get a titled column table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    if let Value::Object(res_map) = result {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        let mut scalars = 0;
        for (key, val) in res_map {
            if !val.is_object() && !is_row_array(val) {
                builder.push_record([key.as_str(), &format_field(key, val)]);
                scalars += 1;
            }
        }
        if scalars > 0 {
            println!("{}", Table::from(builder));
        }

        for (key, val) in res_map {
            if val.is_object() {
                println!("\n{}:", title(key));
                print_flat_object(val);
            }
        }

        for (key, val) in res_map {
            if let Value::Array(rows) = val {
                if is_row_array(val) {
                    println!("\n{}:", title(key));
                    print_array_table(rows);
                }
            }
        }
    } else {
        print_flat_object(&Value::Object(envelope.clone()));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn is_row_array(value: &Value) -> bool {
    matches!(value, Value::Array(arr) if arr.first().is_some_and(Value::is_object))
}

fn title(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_field(key, val)]);
        }
        println!("{}", Table::from(builder));
    }
}

/// Ratios stored as decimals are shown as percentages.
fn format_field(key: &str, value: &Value) -> String {
    if key == "percent_difference" {
        if let Some(d) = value
            .as_str()
            .and_then(|s| s.parse::<rust_decimal::Decimal>().ok())
        {
            return format!("{}%", (d * rust_decimal::Decimal::ONE_HUNDRED).round_dp(2));
        }
    }
    format_value(value)
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

/// Money strings are shown to the cent; everything else as-is.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => round_decimal_str(s).unwrap_or_else(|| s.clone()),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

fn round_decimal_str(s: &str) -> Option<String> {
    let d: rust_decimal::Decimal = s.parse().ok()?;
    if d.scale() <= 2 {
        return Some(d.to_string());
    }
    // Keep small ratios (money factor, rates) readable.
    if d.abs() < rust_decimal::Decimal::ONE {
        return Some(d.round_dp(6).normalize().to_string());
    }
    Some(d.round_dp(2).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_strings_rounded_to_cents() {
        assert_eq!(format_value(&Value::String("509.5245".into())), "509.52");
        assert_eq!(format_value(&Value::String("0.00125".into())), "0.00125");
        assert_eq!(format_value(&Value::String("lease".into())), "lease");
    }

    #[test]
    fn test_percent_difference_shown_as_percent() {
        let v = Value::String("0.2534".into());
        assert_eq!(format_field("percent_difference", &v), "25.34%");
        assert_eq!(format_field("difference", &v), "0.2534");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title("buy_series"), "Buy series");
    }
}
