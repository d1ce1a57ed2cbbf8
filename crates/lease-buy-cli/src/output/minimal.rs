use serde_json::Value;

/// Print just the key answer from the output.
///
/// A comparison prints the winner and the cost gap. The calculators print
/// their payment. Anything else falls back to the first field.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(Value::Object(rec)) = result_obj.get("recommendation") {
        let winner = rec.get("winner").map(format_minimal).unwrap_or_default();
        return match rec.get("difference") {
            Some(diff) if winner != "tie" => format!("{} {}", winner, format_minimal(diff)),
            _ => winner,
        };
    }

    let priority_keys = ["monthly_payment", "base_payment"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => match s.parse::<rust_decimal::Decimal>() {
            Ok(d) => d.round_dp(2).to_string(),
            Err(_) => s.clone(),
        },
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
