use serde_json::Value;
use std::io::{self, Read};

/// Read a request piped on stdin. JSON is tried first, then YAML.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped(buffer: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => {
            let value: Value = serde_yaml::from_str(trimmed)
                .map_err(|_| format!("stdin is neither valid JSON nor YAML: {}", json_err))?;
            Ok(Some(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_none() {
        assert!(parse_piped("  \n").unwrap().is_none());
    }

    #[test]
    fn test_json_and_yaml_accepted() {
        let json = parse_piped(r#"{"mode": "simple", "horizon_months": 36}"#)
            .unwrap()
            .unwrap();
        let yaml = parse_piped("mode: simple\nhorizon_months: 36\n").unwrap().unwrap();
        assert_eq!(json, yaml);
    }
}
