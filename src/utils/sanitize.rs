use serde_json::Value;

const MASK: &str = "****";

/// Masks credential-like fields before a request body is written to the log.
pub fn sanitize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, val)| {
                    let cleaned = if is_sensitive_field(key) {
                        Value::String(MASK.to_string())
                    } else {
                        sanitize_json(val)
                    };
                    (key.clone(), cleaned)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(sanitize_json).collect()),
        _ => value.clone(),
    }
}

fn is_sensitive_field(key: &str) -> bool {
    matches!(
        key.to_ascii_lowercase().as_str(),
        "password" | "secret" | "token" | "api_key" | "authorization"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leaves_ledger_fields_untouched() {
        let input = json!({"user_id": 1, "amount": "100.50"});
        assert_eq!(sanitize_json(&input), input);
    }

    #[test]
    fn masks_nested_credentials() {
        let input = json!({"meta": [{"Token": "abc"}], "status": "success"});
        let sanitized = sanitize_json(&input);
        assert_eq!(sanitized["meta"][0]["Token"], "****");
        assert_eq!(sanitized["status"], "success");
    }
}
