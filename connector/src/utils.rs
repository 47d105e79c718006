use serde_json::Value;

pub fn parse_f64(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        Value::Number(num) => num.as_f64(),
        _ => None,
    }
}

/// Venue prices stay textual so no precision is lost before display.
pub fn price_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(num) => Some(num.to_string()),
        _ => None,
    }
}

pub fn truncate_payload(payload: &str, max_len: usize) -> String {
    if payload.len() <= max_len {
        return payload.to_string();
    }
    let mut out = payload.chars().take(max_len).collect::<String>();
    out.push_str("...");
    out
}
