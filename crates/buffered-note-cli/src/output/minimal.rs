use serde_json::Value;

/// Print just the key answer value from the output.
///
/// For a single payment that is the payment amount; for a payoff table it is
/// one `scenario: payment` line per row.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        // Payoff table: print the scenario/payment pairs
        if let Some(Value::Array(rows)) = map.get("rows") {
            for row in rows {
                if let Value::Object(r) = row {
                    let scenario = r.get("scenario").map(format_minimal).unwrap_or_default();
                    let payment = r
                        .get("payment_formatted")
                        .map(format_minimal)
                        .unwrap_or_default();
                    println!("{}: {}", scenario, payment);
                }
            }
            return;
        }

        // Priority list of key output fields
        let priority_keys = ["payment_at_maturity", "valid"];
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
