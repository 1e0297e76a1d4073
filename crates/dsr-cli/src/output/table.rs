use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Nested row sets longer than this are summarised instead of drawn.
const MAX_NESTED_ROWS: usize = 60;

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                println!("{}", scalar_table(map));
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    let Value::Object(res_map) = result else {
        println!("{}", scalar_table(envelope));
        return;
    };

    println!("{}", scalar_table(res_map));

    // Row sets (schedule, yearly summary) get their own tables
    for (key, val) in res_map {
        if let Value::Array(rows) = val {
            if !rows.iter().all(Value::is_object) || rows.is_empty() {
                continue;
            }
            println!("\n{}:", key);
            if rows.len() > MAX_NESTED_ROWS {
                println!(
                    "  ({} rows; use `dsr schedule` or --output csv to list them)",
                    rows.len()
                );
            } else {
                print_array_table(rows);
            }
        }
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

    if let Some(Value::Object(advice)) = envelope.get("advice") {
        println!();
        match (advice.get("text"), advice.get("message")) {
            (Some(Value::String(text)), _) => println!("Advice:\n{}", text),
            (_, Some(Value::String(message))) => println!("Advice: {}", message),
            _ => {}
        }
    }
}

/// Field/value table of every non-row-set entry.
fn scalar_table(map: &Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if matches!(val, Value::Array(rows) if rows.iter().any(Value::is_object)) {
            continue;
        }
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    builder.build()
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", builder.build());
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
