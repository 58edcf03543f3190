use serde_json::Value;
use tracing::debug;

/// Parse each JSON-LD block independently, skipping the ones that fail.
pub fn parse_blocks<'a>(blocks: impl IntoIterator<Item = &'a str>) -> Vec<Value> {
    blocks
        .into_iter()
        .filter_map(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            match serde_json::from_str::<Value>(raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!(error = %e, "skipping malformed JSON-LD block");
                    None
                }
            }
        })
        .collect()
}

/// All `@type` values declared across the parsed blocks, including those
/// nested in `@graph` arrays.
pub fn schema_types(schemas: &[Value]) -> Vec<String> {
    let mut types = Vec::new();
    for schema in schemas {
        collect_types(schema, &mut types);
    }
    types
}

fn collect_types(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| collect_types(item, out)),
        Value::Object(map) => {
            match map.get("@type") {
                Some(Value::String(t)) => out.push(t.clone()),
                Some(Value::Array(ts)) => {
                    out.extend(ts.iter().filter_map(Value::as_str).map(str::to_string))
                }
                _ => {}
            }
            if let Some(graph) = map.get("@graph") {
                collect_types(graph, out);
            }
        }
        _ => {}
    }
}
