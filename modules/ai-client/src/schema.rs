use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Depth guard for `$ref` inlining; recursive types stop expanding here.
const MAX_INLINE_DEPTH: usize = 32;

/// Types that can be requested as strict structured output.
///
/// Implemented for anything that is `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Schema in the shape strict mode accepts: closed objects, every
    /// property required, no `$ref`, no numeric `format`/bounds.
    fn strict_schema() -> Value {
        let root = serde_json::to_value(schema_for!(Self)).unwrap_or_default();
        strict(root)
    }

    fn output_name() -> String {
        <Self as JsonSchema>::schema_name()
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Rewrite a draft-07 root schema into strict form.
pub fn strict(mut root: Value) -> Value {
    let definitions = match root.as_object_mut() {
        Some(map) => {
            map.remove("$schema");
            map.remove("definitions").unwrap_or(Value::Null)
        }
        None => return root,
    };
    tighten(&mut root, &definitions, 0);
    root
}

fn tighten(node: &mut Value, definitions: &Value, depth: usize) {
    match node {
        Value::Object(map) => {
            if let Some(resolved) = resolve(map, definitions) {
                if depth < MAX_INLINE_DEPTH {
                    *node = resolved;
                    tighten(node, definitions, depth + 1);
                }
                return;
            }

            close_object(map);
            drop_numeric_constraints(map);

            for child in map.values_mut() {
                tighten(child, definitions, depth);
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                tighten(item, definitions, depth);
            }
        }
        _ => {}
    }
}

/// The schema a `$ref` or single-element `allOf` stands for, if any.
fn resolve(map: &Map<String, Value>, definitions: &Value) -> Option<Value> {
    if let Some(name) = map
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|r| r.strip_prefix("#/definitions/"))
    {
        return definitions.get(name).cloned();
    }
    match map.get("allOf") {
        Some(Value::Array(parts)) if parts.len() == 1 => parts.first().cloned(),
        _ => None,
    }
}

fn close_object(map: &mut Map<String, Value>) {
    if map.get("type").and_then(Value::as_str) != Some("object") {
        return;
    }
    map.insert("additionalProperties".to_string(), Value::Bool(false));
    let required: Vec<Value> = match map.get("properties") {
        Some(Value::Object(props)) => props.keys().cloned().map(Value::String).collect(),
        _ => Vec::new(),
    };
    map.insert("required".to_string(), Value::Array(required));
}

fn drop_numeric_constraints(map: &mut Map<String, Value>) {
    let numeric = match map.get("type") {
        Some(Value::String(t)) => t == "integer" || t == "number",
        Some(Value::Array(types)) => types
            .iter()
            .any(|t| t.as_str() == Some("integer") || t.as_str() == Some("number")),
        _ => false,
    };
    if numeric {
        map.remove("format");
        map.remove("minimum");
        map.remove("maximum");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Query {
        query: String,
        reason: Option<String>,
    }

    #[derive(Deserialize, JsonSchema)]
    #[allow(dead_code)]
    struct Plan {
        searches: Vec<Query>,
        budget: u32,
    }

    #[test]
    fn root_has_no_definitions_or_dialect() {
        let schema = Plan::strict_schema();
        let obj = schema.as_object().unwrap();
        assert!(!obj.contains_key("definitions"));
        assert!(!obj.contains_key("$schema"));
        assert_eq!(obj["additionalProperties"], Value::Bool(false));
    }

    #[test]
    fn optional_fields_are_still_required() {
        let schema = Query::strict_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(required.contains(&"query"));
        assert!(required.contains(&"reason"));
    }

    #[test]
    fn nested_refs_are_inlined_and_closed() {
        let schema = Plan::strict_schema();
        let items = &schema["properties"]["searches"]["items"];
        assert!(items.get("$ref").is_none());
        assert_eq!(items["type"], "object");
        assert_eq!(items["additionalProperties"], Value::Bool(false));
    }

    #[test]
    fn integer_format_is_stripped() {
        let schema = Plan::strict_schema();
        let budget = schema["properties"]["budget"].as_object().unwrap();
        assert_eq!(budget["type"], "integer");
        assert!(!budget.contains_key("format"));
        assert!(!budget.contains_key("minimum"));
    }

    #[test]
    fn non_object_root_passes_through() {
        assert_eq!(strict(Value::Bool(true)), Value::Bool(true));
    }
}
