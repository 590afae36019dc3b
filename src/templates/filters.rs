//! Template filters registered on the master set.

use std::collections::HashMap;

use tera::{Result, Value};

/// `"GET /about" | route_path` → `"/about"`; `""` without a second token.
pub fn route_path(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let spec = tera::try_get_value!("route_path", "value", String, value);
    let path = spec.split_whitespace().nth(1).unwrap_or_default();
    Ok(Value::String(path.to_string()))
}
