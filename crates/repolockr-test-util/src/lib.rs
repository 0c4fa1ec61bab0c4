//! Shared test utilities for the repolockr workspace.
//!
//! This crate exists because both the app crate's unit tests and its BDD harness need the same
//! recording GitHub double, and a `#[cfg(test)]` module is not visible across crates.

mod fake_github;

pub use fake_github::{Call, FakeGitHub};

use serde_json::Value;

/// Normalize non-deterministic JSON fields for snapshot comparison.
///
/// Check-run timestamps (`started_at`, `completed_at`) are replaced with `"__TIMESTAMP__"` at
/// any depth; their placeholder cannot collide with real data.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "completed_at"] {
                if map.contains_key(key) {
                    map.insert(key.to_string(), Value::String("__TIMESTAMP__".to_string()));
                }
            }
            for v in map.values_mut() {
                normalize_timestamps_recursive(v);
            }
        }
        Value::Array(items) => {
            for v in items {
                normalize_timestamps_recursive(v);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_nested_timestamps_only() {
        let value = json!({
            "status": "completed",
            "completed_at": "2024-05-01T12:00:00Z",
            "calls": [{ "started_at": "2024-05-01T11:59:00Z", "id": 3 }],
        });
        assert_eq!(
            normalize_nondeterministic(value),
            json!({
                "status": "completed",
                "completed_at": "__TIMESTAMP__",
                "calls": [{ "started_at": "__TIMESTAMP__", "id": 3 }],
            })
        );
    }
}
