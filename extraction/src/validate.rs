//! Caller-supplied schema validation beyond "is valid JSON".
//!
//! A validator either returns a (possibly transformed) value or rejects it
//! with a human-readable reason; rejection is reported as a schema violation,
//! distinct from malformed JSON. Helpers cover the two contracts this
//! pipeline actually uses - fixed top-level key presence with key-name
//! migrations, and full JSON Schema validation.

use std::sync::Arc;

use serde_json::Value;

/// A schema validator: transform-or-reject with a readable reason.
pub type SchemaValidator = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// Builds a validator checking that a fixed set of top-level keys is present.
///
/// The value must be a JSON object; any missing key produces a rejection
/// naming all missing keys. The parsed value passes through unchanged.
#[must_use]
pub fn required_keys_validator(keys: &[&str]) -> SchemaValidator {
    let keys: Vec<String> = keys.iter().map(ToString::to_string).collect();
    Arc::new(move |value: Value| {
        let Some(map) = value.as_object() else {
            return Err("expected a JSON object at the top level".to_string());
        };
        let missing: Vec<&str> = keys
            .iter()
            .filter(|key| !map.contains_key(*key))
            .map(String::as_str)
            .collect();
        if missing.is_empty() {
            Ok(value)
        } else {
            Err(format!("missing expected keys: {}", missing.join(", ")))
        }
    })
}

/// Renames known old key-name variants to their canonical names.
///
/// Each `(old, new)` pair is applied only when the old name is present and
/// the new name is absent - a field-renaming migration for output produced
/// under earlier prompt revisions. Non-object values pass through untouched.
#[must_use]
pub fn apply_key_migrations(mut value: Value, migrations: &[(&str, &str)]) -> Value {
    if let Some(map) = value.as_object_mut() {
        for (old, new) in migrations {
            if map.contains_key(*old) && !map.contains_key(*new) {
                if let Some(moved) = map.remove(*old) {
                    map.insert((*new).to_string(), moved);
                }
            }
        }
    }
    value
}

/// Builds a validator that first applies key migrations, then delegates.
#[must_use]
pub fn migrating_validator(
    migrations: &[(&str, &str)],
    inner: SchemaValidator,
) -> SchemaValidator {
    let migrations: Vec<(String, String)> = migrations
        .iter()
        .map(|(old, new)| ((*old).to_string(), (*new).to_string()))
        .collect();
    Arc::new(move |value: Value| {
        let pairs: Vec<(&str, &str)> = migrations
            .iter()
            .map(|(old, new)| (old.as_str(), new.as_str()))
            .collect();
        inner(apply_key_migrations(value, &pairs))
    })
}

/// Builds a validator from a JSON Schema document.
///
/// Collects *all* instance-path errors into the rejection reason, not just
/// the first. A schema that fails to compile rejects every value with the
/// compilation error.
#[must_use]
pub fn json_schema_validator(schema: Value) -> SchemaValidator {
    Arc::new(move |value: Value| match jsonschema::Validator::new(&schema) {
        Ok(validator) => {
            let errors: Vec<String> = validator
                .iter_errors(&value)
                .map(|error| format!("at path '{}': {}", error.instance_path, error))
                .collect();
            if errors.is_empty() {
                Ok(value)
            } else {
                Err(errors.join("; "))
            }
        }
        Err(e) => Err(format!("schema compilation error: {e}")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_keys_pass_through_unchanged() {
        let validator = required_keys_validator(&["a", "b"]);
        let value = json!({"a": 1, "b": 2, "extra": 3});
        assert_eq!(validator(value.clone()).unwrap(), value);
    }

    #[test]
    fn missing_keys_are_all_named() {
        let validator = required_keys_validator(&["a", "b", "c"]);
        let reason = validator(json!({"b": 2})).unwrap_err();
        assert!(reason.contains("a, c"));
    }

    #[test]
    fn non_object_is_rejected() {
        let validator = required_keys_validator(&["a"]);
        assert!(validator(json!([1, 2])).is_err());
    }

    #[test]
    fn migration_applies_only_when_new_name_absent() {
        let migrations = [("observaciones", "observaciones_objetivas")];

        let migrated = apply_key_migrations(json!({"observaciones": ["x"]}), &migrations);
        assert_eq!(migrated, json!({"observaciones_objetivas": ["x"]}));

        // New name already present: the old key stays, nothing is clobbered.
        let both = json!({"observaciones": 1, "observaciones_objetivas": 2});
        assert_eq!(apply_key_migrations(both.clone(), &migrations), both);
    }

    #[test]
    fn migrating_validator_renames_before_checking() {
        let validator = migrating_validator(
            &[("inferencias_preliminares", "inferencias_tecnicas")],
            required_keys_validator(&["inferencias_tecnicas"]),
        );
        let out = validator(json!({"inferencias_preliminares": ["i"]})).unwrap();
        assert_eq!(out, json!({"inferencias_tecnicas": ["i"]}));
    }

    #[test]
    fn json_schema_validator_collects_all_errors() {
        let validator = json_schema_validator(json!({
            "type": "object",
            "properties": {
                "placa": {"type": "string"},
                "confianza": {"type": "number", "minimum": 0}
            },
            "required": ["placa", "confianza"]
        }));

        let reason = validator(json!({"confianza": -1})).unwrap_err();
        assert!(reason.contains("placa"));
        assert!(reason.contains("confianza") || reason.contains("minimum"));
    }
}
