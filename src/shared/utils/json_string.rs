//! Serde adapter for JSON documents the panel transports as strings.
//!
//! `settings`, `streamSettings` and `sniffing` arrive as `"{\"clients\":[...]}"`.
//! They are decoded into a [`serde_json::Value`] and re-encoded as a string on the
//! way out. An empty string maps to `Value::Null` and back.

use serde::{de, Deserialize, Deserializer, Serializer};
use serde_json::Value;

pub fn serialize<S>(value: &Value, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Value::Null => serializer.serialize_str(""),
        other => {
            let encoded = serde_json::to_string(other).map_err(serde::ser::Error::custom)?;
            serializer.serialize_str(&encoded)
        }
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    // Some panel builds already send an object; accept both shapes.
    match Value::deserialize(deserializer)? {
        Value::String(raw) if raw.trim().is_empty() => Ok(Value::Null),
        Value::String(raw) => serde_json::from_str(&raw).map_err(de::Error::custom),
        Value::Null => Ok(Value::Null),
        object @ Value::Object(_) => Ok(object),
        other => Err(de::Error::custom(format!(
            "expected a JSON string or object, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::{json, Value};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Holder {
        #[serde(with = "super")]
        settings: Value,
    }

    #[test]
    fn decodes_stringified_object() {
        let holder: Holder =
            serde_json::from_value(json!({"settings": "{\"clients\":[],\"decryption\":\"none\"}"}))
                .unwrap();
        assert_eq!(holder.settings["decryption"], "none");
    }

    #[test]
    fn empty_string_is_null_both_ways() {
        let holder: Holder = serde_json::from_value(json!({"settings": ""})).unwrap();
        assert_eq!(holder.settings, Value::Null);

        let encoded = serde_json::to_value(&holder).unwrap();
        assert_eq!(encoded, json!({"settings": ""}));
    }

    #[test]
    fn encodes_back_to_string() {
        let holder = Holder {
            settings: json!({"enabled": true}),
        };
        let encoded = serde_json::to_value(&holder).unwrap();
        assert_eq!(encoded, json!({"settings": "{\"enabled\":true}"}));
    }

    #[test]
    fn rejects_numbers() {
        let result: Result<Holder, _> = serde_json::from_value(json!({"settings": 5}));
        assert!(result.is_err());
    }
}
