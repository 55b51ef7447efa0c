use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::domain::errors::{PanelError, PanelResult};

// ============================================================================
// ResponseStatus
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Ok,
    /// The panel's SQLite database was busy; the request may be retried.
    DbLocked,
    Error,
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseStatus::Ok => write!(f, "OK"),
            ResponseStatus::DbLocked => write!(f, "DB_LOCKED"),
            ResponseStatus::Error => write!(f, "ERROR"),
        }
    }
}

// ============================================================================
// PanelResponse
// ============================================================================

/// The `{ "success", "msg", "obj" }` wrapper around every panel reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelResponse {
    pub success: bool,
    pub msg: String,
    pub obj: Value,
}

impl PanelResponse {
    /// Parse a raw body, rejecting anything that is not a panel envelope.
    pub fn from_body(body: &str) -> PanelResult<Self> {
        let value: Value = serde_json::from_str(body).map_err(|_| {
            PanelError::UnexpectedResponse(format!("body is not JSON: {}", truncate(body)))
        })?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> PanelResult<Self> {
        let Value::Object(mut map) = value else {
            return Err(PanelError::UnexpectedResponse(
                "envelope is not a JSON object".to_string(),
            ));
        };

        let success = map.remove("success").and_then(|v| v.as_bool());
        let msg = map
            .remove("msg")
            .and_then(|v| v.as_str().map(str::to_string));
        let obj = map.remove("obj");

        match (success, msg, obj) {
            (Some(success), Some(msg), Some(obj)) => Ok(Self { success, msg, obj }),
            _ => Err(PanelError::UnexpectedResponse(
                "envelope is missing success, msg or obj".to_string(),
            )),
        }
    }

    pub fn status(&self) -> ResponseStatus {
        if self.success {
            return ResponseStatus::Ok;
        }
        let msg = self.msg.to_lowercase();
        if msg.contains("database") && msg.contains("locked") {
            ResponseStatus::DbLocked
        } else {
            ResponseStatus::Error
        }
    }

    /// Turn an unsuccessful envelope into the matching error.
    pub fn into_result(self) -> PanelResult<Self> {
        match self.status() {
            ResponseStatus::Ok => Ok(self),
            ResponseStatus::DbLocked => Err(PanelError::Rejected(self.msg)),
            ResponseStatus::Error => {
                if self.msg.to_lowercase().contains("not found") {
                    Err(PanelError::NotFound(self.msg))
                } else {
                    Err(PanelError::Rejected(self.msg))
                }
            }
        }
    }

    /// Decode `obj`; a `null` payload is reported as not found.
    pub fn into_obj<T>(self, what: &str) -> PanelResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.into_result()?;
        if response.obj.is_null() {
            return Err(PanelError::NotFound(what.to_string()));
        }
        Ok(serde_json::from_value(response.obj)?)
    }
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_success() {
        let resp = PanelResponse::from_value(json!({"success": true, "msg": "", "obj": {}})).unwrap();
        assert_eq!(resp.status(), ResponseStatus::Ok);
    }

    #[test]
    fn classifies_locked_database_case_insensitively() {
        let resp = PanelResponse::from_value(
            json!({"success": false, "msg": "Database is LOCKED", "obj": null}),
        )
        .unwrap();
        assert_eq!(resp.status(), ResponseStatus::DbLocked);
    }

    #[test]
    fn classifies_other_failures_as_error() {
        let resp = PanelResponse::from_value(
            json!({"success": false, "msg": "Something went wrong", "obj": null}),
        )
        .unwrap();
        assert_eq!(resp.status(), ResponseStatus::Error);
        assert!(matches!(resp.into_result(), Err(PanelError::Rejected(_))));
    }

    #[test]
    fn not_found_message_maps_to_not_found() {
        let resp = PanelResponse::from_value(
            json!({"success": false, "msg": "get inbound: record not found", "obj": null}),
        )
        .unwrap();
        assert!(matches!(resp.into_result(), Err(PanelError::NotFound(_))));
    }

    #[test]
    fn rejects_non_envelopes() {
        assert!(PanelResponse::from_value(json!([1, 2, 3])).is_err());
        assert!(PanelResponse::from_value(json!({"success": true})).is_err());
        assert!(PanelResponse::from_body("<html>404</html>").is_err());
    }

    #[test]
    fn null_obj_is_not_found() {
        let resp = PanelResponse::from_value(json!({"success": true, "msg": "", "obj": null})).unwrap();
        let result: PanelResult<Value> = resp.into_obj("client x");
        assert!(matches!(result, Err(PanelError::NotFound(what)) if what == "client x"));
    }
}
