use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::{PanelError, PanelResult};

// ============================================================================
// ClientStats
// ============================================================================

/// Traffic and identity record the panel keeps for each client of an inbound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub id: i64,
    pub inbound_id: i64,
    pub enable: bool,
    pub email: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub sub_id: String,
    pub up: i64,   // bytes
    pub down: i64, // bytes
    #[serde(default)]
    pub all_time: i64, // bytes
    pub expiry_time: i64,
    pub total: i64,
    pub reset: i64,
    #[serde(default)]
    pub last_online: i64,
}

// ============================================================================
// Flow
// ============================================================================

/// VLESS flow control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Flow {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "xtls-rprx-vision")]
    XtlsRprxVision,
    #[serde(rename = "xtls-rprx-vision-udp443")]
    XtlsRprxVisionUdp443,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flow::None => write!(f, ""),
            Flow::XtlsRprxVision => write!(f, "xtls-rprx-vision"),
            Flow::XtlsRprxVisionUdp443 => write!(f, "xtls-rprx-vision-udp443"),
        }
    }
}

/// `tgId` is an integer on new panels and an empty string on old ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelegramId {
    Id(i64),
    Text(String),
}

impl Default for TelegramId {
    fn default() -> Self {
        TelegramId::Text(String::new())
    }
}

// ============================================================================
// SingleInboundClient
// ============================================================================

/// A client entry inside an inbound's `settings.clients`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleInboundClient {
    #[serde(rename = "id")]
    pub uuid: String,
    #[serde(default)]
    pub security: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub flow: Flow,
    pub email: String,
    #[serde(rename = "limitIp", default = "default_limit_ip")]
    pub limit_ip: i64,
    #[serde(rename = "totalGB", default)]
    pub limit_gb: i64,
    #[serde(rename = "expiryTime", default)]
    pub expiry_time: i64,
    #[serde(default = "default_enable")]
    pub enable: bool,
    #[serde(rename = "tgId", default)]
    pub tg_id: TelegramId,
    #[serde(rename = "subId", default)]
    pub subscription_id: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default = "now_timestamp")]
    pub created_at: i64,
    #[serde(default = "now_timestamp")]
    pub updated_at: i64,
}

fn default_limit_ip() -> i64 {
    20
}

fn default_enable() -> bool {
    true
}

fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

impl SingleInboundClient {
    /// New enabled client with panel defaults and fresh timestamps.
    pub fn new(uuid: String, email: String, subscription_id: String) -> Self {
        let now = now_timestamp();
        Self {
            uuid,
            security: String::new(),
            password: String::new(),
            flow: Flow::None,
            email,
            limit_ip: default_limit_ip(),
            limit_gb: 0,
            expiry_time: 0,
            enable: true,
            tg_id: TelegramId::default(),
            subscription_id,
            comment: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch and bump `updated_at`.
    pub fn apply(&mut self, patch: &ClientPatch) {
        if let Some(security) = &patch.security {
            self.security = security.clone();
        }
        if let Some(password) = &patch.password {
            self.password = password.clone();
        }
        if let Some(flow) = patch.flow {
            self.flow = flow;
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(limit_ip) = patch.limit_ip {
            self.limit_ip = limit_ip;
        }
        if let Some(limit_gb) = patch.limit_gb {
            self.limit_gb = limit_gb;
        }
        if let Some(expiry_time) = patch.expiry_time {
            self.expiry_time = expiry_time;
        }
        if let Some(enable) = patch.enable {
            self.enable = enable;
        }
        if let Some(sub_id) = &patch.sub_id {
            self.subscription_id = sub_id.clone();
        }
        if let Some(comment) = &patch.comment {
            self.comment = comment.clone();
        }
        self.updated_at = now_timestamp();
    }
}

/// Fields to change on an existing client; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub security: Option<String>,
    pub password: Option<String>,
    pub flow: Option<Flow>,
    pub email: Option<String>,
    pub limit_ip: Option<i64>,
    pub limit_gb: Option<i64>,
    pub expiry_time: Option<i64>,
    pub enable: Option<bool>,
    pub sub_id: Option<String>,
    pub comment: Option<String>,
}

// ============================================================================
// InboundClients
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub clients: Vec<SingleInboundClient>,
}

/// Payload of `addClient` / `updateClient`: a parent inbound and its clients.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundClients {
    pub parent_id: Option<i64>,
    pub settings: ClientSettings,
}

/// Form body the panel expects; `settings` must be a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InboundClientsForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub settings: String,
}

impl InboundClients {
    pub fn single(parent_id: i64, client: SingleInboundClient) -> Self {
        Self {
            parent_id: Some(parent_id),
            settings: ClientSettings {
                clients: vec![client],
            },
        }
    }

    pub fn to_form(&self) -> PanelResult<InboundClientsForm> {
        Ok(InboundClientsForm {
            id: self.parent_id,
            settings: serde_json::to_string(&self.settings)?,
        })
    }

    /// The one client of an update batch.
    pub fn sole_client(&self) -> PanelResult<&SingleInboundClient> {
        match self.settings.clients.as_slice() {
            [client] => Ok(client),
            clients => Err(PanelError::Validation(format!(
                "only 1 client can be updated at a time, got {}",
                clients.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_stats_use_camel_case() {
        let stats: ClientStats = serde_json::from_value(json!({
            "id": 7, "inboundId": 3, "enable": true, "email": "qndfils7",
            "uuid": "161b1f51-d027-4dcc-9e13-573cf6c9353a", "subId": "abc",
            "up": 10, "down": 20, "allTime": 30, "expiryTime": 0,
            "total": 0, "reset": 0, "lastOnline": 1700000000
        }))
        .unwrap();
        assert_eq!(stats.inbound_id, 3);
        assert_eq!(stats.all_time, 30);
        assert_eq!(stats.last_online, 1_700_000_000);
    }

    #[test]
    fn single_client_aliases_and_defaults() {
        let client: SingleInboundClient = serde_json::from_value(json!({
            "id": "0213c327-c619-4998-9bb3-adaced38c68b",
            "flow": "xtls-rprx-vision",
            "email": "vision-client",
            "totalGB": 0,
            "subId": "86xi6py5uwsgokh1"
        }))
        .unwrap();
        assert_eq!(client.uuid, "0213c327-c619-4998-9bb3-adaced38c68b");
        assert_eq!(client.flow, Flow::XtlsRprxVision);
        assert_eq!(client.limit_ip, 20);
        assert!(client.enable);
        assert_eq!(client.tg_id, TelegramId::Text(String::new()));
    }

    #[test]
    fn tg_id_accepts_numbers() {
        let client: SingleInboundClient = serde_json::from_value(json!({
            "id": "u", "email": "e", "tgId": 12345
        }))
        .unwrap();
        assert_eq!(client.tg_id, TelegramId::Id(12345));
    }

    #[test]
    fn form_carries_settings_as_string() {
        let client = SingleInboundClient::new("u-1".into(), "mail".into(), "sub".into());
        let form = InboundClients::single(4, client).to_form().unwrap();
        assert_eq!(form.id, Some(4));
        let settings: serde_json::Value = serde_json::from_str(&form.settings).unwrap();
        assert_eq!(settings["clients"][0]["id"], "u-1");
        assert_eq!(settings["clients"][0]["limitIp"], 20);
        assert_eq!(settings["clients"][0]["flow"], "");
    }

    #[test]
    fn apply_patch_changes_only_given_fields() {
        let mut client = SingleInboundClient::new("u".into(), "old".into(), "sub".into());
        client.updated_at = 0;
        client.apply(&ClientPatch {
            enable: Some(false),
            comment: Some("paused".into()),
            ..Default::default()
        });
        assert!(!client.enable);
        assert_eq!(client.comment, "paused");
        assert_eq!(client.email, "old");
        assert!(client.updated_at > 0);
    }

    #[test]
    fn sole_client_rejects_batches() {
        let a = SingleInboundClient::new("a".into(), "a".into(), "a".into());
        let mut batch = InboundClients::single(1, a.clone());
        assert!(batch.sole_client().is_ok());
        batch.settings.clients.push(a);
        assert!(matches!(batch.sole_client(), Err(PanelError::Validation(_))));
    }
}
