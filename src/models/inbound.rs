use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::domain::errors::{PanelError, PanelResult};
use crate::models::client::{ClientStats, SingleInboundClient};
use crate::shared::utils::json_string;

// ============================================================================
// Protocol
// ============================================================================

/// Inbound protocol. Panels add protocols over time, so names this crate
/// does not know are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Protocol {
    Vless,
    Vmess,
    Trojan,
    Shadowsocks,
    Wireguard,
    DokodemoDoor,
    Tunnel,
    Socks,
    Http,
    Mixed,
    Other(String),
}

impl Protocol {
    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Vless => "vless",
            Protocol::Vmess => "vmess",
            Protocol::Trojan => "trojan",
            Protocol::Shadowsocks => "shadowsocks",
            Protocol::Wireguard => "wireguard",
            Protocol::DokodemoDoor => "dokodemo-door",
            Protocol::Tunnel => "tunnel",
            Protocol::Socks => "socks",
            Protocol::Http => "http",
            Protocol::Mixed => "mixed",
            Protocol::Other(name) => name,
        }
    }
}

impl From<String> for Protocol {
    fn from(name: String) -> Self {
        match name.as_str() {
            "vless" => Protocol::Vless,
            "vmess" => Protocol::Vmess,
            "trojan" => Protocol::Trojan,
            "shadowsocks" => Protocol::Shadowsocks,
            "wireguard" => Protocol::Wireguard,
            "dokodemo-door" => Protocol::DokodemoDoor,
            "tunnel" => Protocol::Tunnel,
            "socks" => Protocol::Socks,
            "http" => Protocol::Http,
            "mixed" => Protocol::Mixed,
            _ => Protocol::Other(name),
        }
    }
}

impl From<Protocol> for String {
    fn from(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Inbound
// ============================================================================

/// An inbound: the listener clients connect to, with its traffic counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inbound {
    pub id: i64,
    pub up: i64,    // bytes
    pub down: i64,  // bytes
    pub total: i64, // bytes, 0 = unlimited
    #[serde(default)]
    pub all_time: i64,
    pub remark: String,
    pub enable: bool,
    pub expiry_time: i64, // unix seconds, 0 = never
    #[serde(default = "default_traffic_reset")]
    pub traffic_reset: String, // "never", "daily", "weekly", "monthly"
    #[serde(default)]
    pub last_traffic_reset_time: i64,
    #[serde(skip_serializing)]
    pub client_stats: Option<Vec<ClientStats>>,
    pub listen: String,
    pub port: i64,
    pub protocol: Protocol,
    #[serde(with = "json_string")]
    pub settings: Value,
    #[serde(with = "json_string")]
    pub stream_settings: Value,
    pub tag: String,
    #[serde(with = "json_string")]
    pub sniffing: Value,
}

fn default_traffic_reset() -> String {
    "never".to_string()
}

impl Inbound {
    /// Check the field ranges the panel guarantees for a live inbound.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=65535).contains(&self.port) {
            return Err(format!("Inbound {} has port {} outside 1-65535", self.id, self.port));
        }

        for (name, value) in [
            ("up", self.up),
            ("down", self.down),
            ("total", self.total),
            ("allTime", self.all_time),
        ] {
            if value < 0 {
                return Err(format!("Inbound {} has negative {}", self.id, name));
            }
        }

        if !self.settings.is_null() && !self.settings.is_object() {
            return Err(format!("Inbound {} settings is not an object", self.id));
        }

        Ok(())
    }

    /// Equality on everything but `client_stats`, which the single-inbound
    /// endpoint does not always load.
    pub fn same_configuration(&self, other: &Inbound) -> bool {
        self.id == other.id
            && self.up == other.up
            && self.down == other.down
            && self.total == other.total
            && self.all_time == other.all_time
            && self.remark == other.remark
            && self.enable == other.enable
            && self.expiry_time == other.expiry_time
            && self.traffic_reset == other.traffic_reset
            && self.last_traffic_reset_time == other.last_traffic_reset_time
            && self.listen == other.listen
            && self.port == other.port
            && self.protocol == other.protocol
            && self.settings == other.settings
            && self.stream_settings == other.stream_settings
            && self.tag == other.tag
            && self.sniffing == other.sniffing
    }

    /// Client entries declared in `settings.clients`.
    pub fn clients(&self) -> PanelResult<Vec<SingleInboundClient>> {
        match self.settings.get("clients") {
            Some(clients) => Ok(serde_json::from_value(clients.clone())?),
            None => Ok(Vec::new()),
        }
    }

    pub fn client_by_email(&self, email: &str) -> PanelResult<SingleInboundClient> {
        self.clients()?
            .into_iter()
            .find(|client| client.email == email)
            .ok_or_else(|| {
                PanelError::NotFound(format!("client {} in inbound {}", email, self.id))
            })
    }

    /// Whether the remark carries the production marker (case-insensitive).
    pub fn is_production(&self, marker: &str) -> bool {
        self.remark.to_lowercase().contains(&marker.to_lowercase())
    }
}
