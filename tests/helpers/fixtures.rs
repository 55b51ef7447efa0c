#![allow(dead_code)]
use serde_json::{json, Value};

pub fn inbound_json(id: i64, port: i64, remark: &str) -> Value {
    json!({
        "id": id,
        "up": 1024 * id,
        "down": 2048 * id,
        "total": 0,
        "allTime": 3072 * id,
        "remark": remark,
        "enable": true,
        "expiryTime": 0,
        "trafficReset": "never",
        "lastTrafficResetTime": 0,
        "clientStats": [client_stats_json(id * 10, id, &format!("user{}", id), &format!("uuid-{}", id))],
        "listen": "",
        "port": port,
        "protocol": "vless",
        "settings": format!(
            "{{\"clients\":[{{\"id\":\"uuid-{id}\",\"email\":\"user{id}\",\"flow\":\"\",\"limitIp\":0,\"totalGB\":0,\"expiryTime\":0,\"enable\":true,\"tgId\":\"\",\"subId\":\"sub{id}\",\"comment\":\"\",\"created_at\":1700000000,\"updated_at\":1700000000}}],\"decryption\":\"none\"}}",
            id = id
        ),
        "streamSettings": "{\"network\":\"tcp\",\"security\":\"none\"}",
        "tag": format!("inbound-{}", port),
        "sniffing": "{\"enabled\":true,\"destOverride\":[\"http\",\"tls\"]}"
    })
}

/// The single-inbound endpoint does not preload traffic rows.
pub fn inbound_json_without_stats(id: i64, port: i64, remark: &str) -> Value {
    let mut inbound = inbound_json(id, port, remark);
    inbound["clientStats"] = Value::Null;
    inbound
}

pub fn client_stats_json(id: i64, inbound_id: i64, email: &str, uuid: &str) -> Value {
    json!({
        "id": id,
        "inboundId": inbound_id,
        "enable": true,
        "email": email,
        "uuid": uuid,
        "subId": format!("sub{}", inbound_id),
        "up": 100,
        "down": 200,
        "allTime": 300,
        "expiryTime": 0,
        "total": 0,
        "reset": 0,
        "lastOnline": 1700000000
    })
}

pub fn sample_inbounds() -> Vec<Value> {
    vec![
        inbound_json(1, 443, "Tester-777 EU"),
        inbound_json(2, 8443, "staging"),
        inbound_json(3, 2096, "tester-777 US"),
    ]
}
