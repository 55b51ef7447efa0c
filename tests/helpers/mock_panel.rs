#![allow(dead_code)]
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

use xui_handler::config::Config;
use xui_handler::domain::ports::TimeService;
use xui_handler::XuiClient;

pub const BASE_PATH: &str = "/xui";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "s3cret";
pub const SESSION_COOKIE: &str = "3x-ui=session-token";

/// Full request path on the mock panel for an endpoint path.
pub fn panel_path(endpoint: &str) -> String {
    format!("{}/{}", BASE_PATH, endpoint.trim_start_matches('/'))
}

pub fn envelope(obj: Value) -> Value {
    json!({"success": true, "msg": "", "obj": obj})
}

pub fn failure(msg: &str) -> Value {
    json!({"success": false, "msg": msg, "obj": null})
}

pub fn ok_json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

/// Mock panel that accepts `USERNAME`/`PASSWORD` and hands out `SESSION_COOKIE`.
/// Unmatched requests get wiremock's default 404, which is also what the real
/// panel answers for API calls without a session.
pub async fn start_panel() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(panel_path("login")))
        .and(wiremock::matchers::body_string_contains(format!(
            "username={}",
            USERNAME
        )))
        .and(wiremock::matchers::body_string_contains(format!(
            "password={}",
            PASSWORD
        )))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("{}; Path=/", SESSION_COOKIE).as_str())
                .set_body_json(json!({"success": true, "msg": "Login Successfully", "obj": null})),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(panel_path("login")))
        .respond_with(ok_json(failure("Invalid username or password")))
        .with_priority(10)
        .mount(&server)
        .await;

    server
}

pub fn config_for(server: &MockServer) -> Config {
    let address = server.address();
    let mut config = Config::new(
        address.ip().to_string(),
        address.port(),
        BASE_PATH,
        USERNAME,
        PASSWORD,
    );
    config.scheme = "http".to_string();
    config.retry_delay_secs = 0;
    config.request_timeout_secs = 5;
    config
}

pub fn client_for(server: &MockServer) -> XuiClient {
    XuiClient::new(config_for(server)).expect("client should build")
}

pub async fn logged_in_client(server: &MockServer) -> XuiClient {
    let client = client_for(server);
    client.login().await.expect("mock login should succeed");
    client
}

/// GET matcher that only answers requests carrying the session cookie.
pub fn authed_get(endpoint: &str) -> MockBuilder {
    Mock::given(method("GET"))
        .and(path(panel_path(endpoint)))
        .and(header("cookie", SESSION_COOKIE))
}

pub fn authed_post(endpoint: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(panel_path(endpoint)))
        .and(header("cookie", SESSION_COOKIE))
}

/// Records requested sleeps instead of sleeping.
#[derive(Default)]
pub struct RecordingTime {
    pub sleeps: Mutex<Vec<Duration>>,
}

impl RecordingTime {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }
}

#[async_trait]
impl TimeService for RecordingTime {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
