use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::api::{Clients, Inbounds, Server};
use crate::config::Config;
use crate::domain::errors::{PanelError, PanelResult};
use crate::domain::ports::time_service::TimeService;
use crate::infrastructure::runtime::TokioTimeService;
use crate::models::{PanelResponse, ResponseStatus};

/// Request body, borrowed so it can be re-sent on every retry.
pub enum Payload<'a, B: ?Sized> {
    Empty,
    Form(&'a B),
    Json(&'a B),
}

#[derive(Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(rename = "twoFactorCode", skip_serializing_if = "Option::is_none")]
    two_factor_code: Option<&'a str>,
}

/// Join path segments, percent-encoding each so `/`, `?` and `#` inside an
/// email or uuid stay within their segment.
pub fn encode_path(segments: &[&str]) -> PanelResult<String> {
    let mut url = Url::parse("http://panel.invalid/")
        .map_err(|e| PanelError::Validation(format!("cannot build endpoint path: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| PanelError::Validation("cannot build endpoint path".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.path().trim_start_matches('/').to_string())
}

/// Authenticated session against one 3X-UI panel.
///
/// The panel answers 404 for API calls without a valid session cookie, so a
/// 404 on an absent or expired session triggers a login and a retry. Replies
/// reporting a locked database are retried after `retry_delay`.
pub struct XuiClient {
    config: Config,
    base_url: String,
    http_client: Client,
    session_start: RwLock<Option<DateTime<Utc>>>,
    time: Arc<dyn TimeService>,
}

impl XuiClient {
    pub fn new(config: Config) -> PanelResult<Self> {
        Self::with_time_service(config, Arc::new(TokioTimeService::new()))
    }

    pub fn with_time_service(config: Config, time: Arc<dyn TimeService>) -> PanelResult<Self> {
        config.validate()?;
        let http_client = Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let base_url = config.base_url();
        info!("Panel client configured for {}", base_url);

        Ok(Self {
            config,
            base_url,
            http_client,
            session_start: RwLock::new(None),
            time,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an endpoint path onto the base URL with exactly one slash.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn inbounds(&self) -> Inbounds<'_> {
        Inbounds::new(self)
    }

    pub fn clients(&self) -> Clients<'_> {
        Clients::new(self)
    }

    pub fn server(&self) -> Server<'_> {
        Server::new(self)
    }

    // ========================================================================
    // Session management
    // ========================================================================

    /// Log in with the configured credentials; the session cookie is kept by
    /// the HTTP client's cookie store.
    pub async fn login(&self) -> PanelResult<()> {
        let url = self.endpoint_url("login");
        let form = LoginForm {
            username: &self.config.username,
            password: &self.config.password,
            two_factor_code: self.config.two_factor_code.as_deref(),
        };

        info!("Logging in to panel as {}", self.config.username);
        metrics::counter!("xui_panel_logins_total").increment(1);

        let response = self.http_client.post(&url).form(&form).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(PanelError::Status {
                status: status.as_u16(),
                body: format!("login returned {}", status),
            });
        }

        let body = response.text().await?;
        let envelope = PanelResponse::from_body(&body)?;
        if !envelope.success {
            warn!("Panel login rejected: {}", envelope.msg);
            return Err(PanelError::Auth(
                "wrong credentials or failed login".to_string(),
            ));
        }

        *self.session_start.write().await = Some(Utc::now());
        Ok(())
    }

    pub async fn session_started_at(&self) -> Option<DateTime<Utc>> {
        *self.session_start.read().await
    }

    /// False when no login happened yet or the session outlived its duration.
    pub async fn session_is_valid(&self) -> bool {
        match *self.session_start.read().await {
            Some(start) => {
                Utc::now() - start <= ChronoDuration::seconds(self.config.session_duration_secs)
            }
            None => false,
        }
    }

    /// Best-effort logout; the local session is cleared either way.
    pub async fn disconnect(&self) {
        if self.session_start.write().await.take().is_none() {
            return;
        }
        match self
            .http_client
            .get(self.endpoint_url("logout"))
            .send()
            .await
        {
            Ok(response) => debug!("Panel logout returned {}", response.status()),
            Err(e) => debug!("Panel logout failed: {}", e),
        }
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// GET with session renewal and locked-database retries.
    pub async fn safe_get(&self, path: &str) -> PanelResult<PanelResponse> {
        self.safe_request::<()>(Method::GET, path, Payload::Empty)
            .await
    }

    /// POST with a form body (or none) and the same retry policy as `safe_get`.
    pub async fn safe_post_form<B>(&self, path: &str, form: Option<&B>) -> PanelResult<PanelResponse>
    where
        B: Serialize + ?Sized + Sync,
    {
        let payload = match form {
            Some(form) => Payload::Form(form),
            None => Payload::Empty,
        };
        self.safe_request(Method::POST, path, payload).await
    }

    pub async fn safe_post_json<B>(&self, path: &str, body: &B) -> PanelResult<PanelResponse>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.safe_request(Method::POST, path, Payload::Json(body))
            .await
    }

    /// GET an endpoint and decode its `obj`.
    pub(crate) async fn get_obj<T>(&self, path: &str, what: &str) -> PanelResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.safe_get(path).await?.into_obj(what)
    }

    pub async fn safe_request<B>(
        &self,
        method: Method,
        path: &str,
        payload: Payload<'_, B>,
    ) -> PanelResult<PanelResponse>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.endpoint_url(path);
        let max_retries = self.config.max_retries;
        debug!("{} {}", method, url);

        for attempt in 0..max_retries {
            metrics::counter!("xui_panel_requests_total", "method" => method.to_string())
                .increment(1);

            let response = self.build(method.clone(), &url, &payload).send().await?;
            let status = response.status();

            if !status.is_success() {
                if status == StatusCode::NOT_FOUND {
                    if !self.session_is_valid().await {
                        info!("Got 404 without a live session, logging in again");
                        self.login().await?;
                        continue;
                    }
                    return Err(PanelError::NotFound(url));
                }

                let body = response.text().await.unwrap_or_default();
                return Err(PanelError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let body = response.text().await?;
            let envelope = PanelResponse::from_body(&body)?;
            match envelope.status() {
                ResponseStatus::DbLocked => {
                    metrics::counter!("xui_panel_db_locked_total").increment(1);
                    if attempt + 1 >= max_retries {
                        return Err(PanelError::RetriesExhausted(max_retries));
                    }
                    warn!(
                        "Database is locked, retrying {} (attempt {}/{})",
                        url,
                        attempt + 1,
                        max_retries
                    );
                    self.time.sleep(self.config.retry_delay()).await;
                }
                ResponseStatus::Ok => return Ok(envelope),
                ResponseStatus::Error => {
                    warn!("Unsuccessful operation on {}: {}", url, envelope.msg);
                    return Ok(envelope);
                }
            }
        }

        Err(PanelError::RetriesExhausted(max_retries))
    }

    fn build<B>(&self, method: Method, url: &str, payload: &Payload<'_, B>) -> RequestBuilder
    where
        B: Serialize + ?Sized,
    {
        let builder = self.http_client.request(method, url);
        match payload {
            Payload::Empty => builder,
            Payload::Form(form) => builder.form(form),
            Payload::Json(body) => builder.json(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> XuiClient {
        XuiClient::new(Config::new("panel.example.com", 2053, "/base", "admin", "pw")).unwrap()
    }

    #[test]
    fn endpoint_url_joins_once() {
        let client = client();
        assert_eq!(
            client.endpoint_url("panel/api/inbounds/list"),
            "https://panel.example.com:2053/base/panel/api/inbounds/list"
        );
        assert_eq!(
            client.endpoint_url("/login"),
            "https://panel.example.com:2053/base/login"
        );
    }

    #[test]
    fn encode_path_escapes_each_segment() {
        assert_eq!(
            encode_path(&["getClientTraffics", "a#b/c?d"]).unwrap(),
            "getClientTraffics/a%23b%2Fc%3Fd"
        );
        assert_eq!(encode_path(&["4", "delClient", "uuid-4"]).unwrap(), "4/delClient/uuid-4");
    }

    #[tokio::test]
    async fn fresh_client_has_no_session() {
        let client = client();
        assert!(!client.session_is_valid().await);
        assert!(client.session_started_at().await.is_none());
    }

    #[tokio::test]
    async fn disconnect_without_session_is_a_no_op() {
        let client = client();
        client.disconnect().await;
        assert!(!client.session_is_valid().await);
    }
}
