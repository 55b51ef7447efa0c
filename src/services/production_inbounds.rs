use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::domain::errors::{PanelError, PanelResult};
use crate::domain::ports::task_spawner::TaskSpawner;
use crate::infrastructure::http::XuiClient;
use crate::models::Inbound;

/// Cached list of the inbounds production clients are created on: those
/// whose remark contains the configured marker.
pub struct ProductionInbounds {
    client: Arc<XuiClient>,
    marker: String,
    cache: RwLock<Option<Vec<Inbound>>>,
}

impl ProductionInbounds {
    pub fn new(client: Arc<XuiClient>) -> Self {
        let marker = client.config().prod_string.clone();
        Self::with_marker(client, marker)
    }

    pub fn with_marker(client: Arc<XuiClient>, marker: impl Into<String>) -> Self {
        Self {
            client,
            marker: marker.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Cached production inbounds, fetched on first use.
    pub async fn get(&self) -> PanelResult<Vec<Inbound>> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            return Ok(cached.clone());
        }
        self.refresh().await
    }

    /// Fetch from the panel and replace the cache. An empty selection is an
    /// error and leaves the cache untouched.
    pub async fn refresh(&self) -> PanelResult<Vec<Inbound>> {
        let inbounds = self.client.inbounds().get_all_inbounds().await?;
        let usable: Vec<Inbound> = inbounds
            .into_iter()
            .filter(|inbound| inbound.is_production(&self.marker))
            .collect();

        if usable.is_empty() {
            return Err(PanelError::NoProductionInbounds(self.marker.clone()));
        }

        info!("Cached {} production inbound(s)", usable.len());
        *self.cache.write().await = Some(usable.clone());
        Ok(usable)
    }

    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    pub async fn is_cached(&self) -> bool {
        self.cache.read().await.is_some()
    }

    /// Refill the cache now and then every `interval` until the returned
    /// token is cancelled. A zero interval is rejected.
    pub fn start_refresher(
        self: Arc<Self>,
        spawner: &dyn TaskSpawner,
        interval: Duration,
    ) -> PanelResult<CancellationToken> {
        if interval.is_zero() {
            return Err(PanelError::Validation(
                "production refresh interval must be non-zero".to_string(),
            ));
        }

        let token = CancellationToken::new();
        let stop = token.clone();

        spawner.spawn(
            async move {
                info!("Starting production inbound refresher");
                let mut ticker = tokio::time::interval(interval);

                loop {
                    tokio::select! {
                        _ = stop.cancelled() => {
                            info!("Production inbound refresher stopped");
                            break;
                        }
                        _ = ticker.tick() => {
                            self.invalidate().await;
                            if let Err(e) = self.refresh().await {
                                error!("Failed to refresh production inbounds: {}", e);
                            }
                        }
                    }
                }
            }
            .boxed(),
        );

        Ok(token)
    }
}
