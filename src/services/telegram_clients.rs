use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::PanelResult;
use crate::infrastructure::http::XuiClient;
use crate::models::{ClientPatch, ClientStats, PanelResponse, SingleInboundClient};
use crate::services::production_inbounds::ProductionInbounds;
use crate::shared::utils::identity::{email_from_tgid_inbound, subscription_from_tgid, telegram_uuid};

/// Client lifecycle keyed by Telegram user id.
///
/// A Telegram user gets one client per production inbound. All of them share
/// the uuid and subscription id derived from the Telegram id; the email is
/// unique per inbound (`TG{id}IB{inbound}`).
#[derive(Clone)]
pub struct TelegramClientService {
    client: Arc<XuiClient>,
    production: Arc<ProductionInbounds>,
}

impl TelegramClientService {
    pub fn new(client: Arc<XuiClient>, production: Arc<ProductionInbounds>) -> Self {
        Self { client, production }
    }

    /// Traffic records for a Telegram user, on one inbound or on all of them.
    pub async fn get_client_with_tgid(
        &self,
        telegram_id: u64,
        inbound_id: Option<i64>,
    ) -> PanelResult<Vec<ClientStats>> {
        let clients = self.client.clients();
        match inbound_id {
            Some(inbound_id) => {
                let email = email_from_tgid_inbound(telegram_id, inbound_id);
                Ok(vec![clients.get_client_with_email(&email).await?])
            }
            None => {
                let uuid = telegram_uuid(telegram_id, true);
                clients.get_client_traffics_with_uuid(&uuid).await
            }
        }
    }

    /// Create the user's client on every production inbound.
    pub async fn create_and_add_prod_client(
        &self,
        telegram_id: u64,
        additional_remark: Option<&str>,
    ) -> PanelResult<Vec<PanelResponse>> {
        let production = self.production.get().await?;
        let comment = match additional_remark {
            Some(remark) => format!("{}, created at {}", remark, Utc::now()),
            None => format!("created at {}", Utc::now()),
        };

        let mut responses = Vec::with_capacity(production.len());
        for inbound in &production {
            let mut client = SingleInboundClient::new(
                telegram_uuid(telegram_id, true),
                email_from_tgid_inbound(telegram_id, inbound.id),
                subscription_from_tgid(telegram_id),
            );
            client.limit_gb = 0;
            client.comment = comment.clone();

            responses.push(
                self.client
                    .clients()
                    .add_single_client(client, inbound.id)
                    .await?,
            );
        }

        info!(
            "Created client for telegram id {} on {} inbound(s)",
            telegram_id,
            responses.len()
        );
        Ok(responses)
    }

    /// Patch the user's client on one inbound.
    pub async fn update_client_by_tgid(
        &self,
        telegram_id: u64,
        inbound_id: i64,
        patch: &ClientPatch,
    ) -> PanelResult<PanelResponse> {
        let email = email_from_tgid_inbound(telegram_id, inbound_id);
        let inbound = self.client.inbounds().get_specific_inbound(inbound_id).await?;
        let existing = inbound.client_by_email(&email)?;

        self.client
            .clients()
            .update_single_client(&existing, inbound_id, patch)
            .await
    }

    pub async fn delete_client_by_tgid(
        &self,
        telegram_id: u64,
        inbound_id: i64,
    ) -> PanelResult<PanelResponse> {
        let email = email_from_tgid_inbound(telegram_id, inbound_id);
        self.client
            .clients()
            .delete_client_by_email(&email, inbound_id)
            .await
    }

    /// Delete the user's client from every production inbound. Each inbound
    /// reports its own outcome; one failure does not stop the others.
    pub async fn delete_client_by_tgid_all_inbounds(
        &self,
        telegram_id: u64,
    ) -> PanelResult<Vec<PanelResult<PanelResponse>>> {
        let production = self.production.get().await?;
        let deletions = production
            .iter()
            .map(|inbound| self.delete_client_by_tgid(telegram_id, inbound.id));
        Ok(join_all(deletions).await)
    }
}
