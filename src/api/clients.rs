use tracing::info;

use crate::domain::errors::{PanelError, PanelResult};
use crate::infrastructure::http::{encode_path, XuiClient};
use crate::models::{ClientPatch, ClientStats, InboundClients, PanelResponse, SingleInboundClient};

const BASE: &str = "panel/api/inbounds";

/// Client endpoints. Clients live inside inbounds, so they share the
/// inbound URL prefix.
pub struct Clients<'a> {
    client: &'a XuiClient,
}

impl<'a> Clients<'a> {
    pub fn new(client: &'a XuiClient) -> Self {
        Self { client }
    }

    /// Traffic record of the client with exactly this email
    pub async fn get_client_with_email(&self, email: &str) -> PanelResult<ClientStats> {
        let stats: ClientStats = self
            .client
            .get_obj(
                &format!("{}/{}", BASE, encode_path(&["getClientTraffics", email])?),
                &format!("client with email {}", email),
            )
            .await?;

        if stats.email != email {
            return Err(PanelError::NotFound(format!("client with email {}", email)));
        }
        Ok(stats)
    }

    /// Traffic record of the client with exactly this uuid
    pub async fn get_client_with_uuid(&self, uuid: &str) -> PanelResult<ClientStats> {
        self.get_client_traffics_with_uuid(uuid)
            .await?
            .into_iter()
            .find(|stats| stats.uuid == uuid)
            .ok_or_else(|| PanelError::NotFound(format!("client with uuid {}", uuid)))
    }

    /// Every traffic record for a uuid, one per inbound the client is in
    pub async fn get_client_traffics_with_uuid(&self, uuid: &str) -> PanelResult<Vec<ClientStats>> {
        let response = self
            .client
            .safe_get(&format!(
                "{}/{}",
                BASE,
                encode_path(&["getClientTrafficsById", uuid])?
            ))
            .await?
            .into_result()?;

        if response.obj.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(response.obj)?)
    }

    /// Add the clients of `clients` to their parent inbound
    pub async fn add_client(&self, clients: &InboundClients) -> PanelResult<PanelResponse> {
        if clients.parent_id.is_none() {
            return Err(PanelError::Validation(
                "clients were provided to be added but no parent inbound id".to_string(),
            ));
        }
        let form = clients.to_form()?;
        let response = self
            .client
            .safe_post_form(&format!("{}/addClient", BASE), Some(&form))
            .await?
            .into_result()?;
        info!(
            "Added {} client(s) to inbound {:?}",
            clients.settings.clients.len(),
            clients.parent_id
        );
        Ok(response)
    }

    /// Add one client to inbound `inbound_id`
    pub async fn add_single_client(
        &self,
        client: SingleInboundClient,
        inbound_id: i64,
    ) -> PanelResult<PanelResponse> {
        self.add_client(&InboundClients::single(inbound_id, client))
            .await
    }

    /// Send an update for the single client in `clients`, addressed by
    /// `original_uuid` or, failing that, the client's own uuid
    pub async fn request_update_client(
        &self,
        clients: &InboundClients,
        original_uuid: Option<&str>,
    ) -> PanelResult<PanelResponse> {
        let uuid = original_uuid.unwrap_or(clients.sole_client()?.uuid.as_str());
        let form = clients.to_form()?;
        let path = format!("{}/{}", BASE, encode_path(&["updateClient", uuid])?);
        self.client
            .safe_post_form(&path, Some(&form))
            .await?
            .into_result()
    }

    /// Patch an existing client and push it back to the panel
    pub async fn update_single_client(
        &self,
        existing: &SingleInboundClient,
        inbound_id: i64,
        patch: &ClientPatch,
    ) -> PanelResult<PanelResponse> {
        let mut updated = existing.clone();
        updated.apply(patch);
        let batch = InboundClients::single(inbound_id, updated);
        self.request_update_client(&batch, Some(&existing.uuid))
            .await
    }

    /// Remove clients whose traffic or time ran out
    pub async fn delete_depleted_clients(&self, inbound_id: i64) -> PanelResult<PanelResponse> {
        self.client
            .safe_post_form::<()>(&format!("{}/delDepletedClients/{}", BASE, inbound_id), None)
            .await?
            .into_result()
    }

    /// Delete a client by email
    pub async fn delete_client_by_email(
        &self,
        email: &str,
        inbound_id: i64,
    ) -> PanelResult<PanelResponse> {
        let inbound = inbound_id.to_string();
        let path = format!(
            "{}/{}",
            BASE,
            encode_path(&[inbound.as_str(), "delClientByEmail", email])?
        );
        let response = self
            .client
            .safe_post_form::<()>(&path, None)
            .await?
            .into_result()?;
        info!("Deleted client {} from inbound {}", email, inbound_id);
        Ok(response)
    }

    /// Delete a client by uuid
    pub async fn delete_client_by_uuid(
        &self,
        uuid: &str,
        inbound_id: i64,
    ) -> PanelResult<PanelResponse> {
        let inbound = inbound_id.to_string();
        let path = format!("{}/{}", BASE, encode_path(&[inbound.as_str(), "delClient", uuid])?);
        let response = self
            .client
            .safe_post_form::<()>(&path, None)
            .await?
            .into_result()?;
        info!("Deleted client {} from inbound {}", uuid, inbound_id);
        Ok(response)
    }
}
