use tracing::info;

use crate::domain::errors::{PanelError, PanelResult};
use crate::infrastructure::http::XuiClient;
use crate::models::Inbound;

const BASE: &str = "panel/api/inbounds";

/// Inbound endpoints: `list`, `get/{id}`, `add`, `update/{id}`, `del/{id}`.
pub struct Inbounds<'a> {
    client: &'a XuiClient,
}

impl<'a> Inbounds<'a> {
    pub fn new(client: &'a XuiClient) -> Self {
        Self { client }
    }

    /// All inbounds, in panel order
    pub async fn get_all_inbounds(&self) -> PanelResult<Vec<Inbound>> {
        self.client
            .get_obj(&format!("{}/list", BASE), "inbound list")
            .await
    }

    /// One inbound by id
    pub async fn get_specific_inbound(&self, id: i64) -> PanelResult<Inbound> {
        let inbound: Inbound = self
            .client
            .get_obj(&format!("{}/get/{}", BASE, id), &format!("inbound {}", id))
            .await?;

        if inbound.id != id {
            return Err(PanelError::UnexpectedResponse(format!(
                "asked for inbound {} but the panel returned {}",
                id, inbound.id
            )));
        }
        Ok(inbound)
    }

    /// Create an inbound; the panel assigns the id and returns the stored record
    pub async fn add_inbound(&self, inbound: &Inbound) -> PanelResult<Inbound> {
        let response = self
            .client
            .safe_post_json(&format!("{}/add", BASE), inbound)
            .await?;
        let created: Inbound = response.into_obj("created inbound")?;
        info!("Created inbound {} ({})", created.id, created.remark);
        Ok(created)
    }

    /// Replace the configuration of inbound `id`
    pub async fn update_inbound(&self, id: i64, inbound: &Inbound) -> PanelResult<Inbound> {
        let response = self
            .client
            .safe_post_json(&format!("{}/update/{}", BASE, id), inbound)
            .await?;
        response.into_obj(&format!("inbound {}", id))
    }

    /// Delete inbound `id` together with its clients
    pub async fn delete_inbound_by_id(&self, id: i64) -> PanelResult<()> {
        self.client
            .safe_post_form::<()>(&format!("{}/del/{}", BASE, id), None)
            .await?
            .into_result()?;
        info!("Deleted inbound {}", id);
        Ok(())
    }
}
