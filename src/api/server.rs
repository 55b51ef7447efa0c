use crate::domain::errors::PanelResult;
use crate::infrastructure::http::XuiClient;
use crate::models::{MlDsa65Keys, MlKem768Keys, NewUuid, X25519KeyPair};

const BASE: &str = "panel/api/server";

/// Key and identifier generation done by the panel.
pub struct Server<'a> {
    client: &'a XuiClient,
}

impl<'a> Server<'a> {
    pub fn new(client: &'a XuiClient) -> Self {
        Self { client }
    }

    pub async fn new_uuid(&self) -> PanelResult<String> {
        let obj: NewUuid = self
            .client
            .get_obj(&format!("{}/getNewUUID", BASE), "new uuid")
            .await?;
        Ok(obj.uuid)
    }

    pub async fn new_x25519(&self) -> PanelResult<X25519KeyPair> {
        self.client
            .get_obj(&format!("{}/getNewX25519Cert", BASE), "x25519 key pair")
            .await
    }

    pub async fn new_mldsa65(&self) -> PanelResult<MlDsa65Keys> {
        self.client
            .get_obj(&format!("{}/getNewmldsa65", BASE), "ML-DSA-65 keys")
            .await
    }

    pub async fn new_mlkem768(&self) -> PanelResult<MlKem768Keys> {
        self.client
            .get_obj(&format!("{}/getNewmlkem768x", BASE), "ML-KEM-768 keys")
            .await
    }
}
