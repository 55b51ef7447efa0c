use serde::{Deserialize, Serialize};

/// Reality key pair from `getNewX25519Cert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X25519KeyPair {
    pub private_key: String,
    pub public_key: String,
}

/// ML-DSA-65 post-quantum signature material from `getNewmldsa65`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MlDsa65Keys {
    pub verify: String,
    pub seed: String,
}

/// ML-KEM-768 post-quantum key material from `getNewmlkem768x`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MlKem768Keys {
    pub client: String,
    pub seed: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NewUuid {
    pub uuid: String,
}
