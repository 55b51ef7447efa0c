//! Process-wide shared panel client.
//!
//! Code that needs "the" client calls [`current`]; the binary or a test
//! fixture [`install`]s one. [`reset`] drops it so the next install starts
//! from a fresh session and cookie jar.

use std::sync::{Arc, OnceLock};
use tokio::sync::RwLock;

use crate::infrastructure::http::XuiClient;

static INSTANCE: OnceLock<RwLock<Option<Arc<XuiClient>>>> = OnceLock::new();

fn slot() -> &'static RwLock<Option<Arc<XuiClient>>> {
    INSTANCE.get_or_init(|| RwLock::new(None))
}

/// Install `client` unless one is already present; returns the shared one.
pub async fn install(client: XuiClient) -> Arc<XuiClient> {
    let mut guard = slot().write().await;
    match guard.as_ref() {
        Some(existing) => existing.clone(),
        None => {
            let shared = Arc::new(client);
            *guard = Some(shared.clone());
            shared
        }
    }
}

pub async fn current() -> Option<Arc<XuiClient>> {
    slot().read().await.clone()
}

/// Drop the shared client. Holders of an `Arc` keep theirs alive.
pub async fn reset() -> Option<Arc<XuiClient>> {
    slot().write().await.take()
}
