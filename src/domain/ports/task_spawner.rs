use futures::future::BoxFuture;

/// Spawns background work such as the production inbound refresher.
/// Abstracts the runtime so tests can drive the future themselves.
pub trait TaskSpawner: Send + Sync {
    fn spawn(&self, future: BoxFuture<'static, ()>);
}
