mod clients;
mod inbounds;
mod server;

pub use clients::Clients;
pub use inbounds::Inbounds;
pub use server::Server;
