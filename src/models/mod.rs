pub mod client;
pub mod envelope;
pub mod inbound;
pub mod server;

pub use client::*;
pub use envelope::*;
pub use inbound::*;
pub use server::*;
