pub mod client;

pub use client::{encode_path, Payload, XuiClient};
