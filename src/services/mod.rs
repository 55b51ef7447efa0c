pub mod production_inbounds;
pub mod telegram_clients;

pub use production_inbounds::*;
pub use telegram_clients::*;
